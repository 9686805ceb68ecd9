//! Builds a small window on the headless interpreter and clicks through it.
//!
//! Run with `RUST_LOG=tkui=debug` to watch registrations and dispatch.

use std::cell::Cell;
use std::rc::Rc;

use tkui::widgets::{Button, CheckButton, Frame, Label, Relief};
use tkui::{
    find_user_config, init_logging, BridgeConfig, HeadlessInterp, Interp, Value, Widget, Window,
    WindowState,
};

fn load_config() -> BridgeConfig {
    let Some(path) = find_user_config() else {
        return BridgeConfig::default();
    };
    match BridgeConfig::load_file(&path) {
        Ok((config, errors)) => {
            for e in errors {
                eprintln!("{}: {e}", path.display());
            }
            config
        }
        Err(e) => {
            eprintln!("cannot read {}: {e}", path.display());
            BridgeConfig::default()
        }
    }
}

fn main() -> tkui::Result<()> {
    let config = load_config();
    init_logging(config.logging());

    let interp = Rc::new(HeadlessInterp::new());
    let window = Window::with_config(interp.clone(), &config)?;
    window.set_title("tkui demo")?;
    window.set_geometry("320x200")?;

    let frame = Frame::with_options(&window, [("padding", Value::from("8"))])?;
    frame.set_relief(Relief::Groove)?;
    window.pack(&*frame, [("fill", Value::from("both")), ("expand", Value::from(1))]).manage()?;

    let status = Label::new(&frame, "Ready")?;
    let remember = CheckButton::new(&frame, "Remember me")?;
    let hello = Button::new(&frame, "Say hello")?;
    let quit = Button::new(&frame, "Quit")?;
    for (row, widget) in [&*status, &**remember, &*hello, &*quit].into_iter().enumerate() {
        window
            .grid(widget, [("row", Value::from(row as i64)), ("sticky", Value::from("w"))])
            .manage()?;
    }

    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let label = status.clone();
    hello.on_click(move |_| {
        counter.set(counter.get() + 1);
        label.set_text(&format!("Hello #{}", counter.get()))?;
        Ok(())
    })?;

    let win = Rc::downgrade(&window);
    quit.on_click(move |_| {
        if let Some(win) = win.upgrade() {
            win.set_state(WindowState::Withdrawn)?;
        }
        Ok(())
    })?;

    // Simulate the user.
    hello.invoke()?;
    interp.eval(&window.dispatch_token(hello.path()))?;
    remember.invoke()?;
    quit.invoke()?;

    println!("status label : {}", status.text());
    println!("remember me  : {}", remember.value()?);
    println!("window state : {:?}", window.state());
    println!("scripts run  : {}", interp.history().len());
    Ok(())
}
