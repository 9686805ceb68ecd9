//! End-to-end behaviour of the bridge on the headless interpreter.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use tkui::widgets::{Button, CheckButton, Frame, Label, RadioButton};
use tkui::{Error, HeadlessInterp, Interp, Value, Widget, Window, WindowState};

fn setup(title: &str) -> (Rc<HeadlessInterp>, Rc<Window>) {
    let interp = Rc::new(HeadlessInterp::new());
    let window = Window::new(interp.clone(), title).unwrap();
    (interp, window)
}

#[test]
fn widget_paths_are_unique_per_window() {
    let (_interp, window) = setup("paths");
    let frame = Frame::new(&window).unwrap();
    let mut paths = HashSet::new();
    let mut keep = Vec::new();
    for i in 0..5 {
        let b = Button::new(&window, &format!("b{i}")).unwrap();
        assert!(paths.insert(b.path().to_owned()));
        keep.push(b);
        let inner = Button::new(&frame, &format!("i{i}")).unwrap();
        assert!(paths.insert(inner.path().to_owned()));
        keep.push(inner);
    }
    assert!(paths.insert(frame.path().to_owned()));
}

#[test]
fn windows_have_independent_counters() {
    let interp = Rc::new(HeadlessInterp::new());
    let main = Window::new(interp.clone(), "main").unwrap();
    let other = Window::toplevel(&main, "other").unwrap();
    let a = Button::new(&main, "a").unwrap();
    let b = Button::new(&other, "b").unwrap();
    assert_eq!(other.path(), ".w1");
    assert_eq!(a.path(), ".w2");
    assert_eq!(b.path(), ".w1.w1");
}

#[test]
fn click_through_interpreter_runs_latest_callback_once() {
    let (interp, window) = setup("dispatch");
    let button = Button::new(&window, "Go").unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = log.clone();
    button.on_click(move |_| {
        l.borrow_mut().push("first");
        Ok(())
    })
    .unwrap();
    let l = log.clone();
    button
        .on_click(move |_| {
            l.borrow_mut().push("second");
            Ok(())
        })
        .unwrap();

    interp.eval(".w1 invoke").unwrap();
    assert_eq!(*log.borrow(), ["second"]);
}

#[test]
fn dispatch_of_unregistered_path_is_silent() {
    let (interp, window) = setup("noop");
    let cmd = window.dispatch_command().to_owned();
    assert_eq!(interp.eval(&format!("{cmd} .w99")).unwrap(), "");
}

#[test]
fn callback_can_evaluate_scripts_and_touch_widgets() {
    let (interp, window) = setup("reentrant");
    let label = Label::new(&window, "idle").unwrap();
    let button = Button::new(&window, "Go").unwrap();
    let counter = Rc::new(Cell::new(0));

    let c = counter.clone();
    let target = label.clone();
    button
        .on_click(move |btn| {
            c.set(c.get() + 1);
            target.set_text(&format!("clicked {}", c.get()))?;
            btn.set_text("Again")?;
            Ok(())
        })
        .unwrap();

    button.invoke().unwrap();
    button.invoke().unwrap();
    assert_eq!(label.text(), "clicked 2");
    assert_eq!(interp.widget(label.path()).unwrap().options["text"], "clicked 2");
    assert_eq!(button.text(), "Again");
}

#[test]
fn title_forwarded_once_per_change() {
    let (interp, window) = setup("Same");
    window.set_title("Same").unwrap();
    window.set_title("Same").unwrap();
    assert_eq!(interp.history_count("wm title"), 1);
    window.set_title("Different").unwrap();
    assert_eq!(interp.history_count("wm title"), 2);
}

#[test]
fn window_state_round_trip() {
    let (interp, window) = setup("");
    window.set_state(WindowState::Iconic).unwrap();
    assert_eq!(window.state(), Some(WindowState::Iconic));
    assert_eq!(interp.eval("wm state .").unwrap(), "iconic");
}

#[test]
fn options_are_declared_per_widget_kind() {
    let (_interp, window) = setup("");
    let button = Button::new(&window, "x").unwrap();
    assert!(button.configure("text", "y").unwrap());
    assert_eq!(button.cget("text"), Some(Value::from("y")));
    assert!(!button.configure("relief_of_the_day", "y").unwrap());
    assert_eq!(button.cget("relief_of_the_day"), None);
}

#[test]
fn variables_are_reused_and_unregister_reports_unknown() {
    let (_interp, window) = setup("");
    let a = window.register_var("x").unwrap();
    let b = window.register_var("x").unwrap();
    assert!(Rc::ptr_eq(&a, &b));
    assert!(matches!(window.unregister_var("nope"), Err(Error::NotRegistered(_))));
}

#[test]
fn checkbutton_without_variable_auto_binds() {
    let (interp, window) = setup("");
    let cb = CheckButton::new(&window, "Check").unwrap();
    cb.select().unwrap();
    assert!(cb.value().unwrap());
    interp.eval(&format!("set {{{}}} 0", cb.variable().name())).unwrap();
    assert!(!cb.value().unwrap());
}

#[test]
fn shared_variable_links_buttons() {
    let (_interp, window) = setup("");
    let var = window.register_var("agree").unwrap();
    let a = CheckButton::with_variable(&window, "A", &var).unwrap();
    let b = CheckButton::with_variable(&window, "B", &var).unwrap();
    a.invoke().unwrap();
    assert!(b.value().unwrap());
}

#[test]
fn radio_buttons_share_a_group_variable() {
    let (_interp, window) = setup("");
    let size = window.register_var("size").unwrap();
    let s = RadioButton::new(&window, "S", "s", &size).unwrap();
    let m = RadioButton::new(&window, "M", "m", &size).unwrap();
    m.invoke().unwrap();
    assert!(m.is_selected().unwrap());
    s.select().unwrap();
    assert!(!m.is_selected().unwrap());
}

#[test]
fn layout_descriptors_apply_on_manage() {
    let (interp, window) = setup("");
    let label = Label::new(&window, "hi").unwrap();
    let pack = window.pack(&*label, [("side", Value::from("left"))]);
    assert!(interp.widget(label.path()).unwrap().manager.is_none());
    pack.manage().unwrap();
    assert_eq!(interp.widget(label.path()).unwrap().manager.as_deref(), Some("pack"));

    let button = Button::new(&window, "b").unwrap();
    window
        .grid(&*button, [("row", Value::from(1)), ("column", Value::from(0))])
        .manage()
        .unwrap();
    assert_eq!(interp.widget(button.path()).unwrap().layout["row"], "1");
}

#[test]
fn dispose_cleans_interpreter_state() {
    let (interp, window) = setup("");
    let cb = CheckButton::new(&window, "c").unwrap();
    let name = cb.variable().name().to_owned();
    assert!(interp.has_var(&name));

    window.dispose();
    assert!(!interp.has_var(&name));
    assert!(!interp.has_command("tkui_dispatch_w0"));
    assert!(matches!(cb.value(), Err(Error::Released(_))));
    assert!(matches!(Button::new(&window, "late"), Err(Error::Disposed(_))));
}

#[test]
fn dropping_secondary_window_destroys_toplevel() {
    let (interp, window) = setup("");
    {
        let dialog = Window::toplevel(&window, "Dialog").unwrap();
        let _ok = Button::new(&dialog, "OK").unwrap();
        assert!(interp.widget(".w1.w1").is_some());
    }
    assert!(interp.widget(".w1").is_none());
    assert!(interp.widget(".w1.w1").is_none());
    assert!(!interp.has_command("tkui_dispatch_w1"));
}

#[test]
fn callback_error_surfaces_as_interpreter_error() {
    let (interp, window) = setup("");
    let button = Button::new(&window, "boom").unwrap();
    button
        .on_click(|_| Err(Error::NotBoolean("boom".into())))
        .unwrap();
    let err = interp.eval(".w1 invoke").unwrap_err();
    assert!(err.to_string().contains("boom"));
    assert!(button.invoke().is_err());
}

#[test]
fn event_bindings_round_trip_through_interpreter() {
    let (interp, window) = setup("events");
    let button = Button::new(&window, "Hover").unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = log.clone();
    window
        .bind("<Key-Escape>", Some(move |w: &Window| -> tkui::Result<()> {
            l.borrow_mut().push(format!("key {}", w.path()));
            Ok(())
        }))
        .unwrap();
    let l = log.clone();
    button
        .bind("<Enter>", Some(move |b: &Button| -> tkui::Result<()> {
            l.borrow_mut().push(format!("enter {}", b.path()));
            Ok(())
        }))
        .unwrap();

    assert_eq!(interp.history_count("bind . "), 1);
    interp.eval("event generate .w1 <Enter>").unwrap();
    interp.eval("event generate . <Key-Escape>").unwrap();
    interp.eval("event generate . <Enter>").unwrap();
    assert_eq!(*log.borrow(), ["enter .w1", "key ."]);

    window.unbind("<Key-Escape>").unwrap();
    interp.eval("event generate . <Key-Escape>").unwrap();
    assert_eq!(log.borrow().len(), 2);
    assert_eq!(interp.widget(".").unwrap().bindings.len(), 0);
}

#[test]
fn one_primary_window_per_interpreter() {
    let (interp, window) = setup("first");
    assert!(matches!(Window::new(interp.clone(), "second"), Err(Error::AlreadyBound(_))));
    assert_eq!(interp.command_names(), ["tkui_dispatch_w0"]);

    window.dispose();
    let again = Window::new(interp.clone(), "again").unwrap();
    assert_eq!(again.title(), "again");
}

#[test]
fn destroyed_checkbuttons_do_not_leak_variables() {
    let (interp, window) = setup("");
    for i in 0..4 {
        let cb = CheckButton::new(&window, &format!("c{i}")).unwrap();
        let name = cb.variable().name().to_owned();
        cb.destroy().unwrap();
        assert!(!interp.has_var(&name));
    }
    assert!(window.variable(".w1").is_none());
}
