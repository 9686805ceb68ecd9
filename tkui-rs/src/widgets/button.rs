//! Classic Tk `button`.

use std::ops::Deref;
use std::rc::Rc;

use super::bind_command;
use crate::error::Result;
use crate::options::Options;
use crate::value::Value;
use crate::widget::{Container, TkWidget, Widget};

const OPTIONS: &[&str] = &[
    "text",
    "command",
    "state",
    "width",
    "height",
    "underline",
    "default",
    "image",
    "compound",
    "textvariable",
    "padx",
    "pady",
];

/// A push button.
#[derive(Debug, Clone)]
pub struct Button {
    node: Rc<TkWidget>,
}

impl Button {
    pub fn new<C: Container + ?Sized>(parent: &C, text: &str) -> Result<Button> {
        Self::with_options(parent, text, Vec::<(&str, Value)>::new())
    }

    /// Create with extra initial options.  `text` wins over a `text` entry
    /// in `options`.
    pub fn with_options<'a, C, I>(parent: &C, text: &str, options: I) -> Result<Button>
    where
        C: Container + ?Sized,
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let initial = options.into_iter().chain([("text", Value::from(text))]);
        let declared = Options::declare_keys(OPTIONS.iter().copied());
        let node = TkWidget::create(parent, "button", declared, initial)?;
        Ok(Button { node })
    }

    /// Run `callback` whenever the button is clicked.  Replaces an earlier
    /// callback.
    pub fn on_click<F>(&self, callback: F) -> Result<&Self>
    where
        F: Fn(&Button) -> Result<()> + 'static,
    {
        bind_command(&self.node, move |node| callback(&Button { node: Rc::clone(node) }))?;
        Ok(self)
    }

    /// Bind `callback` to `event` on this button; `None` removes it.
    pub fn bind<F>(&self, event: &str, callback: Option<F>) -> Result<&Self>
    where
        F: Fn(&Button) -> Result<()> + 'static,
    {
        let handler =
            callback.map(|callback| move |node: &Rc<TkWidget>| callback(&Button { node: Rc::clone(node) }));
        self.node.window().bind_widget(&self.node, event, handler)?;
        Ok(self)
    }

    /// `<path> invoke`: run the command as if clicked.
    pub fn invoke(&self) -> Result<()> {
        self.node.exec("invoke", &[])?;
        Ok(())
    }

    /// `<path> flash`.
    pub fn flash(&self) -> Result<()> {
        self.node.exec("flash", &[])?;
        Ok(())
    }

    pub fn set_text(&self, text: &str) -> Result<bool> {
        self.node.configure("text", text)
    }

    pub fn text(&self) -> String {
        self.node.cget("text").map(|v| v.as_str()).unwrap_or_default()
    }

    pub fn node(&self) -> &Rc<TkWidget> {
        &self.node
    }
}

impl Deref for Button {
    type Target = TkWidget;

    fn deref(&self) -> &TkWidget {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::{HeadlessInterp, Interp};
    use crate::widget::Widget;
    use crate::window::Window;
    use std::cell::Cell;

    fn setup() -> (Rc<HeadlessInterp>, Rc<Window>) {
        let interp = Rc::new(HeadlessInterp::new());
        let window = Window::new(interp.clone(), "Buttons").unwrap();
        (interp, window)
    }

    #[test]
    fn creation_passes_text() {
        let (interp, window) = setup();
        let b = Button::new(&window, "Hello world").unwrap();
        assert_eq!(b.path(), ".w1");
        assert_eq!(b.text(), "Hello world");
        assert_eq!(interp.history().last().unwrap(), "button .w1 -text \"Hello world\"");
    }

    #[test]
    fn extra_options() {
        let (interp, window) = setup();
        let b = Button::with_options(&window, "OK", [("width", Value::from(8)), ("bogus", Value::from(1))])
            .unwrap();
        assert_eq!(b.cget("width"), Some(Value::from(8)));
        assert_eq!(b.cget("bogus"), None);
        assert_eq!(interp.widget(".w1").unwrap().options["width"], "8");
    }

    #[test]
    fn click_runs_callback() {
        let (interp, window) = setup();
        let b = Button::new(&window, "Go").unwrap();
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        b.on_click(move |btn| {
            assert_eq!(btn.path(), ".w1");
            c.set(c.get() + 1);
            Ok(())
        })
        .unwrap();
        assert_eq!(
            interp.widget(".w1").unwrap().options["command"],
            "tkui_dispatch_w0 .w1"
        );
        b.invoke().unwrap();
        interp.eval("tkui_dispatch_w0 .w1").unwrap();
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn reregistering_keeps_one_callback() {
        let (_interp, window) = setup();
        let b = Button::new(&window, "Go").unwrap();
        let hits = Rc::new(Cell::new(0));
        b.on_click(|_| Ok(())).unwrap();
        let h = hits.clone();
        b.on_click(move |_| {
            h.set(h.get() + 10);
            Ok(())
        })
        .unwrap();
        b.invoke().unwrap();
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn disabled_button_ignores_invoke() {
        let (_interp, window) = setup();
        let b = Button::new(&window, "Go").unwrap();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        b.on_click(move |_| {
            h.set(h.get() + 1);
            Ok(())
        })
        .unwrap();
        b.configure("state", "disabled").unwrap();
        b.invoke().unwrap();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn flash_and_text_change() {
        let (interp, window) = setup();
        let b = Button::new(&window, "a").unwrap();
        b.flash().unwrap();
        assert!(b.set_text("b").unwrap());
        assert!(!b.set_text("b").unwrap());
        assert_eq!(interp.history_count(".w1 configure -text"), 1);
    }

    #[test]
    fn destroy_removes_widget_and_callback() {
        let (interp, window) = setup();
        let b = Button::new(&window, "x").unwrap();
        b.on_click(|_| Ok(())).unwrap();
        b.destroy().unwrap();
        assert!(interp.widget(".w1").is_none());
        assert!(!window.has_callback(".w1"));
    }

    #[test]
    fn event_binding_passes_button() {
        let (interp, window) = setup();
        let b = Button::new(&window, "Hover").unwrap();
        let seen = Rc::new(Cell::new(false));
        let s = seen.clone();
        b.bind("<Enter>", Some(move |btn: &Button| -> Result<()> {
            s.set(btn.text() == "Hover");
            Ok(())
        }))
        .unwrap();
        interp.eval("event generate .w1 <Enter>").unwrap();
        assert!(seen.get());

        b.bind("<Enter>", None::<fn(&Button) -> Result<()>>).unwrap();
        assert!(interp.widget(".w1").unwrap().bindings.is_empty());
    }

    #[test]
    fn destroy_disarms_everything() {
        let (interp, window) = setup();
        let b = Button::new(&window, "Bye").unwrap();
        b.on_click(|_| Ok(())).unwrap();
        b.bind("<Enter>", Some(|_: &Button| -> Result<()> { Ok(()) })).unwrap();
        b.destroy().unwrap();
        assert!(b.is_destroyed());
        assert!(!window.has_callback(".w1"));
        assert!(!window.has_binding(".w1", "<Enter>"));
        assert!(interp.widget(".w1").is_none());
        b.destroy().unwrap();
    }
}
