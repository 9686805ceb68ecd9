//! Themed `ttk::label`.

use std::ops::Deref;
use std::rc::Rc;

use crate::error::Result;
use crate::options::Options;
use crate::value::Value;
use crate::variable::Variable;
use crate::widget::{Container, TkWidget};

const OPTIONS: &[&str] = &[
    "text",
    "textvariable",
    "anchor",
    "justify",
    "width",
    "wraplength",
    "image",
    "compound",
    "padding",
    "relief",
    "style",
];

#[derive(Debug, Clone)]
pub struct Label {
    node: Rc<TkWidget>,
}

impl Label {
    pub fn new<C: Container + ?Sized>(parent: &C, text: &str) -> Result<Label> {
        let declared = Options::declare_keys(OPTIONS.iter().copied());
        let node = TkWidget::create(parent, "ttk::label", declared, [("text", Value::from(text))])?;
        Ok(Label { node })
    }

    pub fn set_text(&self, text: &str) -> Result<bool> {
        self.node.configure("text", text)
    }

    pub fn text(&self) -> String {
        self.node.cget("text").map(|v| v.as_str()).unwrap_or_default()
    }

    /// Display the value of `variable` instead of the static text.
    pub fn bind_text(&self, variable: &Variable) -> Result<bool> {
        self.node.configure("textvariable", variable.name())
    }

    pub fn node(&self) -> &Rc<TkWidget> {
        &self.node
    }
}

impl Deref for Label {
    type Target = TkWidget;

    fn deref(&self) -> &TkWidget {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::HeadlessInterp;
    use crate::window::Window;

    #[test]
    fn label_text_round_trip() {
        let interp = Rc::new(HeadlessInterp::new());
        let window = Window::new(interp.clone(), "").unwrap();
        let label = Label::new(&window, "Status: ok").unwrap();
        assert_eq!(interp.widget(".w1").unwrap().class, "ttk::label");
        assert!(label.set_text("Status: {busy}").unwrap());
        assert_eq!(label.text(), "Status: {busy}");
        assert_eq!(interp.widget(".w1").unwrap().options["text"], "Status: {busy}");
    }

    #[test]
    fn bind_text_uses_variable_name() {
        let interp = Rc::new(HeadlessInterp::new());
        let window = Window::new(interp.clone(), "").unwrap();
        let label = Label::new(&window, "").unwrap();
        let var = window.register_var("status").unwrap();
        label.bind_text(&var).unwrap();
        assert_eq!(interp.widget(".w1").unwrap().options["textvariable"], "w0(status)");
    }
}
