//! Themed `ttk::frame`, a plain container.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::Result;
use crate::options::Options;
use crate::value::Value;
use crate::widget::{Container, TkWidget, Widget};

/// Border style of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relief {
    Flat,
    Groove,
    Raised,
    Ridge,
    Solid,
    Sunken,
}

impl Relief {
    pub const ALL: [Relief; 6] = [
        Relief::Flat,
        Relief::Groove,
        Relief::Raised,
        Relief::Ridge,
        Relief::Solid,
        Relief::Sunken,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Relief::Flat => "flat",
            Relief::Groove => "groove",
            Relief::Raised => "raised",
            Relief::Ridge => "ridge",
            Relief::Solid => "solid",
            Relief::Sunken => "sunken",
        }
    }
}

impl fmt::Display for Relief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relief {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        Relief::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid relief {:?}", s))
    }
}

impl From<Relief> for Value {
    fn from(r: Relief) -> Self {
        Value::from(r.as_str())
    }
}

const OPTIONS: &[&str] = &["padding", "borderwidth", "relief", "width", "height"];

/// A container; widgets created with the frame as parent nest under its
/// path.
#[derive(Debug, Clone)]
pub struct Frame {
    node: Rc<TkWidget>,
}

impl Frame {
    pub fn new<C: Container + ?Sized>(parent: &C) -> Result<Frame> {
        Self::with_options(parent, Vec::<(&str, Value)>::new())
    }

    pub fn with_options<'a, C, I>(parent: &C, options: I) -> Result<Frame>
    where
        C: Container + ?Sized,
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let declared = Options::declare_keys(OPTIONS.iter().copied());
        let node = TkWidget::create(parent, "ttk::frame", declared, options)?;
        Ok(Frame { node })
    }

    pub fn set_relief(&self, relief: Relief) -> Result<bool> {
        self.node.configure("relief", relief)
    }

    pub fn relief(&self) -> Option<Relief> {
        self.node.cget("relief")?.as_str().parse().ok()
    }

    /// Tk padding spec: one to four distances (`"4"`, `"4 2"`, …).
    pub fn set_padding(&self, padding: &str) -> Result<bool> {
        self.node.configure("padding", padding)
    }

    pub fn node(&self) -> &Rc<TkWidget> {
        &self.node
    }
}

impl Container for Frame {
    fn as_parent(&self) -> Rc<dyn Widget> {
        Rc::clone(&self.node) as Rc<dyn Widget>
    }
}

impl Deref for Frame {
    type Target = TkWidget;

    fn deref(&self) -> &TkWidget {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::HeadlessInterp;
    use crate::widgets::Button;
    use crate::window::Window;

    #[test]
    fn relief_parse() {
        assert_eq!("SUNKEN".parse::<Relief>().unwrap(), Relief::Sunken);
        assert!("wavy".parse::<Relief>().is_err());
    }

    #[test]
    fn children_nest_under_frame() {
        let interp = Rc::new(HeadlessInterp::new());
        let window = Window::new(interp.clone(), "").unwrap();
        let frame = Frame::with_options(&window, [("padding", Value::from("4 2"))]).unwrap();
        let button = Button::new(&frame, "inner").unwrap();
        assert_eq!(frame.path(), ".w1");
        assert_eq!(button.path(), ".w1.w2");
        assert_eq!(button.parent().path(), ".w1");
        assert_eq!(button.window().path(), ".");
        assert!(interp.widget(".w1.w2").is_some());
        assert_eq!(interp.widget(".w1").unwrap().options["padding"], "4 2");
    }

    #[test]
    fn relief_forwarding() {
        let interp = Rc::new(HeadlessInterp::new());
        let window = Window::new(interp.clone(), "").unwrap();
        let frame = Frame::new(&window).unwrap();
        assert_eq!(frame.relief(), None);
        assert!(frame.set_relief(Relief::Groove).unwrap());
        assert!(!frame.set_relief(Relief::Groove).unwrap());
        assert_eq!(frame.relief(), Some(Relief::Groove));
        assert_eq!(interp.widget(".w1").unwrap().options["relief"], "groove");
    }

    #[test]
    fn destroying_frame_removes_children() {
        let interp = Rc::new(HeadlessInterp::new());
        let window = Window::new(interp.clone(), "").unwrap();
        let frame = Frame::new(&window).unwrap();
        let _inner = Button::new(&frame, "x").unwrap();
        frame.destroy().unwrap();
        assert!(interp.widget(".w1.w2").is_none());
    }
}
