//! Geometry-manager descriptors.
//!
//! [`Window::pack`](crate::Window::pack) and
//! [`Window::grid`](crate::Window::grid) return a descriptor; nothing reaches
//! the interpreter until `manage()` is called.

use std::rc::Rc;

use crate::error::Result;
use crate::interp::Interp;
use crate::tcl;
use crate::value::Value;

/// Shared state of a layout descriptor.
#[derive(Clone)]
struct Placement {
    interp: Rc<dyn Interp>,
    path: String,
    options: Vec<(String, Value)>,
}

impl Placement {
    fn new<'a, I>(interp: Rc<dyn Interp>, path: &str, options: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut placement = Placement { interp, path: path.to_owned(), options: Vec::new() };
        for (name, value) in options {
            placement.set(name, value);
        }
        placement
    }

    fn set(&mut self, name: &str, value: Value) {
        match self.options.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.options.push((name.to_owned(), value)),
        }
    }

    fn manage(&self, manager: &str) -> Result<()> {
        let mut words = vec![self.path.clone()];
        for (name, value) in &self.options {
            words.push(format!("-{name}"));
            words.push(tcl::quote(&value.as_str()));
        }
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        self.interp.eval_args(manager, &words)?;
        log::debug!("{manager} {}", self.path);
        Ok(())
    }

    fn forget(&self, manager: &str) -> Result<()> {
        self.interp.eval_args(manager, &["forget", self.path.as_str()])?;
        Ok(())
    }
}

macro_rules! layout {
    ($(#[$doc:meta])* $name:ident, $command:literal) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name(Placement);

        impl $name {
            pub(crate) fn new<'a, I>(interp: Rc<dyn Interp>, path: &str, options: I) -> Self
            where
                I: IntoIterator<Item = (&'a str, Value)>,
            {
                $name(Placement::new(interp, path, options))
            }

            /// Add or replace one option.
            pub fn option(mut self, name: &str, value: impl Into<Value>) -> Self {
                self.0.set(name, value.into());
                self
            }

            /// Path of the managed widget.
            pub fn path(&self) -> &str {
                &self.0.path
            }

            /// Options in the order they will be passed.
            pub fn options(&self) -> &[(String, Value)] {
                &self.0.options
            }

            #[doc = concat!("Evaluate `", $command, " <path> -opt value…`.")]
            pub fn manage(&self) -> Result<()> {
                self.0.manage($command)
            }

            #[doc = concat!("Evaluate `", $command, " forget <path>`.")]
            pub fn forget(&self) -> Result<()> {
                self.0.forget($command)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("path", &self.0.path)
                    .field("options", &self.0.options)
                    .finish()
            }
        }
    };
}

layout!(
    /// A `pack` placement.
    Pack,
    "pack"
);

layout!(
    /// A `grid` placement (`row`, `column`, `sticky`, …).
    Grid,
    "grid"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::HeadlessInterp;

    #[test]
    fn pack_manage_and_forget() {
        let interp = Rc::new(HeadlessInterp::new());
        interp.eval("label .w1").unwrap();
        let pack = Pack::new(interp.clone(), ".w1", [("side", Value::from("left"))])
            .option("padx", 4)
            .option("side", "top");
        assert_eq!(pack.options().len(), 2);
        pack.manage().unwrap();
        assert_eq!(interp.history().last().unwrap(), "pack .w1 -side top -padx 4");

        let rec = interp.widget(".w1").unwrap();
        assert_eq!(rec.manager.as_deref(), Some("pack"));
        assert_eq!(rec.layout["padx"], "4");

        pack.forget().unwrap();
        assert_eq!(interp.widget(".w1").unwrap().manager, None);
    }

    #[test]
    fn grid_quotes_values() {
        let interp = Rc::new(HeadlessInterp::new());
        interp.eval("label .w1").unwrap();
        Grid::new(interp.clone(), ".w1", [("row", Value::from(0))])
            .option("sticky", "n s")
            .manage()
            .unwrap();
        assert_eq!(interp.history().last().unwrap(), "grid .w1 -row 0 -sticky \"n s\"");
        assert_eq!(interp.widget(".w1").unwrap().layout["sticky"], "n s");
    }

    #[test]
    fn managing_a_missing_widget_fails() {
        let interp = Rc::new(HeadlessInterp::new());
        assert!(Pack::new(interp, ".nope", [("side", Value::from("left"))]).manage().is_err());
    }
}
