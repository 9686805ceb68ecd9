//! Widget identity and the widget tree.
//!
//! [`Widget`] is the capability shared by everything that can sit in the
//! tree.  It is sealed: the only implementers are [`Window`] (the root, whose
//! `parent()` and `window()` return itself) and [`TkWidget`] (every other
//! node).  Concrete widgets such as [`Button`](crate::widgets::Button) wrap a
//! `TkWidget` and add a typed API on top.
//!
//! Paths are derived from ids: `.` for the primary window, `.w<id>` for its
//! children, and `<parent>.w<id>` below any other container.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::options::Options;
use crate::tcl;
use crate::value::Value;
use crate::window::Window;

/// Per-window widget number.  `0` is the primary window.
pub type WidgetId = u32;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Something placeable in the widget tree.
pub trait Widget: sealed::Sealed {
    fn id(&self) -> WidgetId;

    /// Interpreter path name (`.`, `.w3`, `.w3.w7`).
    fn path(&self) -> &str;

    /// Tk class command used to create the widget (`button`, `toplevel`, …).
    fn class(&self) -> &str;

    fn parent(&self) -> Rc<dyn Widget>;

    /// The window this widget belongs to.
    fn window(&self) -> Rc<Window>;

    fn options(&self) -> Ref<'_, Options>;
}

/// Path of child `id` under `parent`.
pub fn child_path(parent: &str, id: WidgetId) -> String {
    if parent == "." {
        format!(".w{id}")
    } else {
        format!("{parent}.w{id}")
    }
}

// ── Container ─────────────────────────────────────────────────────────────────

/// Widgets that can hold children: windows and frames.
pub trait Container {
    fn as_parent(&self) -> Rc<dyn Widget>;
}

impl Container for Rc<Window> {
    fn as_parent(&self) -> Rc<dyn Widget> {
        Rc::clone(self) as Rc<dyn Widget>
    }
}

// ── VarSource ─────────────────────────────────────────────────────────────────

/// Where a variable's logical name comes from.
#[derive(Clone, Copy)]
pub enum VarSource<'a> {
    /// Keyed by the widget's path.
    Widget(&'a dyn Widget),
    Name(&'a str),
}

impl<'a> VarSource<'a> {
    pub fn logical_name(&self) -> &'a str {
        match *self {
            VarSource::Widget(w) => w.path(),
            VarSource::Name(name) => name,
        }
    }
}

impl<'a> From<&'a str> for VarSource<'a> {
    fn from(name: &'a str) -> Self {
        VarSource::Name(name)
    }
}

impl<'a> From<&'a String> for VarSource<'a> {
    fn from(name: &'a String) -> Self {
        VarSource::Name(name)
    }
}

impl<'a> From<&'a TkWidget> for VarSource<'a> {
    fn from(w: &'a TkWidget) -> Self {
        VarSource::Widget(w)
    }
}

impl<'a> From<&'a Rc<TkWidget>> for VarSource<'a> {
    fn from(w: &'a Rc<TkWidget>) -> Self {
        VarSource::Widget(&**w)
    }
}

impl<'a> From<&'a Window> for VarSource<'a> {
    fn from(w: &'a Window) -> Self {
        VarSource::Widget(w)
    }
}

// ── TkWidget ──────────────────────────────────────────────────────────────────

/// A non-root node of the widget tree.
///
/// Dropping the last handle disarms the widget's callback and event
/// bindings (the window's registry only holds weak references) but leaves the interpreter-side
/// widget in place; call [`TkWidget::destroy`] to remove it.
pub struct TkWidget {
    window: Rc<Window>,
    parent: Rc<dyn Widget>,
    id: WidgetId,
    path: String,
    class: &'static str,
    options: RefCell<Options>,
    owns_variable: Cell<bool>,
    destroyed: Cell<bool>,
}

impl TkWidget {
    /// Allocate an id under `parent`'s window, apply `initial` to the
    /// declared options and evaluate the creation command.
    ///
    /// Initial values for undeclared options are ignored.
    pub fn create<'a, C, I>(
        parent: &C,
        class: &'static str,
        declared: Options,
        initial: I,
    ) -> Result<Rc<Self>>
    where
        C: Container + ?Sized,
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let parent = parent.as_parent();
        let window = parent.window();
        window.check_live()?;

        let id = window.allocate_id();
        let path = child_path(parent.path(), id);
        let mut options = declared;
        for (name, value) in initial {
            options.set(name, value);
        }

        let mut words = vec![path.clone()];
        words.extend(options.to_args());
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        window.interp().eval_args(class, &words)?;
        log::debug!("created {class} {path}");

        Ok(Rc::new(TkWidget {
            window,
            parent,
            id,
            path,
            class,
            options: RefCell::new(options),
            owns_variable: Cell::new(false),
            destroyed: Cell::new(false),
        }))
    }

    /// Set a declared option and forward it as `<path> configure -name value`
    /// when the value actually changed.
    ///
    /// Returns `Ok(true)` if a configure command was issued.  Writes to
    /// undeclared options are ignored.  The stored value is only updated once
    /// the interpreter accepted it.
    pub fn configure(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        let value = value.into();
        {
            let options = self.options.borrow();
            if !options.has(name) {
                log::debug!("{}: ignoring undeclared option '{name}'", self.path);
                return Ok(false);
            }
            if options.get(name) == Some(&value) {
                return Ok(false);
            }
        }
        let flag = format!("-{name}");
        let quoted = tcl::quote(&value.as_str());
        self.window
            .interp()
            .eval_args(&self.path, &["configure", flag.as_str(), quoted.as_str()])?;
        self.options.borrow_mut().set(name, value);
        Ok(true)
    }

    /// In-memory value of an option; no interpreter round-trip.
    pub fn cget(&self, name: &str) -> Option<Value> {
        self.options.borrow().get(name).cloned()
    }

    /// Run a widget subcommand (`<path> <sub> args…`).
    pub fn exec(&self, sub: &str, args: &[&str]) -> Result<String> {
        let mut words = Vec::with_capacity(args.len() + 1);
        words.push(sub);
        words.extend_from_slice(args);
        Ok(self.window.interp().eval_args(&self.path, &words)?)
    }

    /// Mark the variable registered under this widget's path as owned by it,
    /// so [`TkWidget::destroy`] unregisters it.
    pub(crate) fn set_owns_variable(&self) {
        self.owns_variable.set(true);
    }

    /// Destroy the interpreter-side widget, drop its callback and event
    /// bindings, and unregister the variable it registered for itself.
    pub fn destroy(&self) -> Result<()> {
        if self.destroyed.replace(true) {
            return Ok(());
        }
        self.window.forget_callback(&self.path);
        if self.owns_variable.replace(false) {
            match self.window.unregister_var(&self.path) {
                // Already released by dispose.
                Ok(()) | Err(Error::NotRegistered(_)) => {}
                Err(e) => log::warn!("{}: failed to release own variable: {e}", self.path),
            }
        }
        self.window.interp().eval_args("destroy", &[self.path.as_str()])?;
        log::debug!("destroyed {}", self.path);
        Ok(())
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

impl sealed::Sealed for TkWidget {}

impl Widget for TkWidget {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn class(&self) -> &str {
        self.class
    }

    fn parent(&self) -> Rc<dyn Widget> {
        Rc::clone(&self.parent)
    }

    fn window(&self) -> Rc<Window> {
        Rc::clone(&self.window)
    }

    fn options(&self) -> Ref<'_, Options> {
        self.options.borrow()
    }
}

impl Drop for TkWidget {
    fn drop(&mut self) {
        self.window.forget_callback(&self.path);
    }
}

impl fmt::Debug for TkWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TkWidget")
            .field("path", &self.path)
            .field("class", &self.class)
            .field("options", &*self.options.borrow())
            .finish()
    }
}
