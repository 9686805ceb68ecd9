//! Two-way bindings to interpreter variables.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::interp::Interp;
use crate::tcl;
use crate::value::Value;

/// A live link to one interpreter-level variable.
///
/// There is no host-side copy: every read goes to the interpreter, so a
/// value changed script-side (a checkbutton toggled by the user) is seen
/// immediately.  Variables are created and owned by a
/// [`Window`](crate::Window); releasing one unsets the interpreter variable.
pub struct Variable {
    interp: Rc<dyn Interp>,
    name: String,
    released: Cell<bool>,
}

impl Variable {
    pub(crate) fn create(interp: Rc<dyn Interp>, namespace: &str, logical: &str) -> Result<Self> {
        let name = interp.create_variable(namespace, logical)?;
        log::debug!("created variable {name}");
        Ok(Variable { interp, name, released: Cell::new(false) })
    }

    /// Name the interpreter knows this variable by (the value of a widget's
    /// `-variable` option).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the current value.
    pub fn get(&self) -> Result<String> {
        self.check_live()?;
        Ok(self.interp.get_var(&self.name)?)
    }

    /// Write through to the interpreter.  Booleans are stored as `1`/`0`.
    pub fn set(&self, value: impl Into<Value>) -> Result<()> {
        self.check_live()?;
        self.interp.set_var(&self.name, &value.into().as_str())?;
        Ok(())
    }

    /// Read the value as a Tcl boolean.  An empty value is `false`.
    pub fn as_bool(&self) -> Result<bool> {
        let raw = self.get()?;
        if raw.trim().is_empty() {
            return Ok(false);
        }
        tcl::parse_bool(&raw).ok_or(Error::NotBoolean(raw))
    }

    pub fn is_released(&self) -> bool {
        self.released.get()
    }

    /// Unset the interpreter variable.  Later reads and writes fail with
    /// [`Error::Released`].  Releasing twice is a no-op.
    pub(crate) fn release(&self) -> Result<()> {
        if self.released.replace(true) {
            return Ok(());
        }
        log::debug!("releasing variable {}", self.name);
        self.interp.unset_var(&self.name)?;
        Ok(())
    }

    fn check_live(&self) -> Result<()> {
        if self.released.get() {
            return Err(Error::Released(self.name.clone()));
        }
        Ok(())
    }
}

impl Drop for Variable {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("failed to release variable {}: {e}", self.name);
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("released", &self.released.get())
            .finish()
    }
}
