//! The interpreter handle consumed by the bridge.
//!
//! The bridge never evaluates Tcl itself.  It needs these things
//! from the runtime that owns the toolkit:
//!
//! | Need                        | Method                                   |
//! |-----------------------------|------------------------------------------|
//! | run a scripted command      | [`Interp::eval`] / [`Interp::eval_args`] |
//! | expose a host callback      | [`Interp::create_command`]               |
//! | detect a taken command name | [`Interp::has_command`]                  |
//! | share a named variable      | [`Interp::create_variable`] and friends  |
//!
//! All methods take `&self`: one handle is shared (`Rc<dyn Interp>`) by every
//! window created on it, and commands may call back into the interpreter
//! while it is evaluating.  Implementations must therefore never hold an
//! internal borrow across the invocation of a created command.
//!
//! [`HeadlessInterp`] is an in-process implementation used by the tests,
//! the demo and anyone driving the bridge without a display.

pub mod headless;

use std::rc::Rc;

use crate::error::InterpError;

pub use headless::HeadlessInterp;

/// A host function registered as an interpreter command.
///
/// Receives the command's arguments (without the command name) and returns
/// the command result.
pub type CommandFn = Rc<dyn Fn(&[String]) -> Result<String, InterpError>>;

/// Handle to a single-threaded Tcl interpreter.
pub trait Interp {
    /// Evaluate a script and return its result.
    fn eval(&self, script: &str) -> Result<String, InterpError>;

    /// Create (or replace) a command named `name`.
    fn create_command(&self, name: &str, command: CommandFn);

    /// Delete a command.  Returns `true` if it existed.
    fn delete_command(&self, name: &str) -> bool;

    /// `true` if a command created through [`Interp::create_command`] exists
    /// under `name`.
    fn has_command(&self, name: &str) -> bool;

    /// Create a variable `logical` inside `namespace` and return the name the
    /// interpreter knows it by.  An existing variable keeps its value; a new
    /// one starts out empty.
    fn create_variable(&self, namespace: &str, logical: &str) -> Result<String, InterpError>;

    fn get_var(&self, name: &str) -> Result<String, InterpError>;

    fn set_var(&self, name: &str, value: &str) -> Result<(), InterpError>;

    fn unset_var(&self, name: &str) -> Result<(), InterpError>;

    /// Evaluate `command` followed by `args`.
    ///
    /// Arguments are joined verbatim; callers pass every interpolated value
    /// through [`crate::tcl::quote`] first.
    fn eval_args(&self, command: &str, args: &[&str]) -> Result<String, InterpError> {
        let mut script = String::from(command);
        for arg in args {
            script.push(' ');
            script.push_str(arg);
        }
        self.eval(&script)
    }
}

/// Name of the array element holding `logical` in `namespace`.
pub fn qualified_var_name(namespace: &str, logical: &str) -> String {
    format!("{namespace}({logical})")
}
