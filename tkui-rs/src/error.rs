//! Error types.
//!
//! [`InterpError`] is what the interpreter side reports: a rejected script,
//! an unknown command, a missing variable.  It is also what the bridge hands
//! back to the interpreter when a host callback fails, so that the failure
//! travels through the interpreter's own error path.
//!
//! [`Error`] is the crate-level error returned by every bridge operation.

use thiserror::Error;

// ── InterpError ───────────────────────────────────────────────────────────────

/// A failure raised by (or reported to) the Tcl interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpError {
    /// Generic script failure, carrying the interpreter's message.
    #[error("{0}")]
    Script(String),
    #[error("invalid command name \"{0}\"")]
    UnknownCommand(String),
    #[error("can't read \"{0}\": no such variable")]
    NoSuchVariable(String),
    /// Argument count mismatch; the payload is the usage string.
    #[error("wrong # args: should be \"{0}\"")]
    WrongArgs(String),
    /// A host callback reached through a dispatch command failed.
    #[error("callback for \"{path}\" failed: {message}")]
    Callback { path: String, message: String },
}

// ── Error ─────────────────────────────────────────────────────────────────────

/// Errors returned by the bridge.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Interp(#[from] InterpError),
    /// Unregistering a variable or callback that was never registered.
    #[error("\"{0}\" is not registered")]
    NotRegistered(String),
    /// The window was disposed; its registries no longer accept entries.
    #[error("window \"{0}\" has been disposed")]
    Disposed(String),
    /// The variable was released and no longer exists in the interpreter.
    #[error("variable \"{0}\" has been released")]
    Released(String),
    #[error("expected boolean value but got \"{0}\"")]
    NotBoolean(String),
    /// Another window already owns this dispatch command on the interpreter.
    #[error("dispatch command \"{0}\" is already bound to a window")]
    AlreadyBound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
