//! Tcl/Tk widget bindings.
//!
//! The crate bridges host code and a Tk-enabled Tcl interpreter:
//!
//! * [`Window`] owns a widget tree, dispatches widget callbacks through one
//!   interpreter command per window and owns the tree's variables;
//! * [`Variable`] is a live two-way binding to an interpreter variable;
//! * [`Options`] is the declared-option bag every widget carries;
//! * [`widgets`] holds the concrete widgets built on [`TkWidget`].
//!
//! Everything is single-threaded (`Rc`/`RefCell`) and re-entrant: callbacks
//! run on the interpreter thread and may evaluate further scripts.
//!
//! ```
//! use std::rc::Rc;
//! use tkui::interp::HeadlessInterp;
//! use tkui::widgets::Button;
//! use tkui::Window;
//!
//! let interp = Rc::new(HeadlessInterp::new());
//! let window = Window::new(interp.clone(), "Demo")?;
//! let button = Button::new(&window, "Quit")?;
//! button.on_click(|_| Ok(()))?;
//! button.invoke()?;
//! # Ok::<(), tkui::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod interp;
pub mod layout;
pub mod logging;
pub mod options;
pub mod tcl;
pub mod value;
pub mod variable;
pub mod widget;
pub mod widgets;
pub mod window;

pub use config::{find_user_config, BridgeConfig, ConfigError};
pub use error::{Error, InterpError, Result};
pub use interp::{HeadlessInterp, Interp};
pub use layout::{Grid, Pack};
pub use logging::{init_logging, LoggingConfig};
pub use options::Options;
pub use value::Value;
pub use variable::Variable;
pub use widget::{Container, TkWidget, VarSource, Widget, WidgetId};
pub use window::{Window, WindowState};
