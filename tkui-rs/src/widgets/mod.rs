//! Concrete widgets.
//!
//! Each type wraps an `Rc<TkWidget>` node, declares the options it accepts
//! and adds a typed API.  They deref to [`TkWidget`] for the generic
//! `configure` / `cget` / `destroy` protocol.
//!
//! Callbacks receive the widget they were registered for.  Capturing a
//! handle to that same widget inside its callback keeps it alive for as long
//! as the window.

pub mod button;
pub mod frame;
pub mod label;
pub mod switchable;

use std::rc::Rc;

pub use button::Button;
pub use frame::{Frame, Relief};
pub use label::Label;
pub use switchable::{CheckButton, RadioButton, SwitchableButton};

use crate::error::Result;
use crate::widget::{TkWidget, Widget};

/// Options shared by the themed button family.
pub(crate) const TTK_BUTTON_OPTIONS: &[&str] = &[
    "text",
    "command",
    "state",
    "width",
    "underline",
    "image",
    "compound",
    "textvariable",
    "style",
    "takefocus",
];

/// Register `callback` with the node's window and install the returned token
/// as the node's `-command`.
pub(crate) fn bind_command<F>(node: &Rc<TkWidget>, callback: F) -> Result<()>
where
    F: Fn(&Rc<TkWidget>) -> Result<()> + 'static,
{
    let token = node.window().register_callback(node, callback)?;
    node.configure("command", token)?;
    Ok(())
}
