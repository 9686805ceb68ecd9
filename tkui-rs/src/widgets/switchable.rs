//! Buttons with an on/off state held in an interpreter variable.
//!
//! The variable is the single source of truth.  Script-side changes (the
//! user clicking the widget) and host-side [`SwitchableButton::select`]
//! calls write the same variable, so there is nothing to synchronise.

use std::ops::Deref;
use std::rc::Rc;

use super::{bind_command, TTK_BUTTON_OPTIONS};
use crate::error::Result;
use crate::options::Options;
use crate::value::Value;
use crate::variable::Variable;
use crate::widget::{Container, TkWidget, Widget};

/// Shared core of check and radio buttons.
#[derive(Debug, Clone)]
pub struct SwitchableButton {
    node: Rc<TkWidget>,
    variable: Rc<Variable>,
}

impl SwitchableButton {
    /// Create a `class` widget bound to `variable`, or to a fresh variable
    /// registered under the widget's own path when `variable` is `None`.
    pub fn create<'a, C, I>(
        parent: &C,
        class: &'static str,
        declared: Options,
        initial: I,
        variable: Option<&Rc<Variable>>,
    ) -> Result<SwitchableButton>
    where
        C: Container + ?Sized,
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let declared = declared.merge_keys(["variable"]);

        if let Some(variable) = variable {
            let bound = [("variable", Value::from(variable.name()))];
            let node = TkWidget::create(parent, class, declared, initial.into_iter().chain(bound))?;
            return Ok(SwitchableButton { node, variable: Rc::clone(variable) });
        }

        let node = TkWidget::create(parent, class, declared, initial)?;
        match Self::bind_own_variable(&node) {
            Ok(variable) => Ok(SwitchableButton { node, variable }),
            Err(e) => {
                if let Err(cleanup) = node.destroy() {
                    log::warn!("failed to destroy {}: {cleanup}", node.path());
                }
                Err(e)
            }
        }
    }

    fn bind_own_variable(node: &Rc<TkWidget>) -> Result<Rc<Variable>> {
        let variable = node.window().register_var(node)?;
        node.set_owns_variable();
        node.configure("variable", variable.name())?;
        Ok(variable)
    }

    pub fn select(&self) -> Result<()> {
        self.set_value(true)
    }

    pub fn deselect(&self) -> Result<()> {
        self.set_value(false)
    }

    /// Current state, read from the interpreter.
    pub fn value(&self) -> Result<bool> {
        self.variable.as_bool()
    }

    pub fn set_value(&self, value: bool) -> Result<()> {
        self.variable.set(value)
    }

    pub fn variable(&self) -> &Rc<Variable> {
        &self.variable
    }

    pub fn node(&self) -> &Rc<TkWidget> {
        &self.node
    }
}

impl Deref for SwitchableButton {
    type Target = TkWidget;

    fn deref(&self) -> &TkWidget {
        &self.node
    }
}

// ── CheckButton ───────────────────────────────────────────────────────────────

/// `ttk::checkbutton`.
#[derive(Debug, Clone)]
pub struct CheckButton(SwitchableButton);

impl CheckButton {
    pub fn new<C: Container + ?Sized>(parent: &C, text: &str) -> Result<CheckButton> {
        Self::build(parent, text, None)
    }

    /// Bind to an existing variable instead of registering one.
    pub fn with_variable<C: Container + ?Sized>(
        parent: &C,
        text: &str,
        variable: &Rc<Variable>,
    ) -> Result<CheckButton> {
        Self::build(parent, text, Some(variable))
    }

    fn build<C: Container + ?Sized>(
        parent: &C,
        text: &str,
        variable: Option<&Rc<Variable>>,
    ) -> Result<CheckButton> {
        let declared = Options::declare_keys(TTK_BUTTON_OPTIONS.iter().copied())
            .merge_keys(["onvalue", "offvalue"]);
        let inner = SwitchableButton::create(
            parent,
            "ttk::checkbutton",
            declared,
            [("text", Value::from(text))],
            variable,
        )?;
        Ok(CheckButton(inner))
    }

    /// Run `callback` after each user toggle.
    pub fn on_toggle<F>(&self, callback: F) -> Result<&Self>
    where
        F: Fn(&CheckButton) -> Result<()> + 'static,
    {
        let variable = Rc::clone(&self.0.variable);
        bind_command(&self.0.node, move |node| {
            callback(&CheckButton(SwitchableButton {
                node: Rc::clone(node),
                variable: Rc::clone(&variable),
            }))
        })?;
        Ok(self)
    }

    /// `<path> invoke`: toggle as if clicked.
    pub fn invoke(&self) -> Result<()> {
        self.0.node.exec("invoke", &[])?;
        Ok(())
    }
}

impl Deref for CheckButton {
    type Target = SwitchableButton;

    fn deref(&self) -> &SwitchableButton {
        &self.0
    }
}

// ── RadioButton ───────────────────────────────────────────────────────────────

/// `ttk::radiobutton`.  Radio buttons sharing a variable form a group; the
/// variable holds the `value` of the selected one.
#[derive(Debug, Clone)]
pub struct RadioButton {
    inner: SwitchableButton,
    value: String,
}

impl RadioButton {
    pub fn new<C: Container + ?Sized>(
        parent: &C,
        text: &str,
        value: &str,
        variable: &Rc<Variable>,
    ) -> Result<RadioButton> {
        let declared = Options::declare_keys(TTK_BUTTON_OPTIONS.iter().copied()).merge_keys(["value"]);
        let inner = SwitchableButton::create(
            parent,
            "ttk::radiobutton",
            declared,
            [("text", Value::from(text)), ("value", Value::from(value))],
            Some(variable),
        )?;
        Ok(RadioButton { inner, value: value.to_owned() })
    }

    /// Make this the selected button of its group.
    pub fn select(&self) -> Result<()> {
        self.inner.variable.set(self.value.as_str())
    }

    /// Clear the group's selection if this button holds it.
    pub fn deselect(&self) -> Result<()> {
        if self.is_selected()? {
            self.inner.variable.set("")?;
        }
        Ok(())
    }

    pub fn is_selected(&self) -> Result<bool> {
        Ok(self.inner.variable.get()? == self.value)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Run `callback` when the user selects this button.
    pub fn on_select<F>(&self, callback: F) -> Result<&Self>
    where
        F: Fn(&RadioButton) -> Result<()> + 'static,
    {
        let variable = Rc::clone(&self.inner.variable);
        let value = self.value.clone();
        bind_command(&self.inner.node, move |node| {
            callback(&RadioButton {
                inner: SwitchableButton { node: Rc::clone(node), variable: Rc::clone(&variable) },
                value: value.clone(),
            })
        })?;
        Ok(self)
    }

    pub fn invoke(&self) -> Result<()> {
        self.inner.node.exec("invoke", &[])?;
        Ok(())
    }

    pub fn variable(&self) -> &Rc<Variable> {
        &self.inner.variable
    }
}

impl Deref for RadioButton {
    type Target = TkWidget;

    fn deref(&self) -> &TkWidget {
        &self.inner.node
    }
}
