//! The window bridge.
//!
//! A [`Window`] is the root of one widget tree and the only object that
//! talks to the interpreter on the tree's behalf:
//!
//! * it hands out widget ids from a private counter;
//! * it owns the callback registry and the single interpreter command
//!   (`<prefix>_<VarName>`) through which every widget callback of the tree
//!   is dispatched;
//! * it owns the variable registry, namespaced under its VarName;
//! * it forwards the window-manager properties `title`, `state` and
//!   `geometry`.
//!
//! Widgets register a callback and embed the returned token
//! (`"<dispatch command> <path>"`) as their `-command`.  When the user clicks,
//! the interpreter evaluates the token, the dispatch command looks the path
//! up and calls the callback with the widget.
//!
//! Event bindings ([`Window::bind`], [`Window::bind_widget`]) go through the
//! same command with a second word: `"<dispatch command> <path> <event>"`.
//!
//! Teardown is explicit ([`Window::dispose`]) and also runs on drop.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use crate::config::{BridgeConfig, DEFAULT_DISPATCH_PREFIX};
use crate::error::{Error, InterpError, Result};
use crate::interp::{CommandFn, Interp};
use crate::layout::{Grid, Pack};
use crate::options::Options;
use crate::tcl;
use crate::value::Value;
use crate::variable::Variable;
use crate::widget::{child_path, sealed, TkWidget, VarSource, Widget, WidgetId};

// ── WindowState ───────────────────────────────────────────────────────────────

/// Values accepted by `wm state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowState {
    Normal,
    Iconic,
    Withdrawn,
    Icon,
    Zoomed,
}

impl WindowState {
    pub const ALL: [WindowState; 5] = [
        WindowState::Normal,
        WindowState::Iconic,
        WindowState::Withdrawn,
        WindowState::Icon,
        WindowState::Zoomed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WindowState::Normal => "normal",
            WindowState::Iconic => "iconic",
            WindowState::Withdrawn => "withdrawn",
            WindowState::Icon => "icon",
            WindowState::Zoomed => "zoomed",
        }
    }
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowState {
    type Err = String;

    /// Case-insensitive parse.
    fn from_str(s: &str) -> std::result::Result<Self, String> {
        let lower = s.to_ascii_lowercase();
        WindowState::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == lower)
            .ok_or_else(|| format!("invalid window state {:?}", s))
    }
}

// ── Registries ────────────────────────────────────────────────────────────────

type Callback = Rc<dyn Fn(&Rc<TkWidget>) -> Result<()>>;

struct CallbackEntry {
    widget: Weak<TkWidget>,
    callback: Callback,
}

/// Returns `Ok(false)` when the bound window or widget is gone.
type EventHandler = Rc<dyn Fn() -> Result<bool>>;

/// VarName of the window at `path`: `w0` for the primary window, otherwise
/// the path without its leading dot, with dots turned into underscores.
pub fn window_var_name(path: &str) -> String {
    if path == "." {
        "w0".to_owned()
    } else {
        path.trim_start_matches('.').replace('.', "_")
    }
}

// ── Window ────────────────────────────────────────────────────────────────────

/// Root of a widget tree, bound to one toplevel.
pub struct Window {
    interp: Rc<dyn Interp>,
    self_ref: Weak<Window>,
    id: WidgetId,
    path: String,
    var_name: String,
    prefix: String,
    dispatch_name: String,
    next_id: Cell<WidgetId>,
    options: RefCell<Options>,
    callbacks: RefCell<HashMap<String, CallbackEntry>>,
    bindings: RefCell<HashMap<(String, String), EventHandler>>,
    vars: RefCell<HashMap<String, Rc<Variable>>>,
    created: Cell<bool>,
    disposed: Cell<bool>,
}

impl Window {
    /// Bind the primary window `.` and give it `title`.
    pub fn new(interp: Rc<dyn Interp>, title: &str) -> Result<Rc<Window>> {
        Self::build(interp, 0, ".".to_owned(), DEFAULT_DISPATCH_PREFIX, title)
    }

    /// Bind the primary window using a loaded configuration.
    pub fn with_config(interp: Rc<dyn Interp>, config: &BridgeConfig) -> Result<Rc<Window>> {
        Self::build(interp, 0, ".".to_owned(), &config.dispatch_prefix, &config.default_title)
    }

    /// Create a secondary toplevel.  Its id comes from `parent`'s counter.
    pub fn toplevel(parent: &Rc<Window>, title: &str) -> Result<Rc<Window>> {
        parent.check_live()?;
        let id = parent.allocate_id();
        let path = child_path(&parent.path, id);
        Self::build(Rc::clone(&parent.interp), id, path, &parent.prefix, title)
    }

    fn build(
        interp: Rc<dyn Interp>,
        id: WidgetId,
        path: String,
        prefix: &str,
        title: &str,
    ) -> Result<Rc<Window>> {
        let var_name = window_var_name(&path);
        let dispatch_name = format!("{prefix}_{var_name}");
        // Checked before construction: a failed window's Drop deletes its
        // dispatch command, which here would be the live window's.
        if interp.has_command(&dispatch_name) {
            return Err(Error::AlreadyBound(dispatch_name));
        }
        let window = Rc::new_cyclic(|self_ref| Window {
            interp,
            self_ref: self_ref.clone(),
            id,
            path,
            var_name,
            prefix: prefix.to_owned(),
            dispatch_name,
            next_id: Cell::new(1),
            options: RefCell::new(Options::declare([
                ("title", Some(Value::from(""))),
                ("state", None),
                ("geometry", None),
            ])),
            callbacks: RefCell::new(HashMap::new()),
            bindings: RefCell::new(HashMap::new()),
            vars: RefCell::new(HashMap::new()),
            created: Cell::new(false),
            disposed: Cell::new(false),
        });
        // On failure the Rc drops here and Drop releases what was installed.
        window.install(title)?;
        Ok(window)
    }

    fn install(&self, title: &str) -> Result<()> {
        let weak = self.self_ref.clone();
        let name = self.dispatch_name.clone();
        let command: CommandFn = Rc::new(move |args: &[String]| -> std::result::Result<String, InterpError> {
            let (path, event) = match args {
                [path] => (path, None),
                [path, event] => (path, Some(event)),
                _ => return Err(InterpError::WrongArgs(format!("{name} path ?event?"))),
            };
            let Some(window) = weak.upgrade() else {
                return Ok(String::new());
            };
            let outcome = match event {
                Some(event) => window.dispatch_event(path, event),
                None => window.dispatch(path),
            };
            match outcome {
                Ok(_) => Ok(String::new()),
                Err(Error::Interp(e)) => Err(e),
                Err(e) => Err(InterpError::Callback { path: path.clone(), message: e.to_string() }),
            }
        });
        self.interp.create_command(&self.dispatch_name, command);
        log::debug!("installed dispatch command {}", self.dispatch_name);

        if self.id != 0 {
            self.interp.eval_args("toplevel", &[self.path.as_str()])?;
            self.created.set(true);
        }
        self.set_title(title)?;
        Ok(())
    }

    // ── Identity ──────────────────────────────────────────────────────────────

    /// Next widget id from this window's counter.
    pub fn allocate_id(&self) -> WidgetId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub fn interp(&self) -> &Rc<dyn Interp> {
        &self.interp
    }

    /// Namespace of this window's variables (`w0`, `w3`, …).
    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    /// Name of the interpreter command that dispatches this tree's callbacks.
    pub fn dispatch_command(&self) -> &str {
        &self.dispatch_name
    }

    // ── Callbacks ─────────────────────────────────────────────────────────────

    /// Register `callback` for `widget` and return the dispatch token to embed
    /// as the widget's `-command`.  Replaces any earlier callback for the
    /// same path.
    ///
    /// The registry holds the widget weakly: once the last handle is dropped
    /// the callback is gone.
    pub fn register_callback<F>(&self, widget: &Rc<TkWidget>, callback: F) -> Result<String>
    where
        F: Fn(&Rc<TkWidget>) -> Result<()> + 'static,
    {
        self.check_live()?;
        let path = widget.path().to_owned();
        let entry = CallbackEntry { widget: Rc::downgrade(widget), callback: Rc::new(callback) };
        let replaced = self.callbacks.borrow_mut().insert(path.clone(), entry);
        if replaced.is_some() {
            log::debug!("{}: replaced callback for {path}", self.dispatch_name);
        } else {
            log::debug!("{}: registered callback for {path}", self.dispatch_name);
        }
        drop(replaced);
        Ok(self.dispatch_token(&path))
    }

    /// `"<dispatch command> <path>"`.
    pub fn dispatch_token(&self, path: &str) -> String {
        format!("{} {}", self.dispatch_name, path)
    }

    /// Remove the callback for `path`.
    pub fn unregister_callback(&self, path: &str) -> Result<()> {
        let removed = self.callbacks.borrow_mut().remove(path);
        match removed {
            Some(_) => Ok(()),
            None => Err(Error::NotRegistered(path.to_owned())),
        }
    }

    pub fn has_callback(&self, path: &str) -> bool {
        self.callbacks.borrow().contains_key(path)
    }

    /// Drop the callback and event bindings of `path` from the registries.
    /// The interpreter side is left alone.
    pub(crate) fn forget_callback(&self, path: &str) {
        let removed = self.callbacks.borrow_mut().remove(path);
        if removed.is_some() {
            log::debug!("{}: dropped callback for {path}", self.dispatch_name);
        }
        let handlers: Vec<EventHandler> = {
            let mut bindings = self.bindings.borrow_mut();
            let keys: Vec<(String, String)> =
                bindings.keys().filter(|(p, _)| p == path).cloned().collect();
            keys.iter().filter_map(|key| bindings.remove(key)).collect()
        };
        drop(removed);
        drop(handlers);
    }

    /// Run the callback registered for `path`.
    ///
    /// Returns `Ok(false)` when nothing is registered or the widget is gone.
    /// The registry is not borrowed while the callback runs, so it may
    /// register, unregister or evaluate scripts.
    pub fn dispatch(&self, path: &str) -> Result<bool> {
        let entry = self
            .callbacks
            .borrow()
            .get(path)
            .map(|e| (e.widget.clone(), Rc::clone(&e.callback)));
        let Some((widget, callback)) = entry else {
            log::debug!("{}: no callback for {path}", self.dispatch_name);
            return Ok(false);
        };
        let Some(widget) = widget.upgrade() else {
            log::debug!("{}: widget {path} is gone", self.dispatch_name);
            return Ok(false);
        };
        log::debug!("{}: dispatching {path}", self.dispatch_name);
        callback(&widget)?;
        Ok(true)
    }

    // ── Event bindings ────────────────────────────────────────────────────────

    /// Bind `callback` to `event` (`<Button-1>`, `<Key-q>`, …) on this
    /// window, replacing an earlier binding.  `None` removes the binding.
    pub fn bind<F>(&self, event: &str, callback: Option<F>) -> Result<&Self>
    where
        F: Fn(&Window) -> Result<()> + 'static,
    {
        let handler = callback.map(|callback| {
            let weak = self.self_ref.clone();
            Rc::new(move || match weak.upgrade() {
                Some(window) => callback(&window).map(|()| true),
                None => Ok(false),
            }) as EventHandler
        });
        self.set_binding(&self.path, event, handler)?;
        Ok(self)
    }

    pub fn unbind(&self, event: &str) -> Result<&Self> {
        self.bind(event, None::<fn(&Window) -> Result<()>>)
    }

    /// Bind `callback` to `event` on `widget`.  Like callbacks, the binding
    /// holds the widget weakly and goes away with its last handle.
    pub fn bind_widget<F>(&self, widget: &Rc<TkWidget>, event: &str, callback: Option<F>) -> Result<()>
    where
        F: Fn(&Rc<TkWidget>) -> Result<()> + 'static,
    {
        let handler = callback.map(|callback| {
            let weak = Rc::downgrade(widget);
            Rc::new(move || match weak.upgrade() {
                Some(widget) => callback(&widget).map(|()| true),
                None => Ok(false),
            }) as EventHandler
        });
        self.set_binding(widget.path(), event, handler)
    }

    pub fn unbind_widget(&self, widget: &Rc<TkWidget>, event: &str) -> Result<()> {
        self.bind_widget(widget, event, None::<fn(&Rc<TkWidget>) -> Result<()>>)
    }

    /// `"<dispatch command> <path> <event>"`.
    pub fn binding_token(&self, path: &str, event: &str) -> String {
        format!("{} {} {}", self.dispatch_name, path, tcl::quote(event))
    }

    pub fn has_binding(&self, path: &str, event: &str) -> bool {
        self.bindings.borrow().contains_key(&(path.to_owned(), event.to_owned()))
    }

    /// Forward `bind <path> <event> <script>` (`{}` to remove), then update
    /// the registry.
    fn set_binding(&self, path: &str, event: &str, handler: Option<EventHandler>) -> Result<()> {
        self.check_live()?;
        let script = match handler {
            Some(_) => tcl::quote(&self.binding_token(path, event)),
            None => "{}".to_owned(),
        };
        let quoted = tcl::quote(event);
        self.interp.eval_args("bind", &[path, quoted.as_str(), script.as_str()])?;

        let key = (path.to_owned(), event.to_owned());
        let previous = match handler {
            Some(handler) => self.bindings.borrow_mut().insert(key, handler),
            None => self.bindings.borrow_mut().remove(&key),
        };
        log::debug!("{}: bound {event} on {path}", self.dispatch_name);
        drop(previous);
        Ok(())
    }

    /// Run the handler bound to `event` on `path`.  Returns `Ok(false)` when
    /// nothing is bound or the target is gone.
    pub fn dispatch_event(&self, path: &str, event: &str) -> Result<bool> {
        let handler = self
            .bindings
            .borrow()
            .get(&(path.to_owned(), event.to_owned()))
            .cloned();
        let Some(handler) = handler else {
            log::debug!("{}: no binding for {event} on {path}", self.dispatch_name);
            return Ok(false);
        };
        log::debug!("{}: dispatching {event} on {path}", self.dispatch_name);
        handler()
    }

    // ── Variables ─────────────────────────────────────────────────────────────

    /// Variable for `source` (a widget, keyed by its path, or a raw name).
    /// Registering the same logical name again returns the same instance.
    pub fn register_var<'a>(&self, source: impl Into<VarSource<'a>>) -> Result<Rc<Variable>> {
        self.check_live()?;
        let logical = source.into().logical_name();
        if let Some(var) = self.vars.borrow().get(logical) {
            return Ok(Rc::clone(var));
        }
        let var = Rc::new(Variable::create(Rc::clone(&self.interp), &self.var_name, logical)?);
        self.vars.borrow_mut().insert(logical.to_owned(), Rc::clone(&var));
        Ok(var)
    }

    /// Forget the variable for `source` and unset it in the interpreter.
    pub fn unregister_var<'a>(&self, source: impl Into<VarSource<'a>>) -> Result<()> {
        let logical = source.into().logical_name();
        let removed = self.vars.borrow_mut().remove(logical);
        match removed {
            Some(var) => var.release(),
            None => Err(Error::NotRegistered(logical.to_owned())),
        }
    }

    pub fn variable<'a>(&self, source: impl Into<VarSource<'a>>) -> Option<Rc<Variable>> {
        self.vars.borrow().get(source.into().logical_name()).cloned()
    }

    // ── Window-manager properties ─────────────────────────────────────────────

    /// Set a declared window property and forward it as `wm <name> <path>
    /// <value>` if it changed.  Returns `Ok(true)` if a command was issued.
    ///
    /// `title` and `geometry` are quoted; `state` is passed through raw.
    pub fn configure(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.check_live()?;
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
        let raw = value.as_str();
        let arg = if name == "state" { raw } else { tcl::quote(&raw) };
        self.interp.eval_args("wm", &[name, self.path.as_str(), arg.as_str()])?;
        self.options.borrow_mut().set(name, value);
        Ok(true)
    }

    pub fn set_title(&self, title: &str) -> Result<bool> {
        self.configure("title", title)
    }

    pub fn title(&self) -> String {
        self.option("title").map(|v| v.as_str()).unwrap_or_default()
    }

    pub fn set_state(&self, state: WindowState) -> Result<bool> {
        self.configure("state", state.as_str())
    }

    /// Last state set through the bridge.
    pub fn state(&self) -> Option<WindowState> {
        self.option("state")?.as_str().parse().ok()
    }

    /// `WxH+X+Y`, or any prefix Tk accepts.
    pub fn set_geometry(&self, geometry: &str) -> Result<bool> {
        self.configure("geometry", geometry)
    }

    pub fn geometry(&self) -> Option<String> {
        self.option("geometry").map(|v| v.as_str())
    }

    /// In-memory value of a window property.
    pub fn option(&self, name: &str) -> Option<Value> {
        self.options.borrow().get(name).cloned()
    }

    // ── Layout ────────────────────────────────────────────────────────────────

    /// Pack layout descriptor for `widget`; call `manage()` to apply it.
    pub fn pack<'a, I>(&self, widget: &dyn Widget, options: I) -> Pack
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        Pack::new(Rc::clone(&self.interp), widget.path(), options)
    }

    /// Grid layout descriptor for `widget`; call `manage()` to apply it.
    pub fn grid<'a, I>(&self, widget: &dyn Widget, options: I) -> Grid
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        Grid::new(Rc::clone(&self.interp), widget.path(), options)
    }

    // ── Teardown ──────────────────────────────────────────────────────────────

    /// Release every variable, drop every callback, remove every event
    /// binding, delete the dispatch command and destroy a secondary toplevel.
    /// Idempotent.
    ///
    /// Failures of individual steps are logged; teardown always completes.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        log::debug!("disposing window {}", self.path);

        let vars = std::mem::take(&mut *self.vars.borrow_mut());
        for (logical, var) in vars {
            if let Err(e) = var.release() {
                log::warn!("{}: failed to release variable {logical}: {e}", self.path);
            }
        }

        let callbacks = std::mem::take(&mut *self.callbacks.borrow_mut());
        drop(callbacks);

        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        for (path, event) in bindings.keys() {
            let quoted = tcl::quote(event);
            if let Err(e) = self.interp.eval_args("bind", &[path.as_str(), quoted.as_str(), "{}"]) {
                log::warn!("{}: failed to unbind {event} on {path}: {e}", self.path);
            }
        }
        drop(bindings);

        if !self.interp.delete_command(&self.dispatch_name) {
            log::warn!("dispatch command {} was already gone", self.dispatch_name);
        }

        if self.created.replace(false) {
            if let Err(e) = self.interp.eval_args("destroy", &[self.path.as_str()]) {
                log::warn!("failed to destroy {}: {e}", self.path);
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub(crate) fn check_live(&self) -> Result<()> {
        if self.disposed.get() {
            return Err(Error::Disposed(self.path.clone()));
        }
        Ok(())
    }

    fn self_rc(&self) -> Rc<Window> {
        // Callers hold a reference, so the Rc is alive.
        self.self_ref.upgrade().expect("window accessed during drop")
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl sealed::Sealed for Window {}

impl Widget for Window {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn class(&self) -> &str {
        "toplevel"
    }

    fn parent(&self) -> Rc<dyn Widget> {
        self.self_rc()
    }

    fn window(&self) -> Rc<Window> {
        self.self_rc()
    }

    fn options(&self) -> Ref<'_, Options> {
        self.options.borrow()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("path", &self.path)
            .field("dispatch", &self.dispatch_name)
            .field("callbacks", &self.callbacks.borrow().len())
            .field("bindings", &self.bindings.borrow().len())
            .field("vars", &self.vars.borrow().len())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
