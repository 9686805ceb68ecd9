//! In-process stand-in for a Tk-enabled Tcl interpreter.
//!
//! [`HeadlessInterp`] understands just enough Tcl to host the bridge without
//! a display: command words are split by [`crate::tcl::split_commands`]
//! (no `$`/`[...]` substitution), and the following commands exist:
//!
//! | Command                                   | Behaviour                          |
//! |-------------------------------------------|------------------------------------|
//! | `set name ?value?`, `unset ?-nocomplain? name…` | plain variable table         |
//! | `toplevel path ?-opt val…?`               | create a toplevel record           |
//! | `<class> path ?-opt val…?`                | create a widget record             |
//! | `destroy path…`                           | drop a widget and its descendants  |
//! | `wm title/state/geometry path ?value?`    | toplevel properties                |
//! | `pack`/`grid path ?-opt val…?`, `… forget path…` | record the geometry manager |
//! | `bind path event ?script?`                | event bindings (`{}` removes)      |
//! | `event generate path event`               | run the bound script, if any       |
//! | `<path> configure/cget/invoke/flash/select/deselect` | widget instance commands |
//!
//! Commands created through [`Interp::create_command`] take precedence over
//! the built-ins.  Every evaluated script is appended to a history that tests
//! can inspect.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use super::{qualified_var_name, CommandFn, Interp};
use crate::error::InterpError;
use crate::tcl;

/// Widget classes the headless interpreter can create.
pub const WIDGET_CLASSES: &[&str] = &[
    "button",
    "checkbutton",
    "radiobutton",
    "label",
    "frame",
    "entry",
    "ttk::button",
    "ttk::checkbutton",
    "ttk::radiobutton",
    "ttk::label",
    "ttk::frame",
    "ttk::entry",
];

/// What the headless interpreter remembers about one widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetRecord {
    pub class: String,
    /// Configured options, keyed without the leading `-`.
    pub options: BTreeMap<String, String>,
    /// `wm` properties (toplevels only).
    pub wm: BTreeMap<String, String>,
    /// `"pack"` or `"grid"` once managed.
    pub manager: Option<String>,
    /// Options passed to the geometry manager.
    pub layout: BTreeMap<String, String>,
    /// Event pattern to bound script.
    pub bindings: BTreeMap<String, String>,
}

#[derive(Default)]
struct State {
    vars: HashMap<String, String>,
    widgets: BTreeMap<String, WidgetRecord>,
    history: Vec<String>,
}

/// A display-less interpreter implementing [`Interp`].
pub struct HeadlessInterp {
    state: RefCell<State>,
    commands: RefCell<HashMap<String, CommandFn>>,
}

impl Default for HeadlessInterp {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessInterp {
    /// Create an interpreter whose only widget is the root window `.`.
    pub fn new() -> Self {
        let mut state = State::default();
        state.widgets.insert(
            ".".to_owned(),
            WidgetRecord { class: "toplevel".to_owned(), ..WidgetRecord::default() },
        );
        HeadlessInterp { state: RefCell::new(state), commands: RefCell::new(HashMap::new()) }
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    /// Every script evaluated so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().history.clone()
    }

    /// Drain the script history.
    pub fn take_history(&self) -> Vec<String> {
        std::mem::take(&mut self.state.borrow_mut().history)
    }

    /// Number of evaluated scripts starting with `prefix`.
    pub fn history_count(&self, prefix: &str) -> usize {
        self.state.borrow().history.iter().filter(|s| s.starts_with(prefix)).count()
    }

    /// Snapshot of a widget record.
    pub fn widget(&self, path: &str) -> Option<WidgetRecord> {
        self.state.borrow().widgets.get(path).cloned()
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.state.borrow().vars.contains_key(name)
    }

    /// Names of all created commands, sorted.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    fn exec(&self, words: &[String]) -> Result<String, InterpError> {
        let name = words[0].as_str();
        let args = &words[1..];

        // Clone the command out so that it may re-enter the interpreter.
        let user = self.commands.borrow().get(name).cloned();
        if let Some(command) = user {
            return command(args);
        }

        match name {
            "set" => self.cmd_set(args),
            "unset" => self.cmd_unset(args),
            "destroy" => self.cmd_destroy(args),
            "wm" => self.cmd_wm(args),
            "pack" | "grid" => self.cmd_manage(name, args),
            "bind" => self.cmd_bind(args),
            "event" => self.cmd_event(args),
            "toplevel" => self.cmd_create(name, args),
            class if WIDGET_CLASSES.contains(&class) => self.cmd_create(class, args),
            path if path.starts_with('.') && self.widget(path).is_some() => {
                self.widget_command(path, args)
            }
            _ => Err(InterpError::UnknownCommand(name.to_owned())),
        }
    }

    // ── Variables ─────────────────────────────────────────────────────────────

    fn cmd_set(&self, args: &[String]) -> Result<String, InterpError> {
        match args {
            [name] => self.get_var(name),
            [name, value] => {
                self.set_var(name, value)?;
                Ok(value.clone())
            }
            _ => Err(InterpError::WrongArgs("set varName ?newValue?".into())),
        }
    }

    fn cmd_unset(&self, args: &[String]) -> Result<String, InterpError> {
        let (nocomplain, names) = match args.first().map(String::as_str) {
            Some("-nocomplain") => (true, &args[1..]),
            _ => (false, args),
        };
        for name in names {
            match self.unset_var(name) {
                Err(_) if nocomplain => {}
                other => other?,
            }
        }
        Ok(String::new())
    }

    // ── Widgets ───────────────────────────────────────────────────────────────

    fn cmd_create(&self, class: &str, args: &[String]) -> Result<String, InterpError> {
        let Some(path) = args.first() else {
            return Err(InterpError::WrongArgs(format!("{class} pathName ?-option value ...?")));
        };
        if path == "." || !path.starts_with('.') || path.ends_with('.') {
            return Err(bad_path(path));
        }
        let (parent, leaf) = split_path(path);
        let options = parse_option_pairs(&args[1..])?;

        let mut state = self.state.borrow_mut();
        if !state.widgets.contains_key(parent) {
            return Err(bad_path(path));
        }
        if state.widgets.contains_key(path.as_str()) {
            return Err(InterpError::Script(format!(
                "window name \"{leaf}\" already exists in parent"
            )));
        }
        if class.ends_with("checkbutton") {
            if let Some(var) = options.get("variable") {
                let off = options.get("offvalue").cloned().unwrap_or_else(|| "0".into());
                state.vars.entry(var.clone()).or_insert(off);
            }
        }
        state.widgets.insert(
            path.clone(),
            WidgetRecord { class: class.to_owned(), options, ..WidgetRecord::default() },
        );
        Ok(path.clone())
    }

    fn cmd_destroy(&self, args: &[String]) -> Result<String, InterpError> {
        let mut state = self.state.borrow_mut();
        for path in args {
            if path == "." {
                state.widgets.retain(|p, _| p == ".");
                continue;
            }
            let prefix = format!("{path}.");
            state.widgets.retain(|p, _| p != path && !p.starts_with(&prefix));
        }
        Ok(String::new())
    }

    fn cmd_wm(&self, args: &[String]) -> Result<String, InterpError> {
        let [sub, path, rest @ ..] = args else {
            return Err(InterpError::WrongArgs("wm option window ?arg ...?".into()));
        };
        if !matches!(sub.as_str(), "title" | "state" | "geometry") {
            return Err(InterpError::Script(format!(
                "bad option \"{sub}\": must be geometry, state, or title"
            )));
        }
        let mut state = self.state.borrow_mut();
        let record = state
            .widgets
            .get_mut(path.as_str())
            .filter(|w| w.class == "toplevel")
            .ok_or_else(|| bad_path(path))?;
        match rest {
            [] => Ok(record.wm.get(sub.as_str()).cloned().unwrap_or_else(|| match sub.as_str() {
                "state" => "normal".to_owned(),
                _ => String::new(),
            })),
            [value] => {
                if sub == "state"
                    && !matches!(value.as_str(), "normal" | "iconic" | "withdrawn" | "icon" | "zoomed")
                {
                    return Err(InterpError::Script(format!(
                        "bad argument \"{value}\": must be normal, iconic, withdrawn, or zoomed"
                    )));
                }
                record.wm.insert(sub.clone(), value.clone());
                Ok(String::new())
            }
            _ => Err(InterpError::WrongArgs(format!("wm {sub} window ?value?"))),
        }
    }

    fn cmd_manage(&self, manager: &str, args: &[String]) -> Result<String, InterpError> {
        let Some(first) = args.first() else {
            return Err(InterpError::WrongArgs(format!("{manager} option arg ?arg ...?")));
        };
        let mut state = self.state.borrow_mut();
        if first == "forget" {
            for path in &args[1..] {
                if let Some(record) = state.widgets.get_mut(path.as_str()) {
                    if record.manager.as_deref() == Some(manager) {
                        record.manager = None;
                        record.layout.clear();
                    }
                }
            }
            return Ok(String::new());
        }
        let layout = parse_option_pairs(&args[1..])?;
        let record = state.widgets.get_mut(first.as_str()).ok_or_else(|| bad_path(first))?;
        record.manager = Some(manager.to_owned());
        record.layout = layout;
        Ok(String::new())
    }

    fn cmd_bind(&self, args: &[String]) -> Result<String, InterpError> {
        let mut state = self.state.borrow_mut();
        match args {
            [path, event] => {
                let record = state.widgets.get(path.as_str()).ok_or_else(|| bad_path(path))?;
                Ok(record.bindings.get(event.as_str()).cloned().unwrap_or_default())
            }
            [path, event, script] => {
                let record = state.widgets.get_mut(path.as_str()).ok_or_else(|| bad_path(path))?;
                if script.is_empty() {
                    record.bindings.remove(event.as_str());
                } else {
                    record.bindings.insert(event.clone(), script.clone());
                }
                Ok(String::new())
            }
            _ => Err(InterpError::WrongArgs("bind window pattern ?command?".into())),
        }
    }

    /// `event generate`: evaluates the bound script directly, as if the
    /// event had been delivered.
    fn cmd_event(&self, args: &[String]) -> Result<String, InterpError> {
        let [sub, path, event] = args else {
            return Err(InterpError::WrongArgs("event generate window event".into()));
        };
        if sub != "generate" {
            return Err(InterpError::Script(format!("bad option \"{sub}\": must be generate")));
        }
        let record = self.widget(path).ok_or_else(|| bad_path(path))?;
        match record.bindings.get(event.as_str()) {
            Some(script) => self.eval(script),
            None => Ok(String::new()),
        }
    }

    fn widget_command(&self, path: &str, args: &[String]) -> Result<String, InterpError> {
        let Some(sub) = args.first() else {
            return Err(InterpError::WrongArgs(format!("{path} option ?arg ...?")));
        };
        let rest = &args[1..];
        match sub.as_str() {
            "configure" => match rest {
                [] => {
                    let state = self.state.borrow();
                    let record = state.widgets.get(path).ok_or_else(|| bad_path(path))?;
                    let listed: Vec<String> = record
                        .options
                        .iter()
                        .map(|(k, v)| format!("-{k} {}", tcl::quote(v)))
                        .collect();
                    Ok(listed.join(" "))
                }
                [option] => self.cget(path, option),
                pairs => {
                    let options = parse_option_pairs(pairs)?;
                    let mut state = self.state.borrow_mut();
                    let record = state.widgets.get_mut(path).ok_or_else(|| bad_path(path))?;
                    record.options.extend(options);
                    Ok(String::new())
                }
            },
            "cget" => match rest {
                [option] => self.cget(path, option),
                _ => Err(InterpError::WrongArgs(format!("{path} cget option"))),
            },
            "invoke" => self.invoke(path),
            "flash" => Ok(String::new()),
            "select" | "deselect" => self.select(path, sub == "select"),
            _ => Err(InterpError::Script(format!(
                "bad option \"{sub}\": must be cget, configure, deselect, flash, invoke, or select"
            ))),
        }
    }

    fn cget(&self, path: &str, option: &str) -> Result<String, InterpError> {
        let state = self.state.borrow();
        let record = state.widgets.get(path).ok_or_else(|| bad_path(path))?;
        let key = option.strip_prefix('-').ok_or_else(|| {
            InterpError::Script(format!("unknown option \"{option}\""))
        })?;
        Ok(record.options.get(key).cloned().unwrap_or_default())
    }

    /// Simulate a user activating the widget.
    fn invoke(&self, path: &str) -> Result<String, InterpError> {
        let record = self.widget(path).ok_or_else(|| bad_path(path))?;
        if record.options.get("state").map(String::as_str) == Some("disabled") {
            return Ok(String::new());
        }
        if record.class.ends_with("checkbutton") {
            if let Some(var) = record.options.get("variable") {
                let on = record.options.get("onvalue").cloned().unwrap_or_else(|| "1".into());
                let off = record.options.get("offvalue").cloned().unwrap_or_else(|| "0".into());
                let current = self.state.borrow().vars.get(var).cloned();
                let next = if current.as_deref() == Some(on.as_str()) { off } else { on };
                self.set_var(var, &next)?;
            }
        } else if record.class.ends_with("radiobutton") {
            if let Some(var) = record.options.get("variable") {
                let value = record.options.get("value").cloned().unwrap_or_default();
                self.set_var(var, &value)?;
            }
        }
        match record.options.get("command") {
            Some(command) if !command.is_empty() => self.eval(command),
            _ => Ok(String::new()),
        }
    }

    fn select(&self, path: &str, select: bool) -> Result<String, InterpError> {
        let record = self.widget(path).ok_or_else(|| bad_path(path))?;
        let Some(var) = record.options.get("variable") else {
            return Ok(String::new());
        };
        let value = if record.class.ends_with("checkbutton") {
            let key = if select { "onvalue" } else { "offvalue" };
            let default = if select { "1" } else { "0" };
            record.options.get(key).cloned().unwrap_or_else(|| default.into())
        } else if record.class.ends_with("radiobutton") {
            if select {
                record.options.get("value").cloned().unwrap_or_default()
            } else {
                String::new()
            }
        } else {
            return Err(InterpError::Script(format!(
                "bad option \"{}\": {} has no selection",
                if select { "select" } else { "deselect" },
                record.class
            )));
        };
        self.set_var(var, &value)?;
        Ok(String::new())
    }
}

impl Interp for HeadlessInterp {
    fn eval(&self, script: &str) -> Result<String, InterpError> {
        log::trace!("eval: {script}");
        self.state.borrow_mut().history.push(script.to_owned());
        let mut result = String::new();
        for words in tcl::split_commands(script)? {
            result = self.exec(&words)?;
        }
        Ok(result)
    }

    fn create_command(&self, name: &str, command: CommandFn) {
        self.commands.borrow_mut().insert(name.to_owned(), command);
    }

    fn delete_command(&self, name: &str) -> bool {
        self.commands.borrow_mut().remove(name).is_some()
    }

    fn has_command(&self, name: &str) -> bool {
        self.commands.borrow().contains_key(name)
    }

    fn create_variable(&self, namespace: &str, logical: &str) -> Result<String, InterpError> {
        let name = qualified_var_name(namespace, logical);
        self.state.borrow_mut().vars.entry(name.clone()).or_default();
        Ok(name)
    }

    fn get_var(&self, name: &str) -> Result<String, InterpError> {
        self.state
            .borrow()
            .vars
            .get(name)
            .cloned()
            .ok_or_else(|| InterpError::NoSuchVariable(name.to_owned()))
    }

    fn set_var(&self, name: &str, value: &str) -> Result<(), InterpError> {
        self.state.borrow_mut().vars.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn unset_var(&self, name: &str) -> Result<(), InterpError> {
        match self.state.borrow_mut().vars.remove(name) {
            Some(_) => Ok(()),
            None => Err(InterpError::Script(format!("can't unset \"{name}\": no such variable"))),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn bad_path(path: &str) -> InterpError {
    InterpError::Script(format!("bad window path name \"{path}\""))
}

/// Split `.a.b` into (`.a`, `b`); top-level paths have parent `.`.
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('.') {
        Some(0) | None => (".", &path[1..]),
        Some(i) => (&path[..i], &path[i + 1..]),
    }
}

fn parse_option_pairs(args: &[String]) -> Result<BTreeMap<String, String>, InterpError> {
    let mut options = BTreeMap::new();
    let mut iter = args.iter();
    while let Some(name) = iter.next() {
        let Some(key) = name.strip_prefix('-').filter(|k| !k.is_empty()) else {
            return Err(InterpError::Script(format!("unknown option \"{name}\"")));
        };
        let Some(value) = iter.next() else {
            return Err(InterpError::Script(format!("value for \"{name}\" missing")));
        };
        options.insert(key.to_owned(), value.clone());
    }
    Ok(options)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
