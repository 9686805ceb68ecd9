//! Declared-option bags.
//!
//! Every widget kind declares the Tk options it understands.  A declared
//! option is either unset (`None`, "not yet configured") or holds a value.
//! Writes to undeclared names are ignored: [`Options::set`] returns `false`
//! and nothing changes.
//!
//! The bag only stores values.  Deciding whether a write actually changed
//! something, and forwarding that change to the interpreter, is the job of
//! the widget or window that owns the bag.

use std::collections::BTreeMap;

use crate::tcl;
use crate::value::Value;

/// A sparse, declared-key property store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    values: BTreeMap<String, Option<Value>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare options with their defaults.
    pub fn declare<'a, I>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<Value>)>,
    {
        Self::new().merge(defaults)
    }

    /// Declare options that start out unset.
    pub fn declare_keys<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new().merge_keys(names)
    }

    /// Extend the declared set.  Existing keys are kept; a key present in
    /// `defaults` takes the new default.
    pub fn merge<'a, I>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<Value>)>,
    {
        for (name, default) in defaults {
            self.values.insert(name.to_owned(), default);
        }
        self
    }

    /// Extend the declared set with unset keys.  Keys already declared keep
    /// their current value.
    pub fn merge_keys<'a, I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            self.values.entry(name.to_owned()).or_insert(None);
        }
        self
    }

    /// `true` if `name` is declared.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Current value; `None` when undeclared or unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)?.as_ref()
    }

    /// Store `value` under a declared `name`.  Returns `false` (and leaves the
    /// bag untouched) when `name` is not declared.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => {
                log::debug!("ignoring {} write to undeclared option '{name}'", value.type_name());
                false
            }
        }
    }

    /// Reset a declared option to unset.  Returns `true` if it held a value.
    pub fn unset(&mut self, name: &str) -> bool {
        self.values.get_mut(name).and_then(Option::take).is_some()
    }

    /// Declared option names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Options that currently hold a value, sorted by name.
    pub fn iter_set(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// `-name value` words for every set option, values quoted.
    pub fn to_args(&self) -> Vec<String> {
        self.iter_set()
            .flat_map(|(k, v)| [format!("-{k}"), tcl::quote(&v.as_str())])
            .collect()
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_declared() {
        let mut opts = Options::declare_keys(["text", "command"]);
        assert!(opts.set("text", "OK"));
        assert_eq!(opts.get("text"), Some(&Value::from("OK")));
    }

    #[test]
    fn undeclared_write_is_ignored() {
        let mut opts = Options::declare_keys(["text"]);
        let before = opts.clone();
        assert!(!opts.set("colour", "red"));
        assert_eq!(opts, before);
        assert_eq!(opts.get("colour"), None);
        assert!(!opts.has("colour"));
    }

    #[test]
    fn declared_but_unset_reads_none() {
        let opts = Options::declare_keys(["text"]);
        assert!(opts.has("text"));
        assert_eq!(opts.get("text"), None);
    }

    #[test]
    fn merge_keeps_parent_keys() {
        let opts = Options::declare([("title", Some(Value::from(""))), ("state", None)])
            .merge([("geometry", None)]);
        assert!(opts.has("title"));
        assert!(opts.has("state"));
        assert!(opts.has("geometry"));
        assert_eq!(opts.get("title"), Some(&Value::from("")));
        assert_eq!(opts.len(), 3);
    }

    #[test]
    fn merge_keys_keeps_existing_values() {
        let mut opts = Options::declare_keys(["text"]);
        opts.set("text", "kept");
        let opts = opts.merge_keys(["text", "variable"]);
        assert_eq!(opts.get("text"), Some(&Value::from("kept")));
        assert!(opts.has("variable"));
    }

    #[test]
    fn unset_clears_value_but_keeps_declaration() {
        let mut opts = Options::declare_keys(["text"]);
        opts.set("text", "x");
        assert!(opts.unset("text"));
        assert!(!opts.unset("text"));
        assert!(opts.has("text"));
    }

    #[test]
    fn names_are_sorted_and_include_unset() {
        let mut opts = Options::declare_keys(["width", "text", "command"]);
        opts.set("text", "x");
        assert_eq!(opts.names().collect::<Vec<_>>(), ["command", "text", "width"]);
    }

    #[test]
    fn to_args_quotes_values() {
        let mut opts = Options::declare_keys(["text", "width", "state"]);
        opts.set("text", "Hello world");
        opts.set("width", 10);
        assert_eq!(opts.to_args(), ["-text", "\"Hello world\"", "-width", "10"]);
    }
}
