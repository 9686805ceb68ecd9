//! Bridge configuration and the `tkuirc` file parser.
//!
//! The rc file is a list of Tcl-style `set` commands:
//!
//! ```text
//! # comments start with '#'
//! set dispatch_prefix myapp_dispatch
//! set default_title   "My Application"
//! set log_filter      tkui=debug
//! ```
//!
//! | Setting           | Meaning                                          |
//! |-------------------|--------------------------------------------------|
//! | `dispatch_prefix` | prefix of every window's dispatch command name   |
//! | `default_title`   | title used by [`Window::with_config`]            |
//! | `log_filter`      | `env_logger` filter passed to [`init_logging`]   |
//!
//! Commands other than `set` are skipped so a file shared with other tools
//! still loads.  Problems on recognised lines are collected, not fatal.
//!
//! [`Window::with_config`]: crate::Window::with_config
//! [`init_logging`]: crate::logging::init_logging

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::logging::LoggingConfig;
use crate::tcl;

/// Prefix used for dispatch command names unless configured otherwise.
pub const DEFAULT_DISPATCH_PREFIX: &str = "tkui_dispatch";

/// Environment variable naming an explicit rc file.
pub const CONFIG_ENV: &str = "TKUI_CONFIG";

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading an rc file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Settings shared by every window built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub dispatch_prefix: String,
    pub default_title: String,
    pub log_filter: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            dispatch_prefix: DEFAULT_DISPATCH_PREFIX.to_owned(),
            default_title: String::new(),
            log_filter: None,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an rc string.  Returns the config and any per-line errors.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = BridgeConfig::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let commands = match tcl::split_commands(line) {
                Ok(c) => c,
                Err(e) => {
                    errors.push(ConfigError { line: lineno, message: e.to_string() });
                    continue;
                }
            };
            for words in commands {
                match words[0].as_str() {
                    "set" => {
                        if let Err(message) = config.apply_set(&words[1..]) {
                            errors.push(ConfigError { line: lineno, message });
                        }
                    }
                    other => log::debug!("config line {lineno}: skipping '{other}'"),
                }
            }
        }

        (config, errors)
    }

    /// Read and parse an rc file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    /// Logger settings derived from this config.
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig { env_filter: self.log_filter.clone(), ..LoggingConfig::default() }
    }

    fn apply_set(&mut self, args: &[String]) -> Result<(), String> {
        let [name, value] = args else {
            return Err("set: expected 'set name value'".into());
        };
        match name.as_str() {
            "dispatch_prefix" => {
                if !identifier().is_match(value) {
                    return Err(format!("dispatch_prefix: '{value}' is not a valid command name"));
                }
                self.dispatch_prefix = value.clone();
            }
            "default_title" => self.default_title = value.clone(),
            "log_filter" => {
                self.log_filter = Some(value.clone()).filter(|v| !v.is_empty());
            }
            other => return Err(format!("set: unknown setting '{other}'")),
        }
        Ok(())
    }
}

fn identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

/// Locate the user's rc file.
///
/// Order: `$TKUI_CONFIG`, then `tkuirc` in the platform config directory
/// (`~/.config/tkui/tkuirc` on Linux), then `./.tkuirc`.
pub fn find_user_config() -> Option<PathBuf> {
    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let from_dirs = directories::ProjectDirs::from("", "", "tkui")
        .map(|dirs| dirs.config_dir().join("tkuirc"));
    [from_env, from_dirs, Some(PathBuf::from("./.tkuirc"))]
        .into_iter()
        .flatten()
        .find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
