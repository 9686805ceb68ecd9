//! Logger initialisation.
//!
//! The crate logs through the `log` facade: registrations and dispatch at
//! `debug`, every evaluated script at `trace`, failed teardown steps at
//! `warn`.  Applications that want to see it call [`init_logging`] early.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. `"info"`,
/// `"tkui=debug"`).  When `None`, `RUST_LOG` is used, falling back to
/// `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { env_filter: None, write_style: env_logger::WriteStyle::Auto }
    }
}

static INIT: Once = Once::new();

/// Install the global logger.  Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }
        builder.write_style(config.write_style);

        // Another logger may already be installed by the host application.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
