//! Logger initialization
//!
//! Everything in the crate logs through the `log` facade; the binary installs
//! `env_logger` as the backend once at startup.

use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` provides one.
/// wgpu is chatty at info level.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "stillife=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// The filter that will be applied: the configured one, else `RUST_LOG`,
    /// else [`DEFAULT_FILTER`]
    pub fn resolved_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&config.resolved_filter());
        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            log::warn!("A logger was already installed; keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}
