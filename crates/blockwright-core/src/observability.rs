//! Tracing initialization.
//!
//! Logs go to stderr so stdout stays reserved for the model's text.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// How chatty the process should be, on top of the configured level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingMode {
    #[default]
    Default,
    /// `-v` on the command line: debug for every blockwright crate.
    Verbose,
}

/// Resolve the filter directive for a config and mode.
pub fn filter_directive(cfg: &ObservabilityConfig, mode: TracingMode) -> String {
    if cfg.quiet {
        return "blockwright=warn,blockwright_agent=warn,blockwright_core=warn".to_string();
    }
    match mode {
        TracingMode::Verbose => {
            "blockwright=debug,blockwright_agent=debug,blockwright_core=debug".to_string()
        }
        TracingMode::Default if cfg.log_level == "blockwright=info" => {
            "blockwright=info,blockwright_agent=info,blockwright_core=info".to_string()
        }
        TracingMode::Default => cfg.log_level.clone(),
    }
}

/// Initialize tracing. Call once at process startup; later calls are no-ops.
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(cfg: &ObservabilityConfig, mode: TracingMode) {
    let level = filter_directive(cfg, mode);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}
