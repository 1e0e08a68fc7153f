use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEBUG_ENV: &str = "FLOWAI_DEBUG";

pub struct LoggingConfig;

impl LoggingConfig {
    /// Installs the global tracing subscriber.
    ///
    /// `RUST_LOG` overrides the filter; `FLOWAI_DEBUG` switches to verbose
    /// output with targets, files and thread ids. Later calls are no-ops.
    ///
    /// ```no_run
    /// use flowai::utils::LoggingConfig;
    ///
    /// LoggingConfig::init();
    /// tracing::info!("ready");
    /// ```
    pub fn init() {
        let is_debug = Self::is_debug();

        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => {
                if is_debug {
                    EnvFilter::new("flowai=debug,info")
                } else {
                    EnvFilter::new("flowai=info,warn")
                }
            }
        };

        let fmt_layer = if is_debug {
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
        } else {
            fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_thread_ids(false)
        };

        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok();

        if installed && is_debug {
            tracing::debug!("debug logging enabled");
        }
    }

    pub fn is_debug() -> bool {
        env::var(DEBUG_ENV).is_ok()
    }
}

/// Logs an error with optional `key = value` context.
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {
        tracing::error!(error = %$err, "operation failed")
    };
    ($err:expr, $($key:tt = $value:expr),+) => {
        tracing::error!(error = %$err, $($key = $value),+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_debug() {
        env::remove_var(DEBUG_ENV);
        assert!(!LoggingConfig::is_debug());

        env::set_var(DEBUG_ENV, "1");
        assert!(LoggingConfig::is_debug());

        env::remove_var(DEBUG_ENV);
    }
}
