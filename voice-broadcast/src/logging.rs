//! Logging setup for voice-broadcast consumers
//!
//! The crate itself only emits `tracing` events. Hosts that do not install
//! their own subscriber can use these helpers; UI hosts usually want
//! `LoggingMode::Silent` so nothing is written over the terminal.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Environment variable selecting the logging mode
pub const LOG_MODE_ENV: &str = "BROADCAST_LOG_MODE";

/// Environment variable overriding the log level / filter directives
pub const LOG_LEVEL_ENV: &str = "BROADCAST_LOG_LEVEL";

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact stderr output at `info`
    Development,
    /// Pretty output at `debug` with thread ids and source locations
    Debug,
}

impl LoggingMode {
    /// Map a `BROADCAST_LOG_MODE` value to a mode; unknown values are silent
    pub fn from_env_value(value: &str) -> Self {
        match value {
            "development" => LoggingMode::Development,
            "debug" => LoggingMode::Debug,
            _ => LoggingMode::Silent,
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid filter directive in {var}: {reason}")]
    InvalidFilter { var: &'static str, reason: String },
}

/// Initialize logging with the specified mode
///
/// # Environment Variables
///
/// - `BROADCAST_LOG_LEVEL`: filter directives, e.g. `voice_broadcast=trace`
/// - `RUST_LOG`: used when `BROADCAST_LOG_LEVEL` is unset
///
/// ```rust,ignore
/// voice_broadcast::logging::init_logging(LoggingMode::Development)?;
/// ```
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info")?;

            Registry::default()
                .with(fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact())
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug")?;

            Registry::default()
                .with(fmt::layer()
                    .pretty()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true))
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `BROADCAST_LOG_MODE`
///
/// Defaults to silent when the variable is unset or unrecognized.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var(LOG_MODE_ENV)
        .map(|value| LoggingMode::from_env_value(&value))
        .unwrap_or(LoggingMode::Silent);

    init_logging(mode)
}

/// Build a filter from `BROADCAST_LOG_LEVEL`, then `RUST_LOG`, then the default
fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    for var in [LOG_LEVEL_ENV, "RUST_LOG"] {
        if let Ok(directives) = std::env::var(var) {
            return EnvFilter::try_new(&directives).map_err(|e| LoggingError::InvalidFilter {
                var,
                reason: e.to_string(),
            });
        }
    }

    Ok(EnvFilter::new(default_level))
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
