use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging profile derived from the `log.env` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogProfile {
    /// Compact, human readable, debug level.
    Development,
    /// JSON lines, info level.
    Production,
}

impl LogProfile {
    /// `prod` selects production; `local`, `dev` and anything else fall back to development.
    pub fn from_env_name(env: &str) -> Self {
        match env.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => LogProfile::Production,
            _ => LogProfile::Development,
        }
    }

    pub fn default_filter(self) -> &'static str {
        match self {
            LogProfile::Development => "debug,sqlx=warn,tower_http=debug",
            LogProfile::Production => "info,sqlx=warn",
        }
    }
}

/// Initialize tracing for the given `log.env` value.
/// - Respects `RUST_LOG` if set
/// - Writes to stdout
/// - Safe to call more than once; later calls are no-ops
pub fn init_logging(env: &str) {
    match LogProfile::from_env_name(env) {
        LogProfile::Development => init_logging_default(),
        LogProfile::Production => init_logging_json(),
    }
}

/// Compact human readable output.
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LogProfile::Development.default_filter()));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Structured JSON output for container log collectors.
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LogProfile::Production.default_filter()));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
