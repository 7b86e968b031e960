//! Logging setup for the Enterprise QnA CLI.
//!
//! Structured logs go to stderr via `tracing`; stdout stays clean for
//! answers and JSON output.

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

/// Initialize the global tracing subscriber.
///
/// The filter comes from `level` when given, otherwise `RUST_LOG`,
/// otherwise `info`. ANSI color is disabled when `no_color` is set (the
/// `NO_COLOR` environment variable is honored upstream in config loading).
pub fn init(level: Option<&str>, no_color: bool) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_new(level.unwrap_or(&default_level))
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_bad_filter() {
        let result = init(Some("qna=debug=extra"), false);
        assert!(result.is_err());
    }
}
