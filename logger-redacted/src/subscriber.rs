use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggerConfig;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when present.
///
/// # Errors
///
/// Fails when the default filter does not parse or a subscriber is already
/// installed for this process.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.default_filter())
            .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?,
    };

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(config.log_level == "debug")
                    .with_line_number(config.log_level == "debug"),
            )
            .try_init()
            .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_crate_target() {
        let config = LoggerConfig::for_service("curatb-server").verbose(true);
        assert_eq!(
            config.default_filter(),
            "curatb_server=debug,tower_http=info,hyper=info,reqwest=info"
        );
    }

    #[test]
    fn test_second_init_is_reported() {
        let config = LoggerConfig::default();
        let first = init_tracing(&config);
        let second = init_tracing(&config);
        // Another test in this binary may have installed it first
        assert!(first.is_ok() || second.is_err());
        assert!(matches!(second, Err(LoggerError::AlreadyInitialized(_))));
    }
}
