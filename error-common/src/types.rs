use thiserror::Error;

/// Process-level error shared by the CuraTB binaries and client library
#[derive(Error, Debug)]
pub enum CuraError {
    /// A required value is missing or outside its domain
    #[error("Validation error: {0}")]
    Validation(String),

    /// The client could not reach the proxy
    #[error("Transport error: {0}")]
    Transport(String),

    /// Network setup errors (bind, resolve)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP server runtime errors
    #[error("Server error: {0}")]
    Server(String),

    /// Settings could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O and other internal failures
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CuraError {
    /// Stable code for log correlation
    pub fn code(&self) -> &'static str {
        use crate::codes;
        match self {
            CuraError::Validation(_) => codes::validation::MISSING_REQUIRED_FIELD,
            CuraError::Transport(_) => codes::transport::PROXY_UNREACHABLE,
            CuraError::Network(_) => codes::system::BIND_FAILED,
            CuraError::Config(_) => codes::system::CONFIGURATION,
            CuraError::Server(_) | CuraError::Internal(_) => codes::system::INTERNAL,
        }
    }
}

impl From<std::io::Error> for CuraError {
    fn from(error: std::io::Error) -> Self {
        CuraError::Internal(error.to_string())
    }
}

/// Result type alias for CuraTB operations
pub type Result<T> = std::result::Result<T, CuraError>;

/// Log an error with its stable code
pub fn log_error(context: &str, error: &CuraError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error = %error,
        "CuraTB error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(CuraError::Transport("x".into()).code(), "TRANSPORT_7001");
        assert_eq!(CuraError::Validation("x".into()).code(), "VALIDATION_1002");
        assert_eq!(CuraError::Config("x".into()).code(), "SYS_9001");
        assert_eq!(CuraError::Internal("x".into()).code(), "SYS_9000");
        assert_eq!(CuraError::Network("x".into()).code(), "SYS_9002");
    }

    #[test]
    fn test_io_errors_become_internal() {
        let err: CuraError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CuraError::Internal(ref m) if m == "gone"));
    }
}
