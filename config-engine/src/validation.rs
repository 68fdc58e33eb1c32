// Checks on merged settings before any socket is opened
use std::net::SocketAddr;

use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Reject settings the binaries cannot start with.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] naming the offending key.
pub fn validate(settings: &Settings) -> Result<()> {
    check_http_url("server.backend_url", &settings.server.backend_url)?;
    check_http_url("client.proxy_url", &settings.client.proxy_url)?;

    if settings.server.bind_address.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "server.bind_address is not a socket address: {}",
            settings.server.bind_address
        )));
    }

    if settings.server.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "server.max_upload_bytes must be greater than zero".to_string(),
        ));
    }

    if settings.server.status_store_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "server.status_store_path must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn check_http_url(key: &str, value: &str) -> Result<()> {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(()),
        _ => Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got {:?}",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_urls() {
        let mut settings = Settings::default();
        settings.server.backend_url = String::new();
        assert!(validate(&settings).is_err());

        let mut settings = Settings::default();
        settings.client.proxy_url = "localhost:3000".to_string();
        let err = validate(&settings).unwrap_err().to_string();
        assert!(err.contains("client.proxy_url"));
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let mut settings = Settings::default();
        settings.server.bind_address = "nowhere".to_string();
        assert!(validate(&settings).is_err());
    }
}
