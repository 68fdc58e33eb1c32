// Logger configuration
use serde::{Deserialize, Serialize};

use crate::redactor::{PhiRedactor, RedactionConfig};

/// Deployment environment variable; `production` switches to JSON output
pub const ENVIRONMENT_VAR: &str = "CURATB_ENV";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Crate target the default filter is written for
    pub service_name: String,
    pub log_level: String,
    /// Structured JSON output instead of the human-readable format
    pub json: bool,
    pub redaction_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            service_name: "curatb".to_string(),
            log_level: "info".to_string(),
            json: false,
            redaction_enabled: true,
        }
    }
}

impl LoggerConfig {
    pub fn for_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.log_level = "debug".to_string();
        }
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Apply the deployment environment from [`ENVIRONMENT_VAR`]
    pub fn with_environment(self) -> Self {
        let production = std::env::var(ENVIRONMENT_VAR)
            .is_ok_and(|env| env.eq_ignore_ascii_case("production"));
        if production {
            self.json(true)
        } else {
            self
        }
    }

    /// Redactor matching this configuration
    pub fn redactor(&self) -> PhiRedactor {
        if self.redaction_enabled {
            PhiRedactor::default()
        } else {
            PhiRedactor::new(RedactionConfig::disabled())
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> String {
        format!(
            "{}={},tower_http=info,hyper=info,reqwest=info",
            self.service_name.replace('-', "_"),
            self.log_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_redaction_passes_handles_through() {
        let config = LoggerConfig {
            redaction_enabled: false,
            ..LoggerConfig::default()
        };
        assert_eq!(config.redactor().redact_dataset_handle("/enc/a"), "/enc/a");
        assert_ne!(LoggerConfig::default().redactor().redact_dataset_handle("/enc/a"), "/enc/a");
    }
}
