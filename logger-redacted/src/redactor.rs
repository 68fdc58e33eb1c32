use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};

// Literal patterns, checked by the tests below.
#[allow(clippy::unwrap_used)]
mod patterns {
    use super::{lazy_static, Regex};

    lazy_static! {
        pub static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
        pub static ref IP_REGEX: Regex = Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").unwrap();
        pub static ref FILE_PATH_REGEX: Regex = Regex::new(r"(?:/[A-Za-z0-9._-]+){2,}").unwrap();
    }
}

use patterns::{EMAIL_REGEX, FILE_PATH_REGEX, IP_REGEX};

/// PHI redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_ip_addresses: bool,
    pub redact_file_paths: bool,
    /// Replace values with a short hash instead of a fixed mask
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_ip_addresses: true,
            redact_file_paths: true,
            hash_for_correlation: true,
        }
    }
}

impl RedactionConfig {
    /// Redaction switched off entirely, for local debugging
    pub fn disabled() -> Self {
        Self {
            redact_emails: false,
            redact_ip_addresses: false,
            redact_file_paths: false,
            hash_for_correlation: false,
        }
    }
}

/// Scrubs patient data and dataset handles before they are logged
#[derive(Debug, Clone, Default)]
pub struct PhiRedactor {
    config: RedactionConfig,
}

impl PhiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// Scrub free text such as a backend error message
    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_emails {
            result = EMAIL_REGEX
                .replace_all(&result, |caps: &regex::Captures| self.mask("EMAIL", &caps[0]))
                .to_string();
        }

        if self.config.redact_ip_addresses {
            result = IP_REGEX
                .replace_all(&result, |caps: &regex::Captures| self.mask("IP", &caps[0]))
                .to_string();
        }

        if self.config.redact_file_paths {
            result = FILE_PATH_REGEX
                .replace_all(&result, |caps: &regex::Captures| self.mask("FILE", &caps[0]))
                .to_string();
        }

        result
    }

    /// Encrypted dataset handles are opaque but still identify a dataset
    pub fn redact_dataset_handle(&self, handle: &str) -> String {
        if handle.is_empty() {
            return "FILE[empty]".to_string();
        }
        if self.config.redact_file_paths {
            self.mask("FILE", handle)
        } else {
            handle.to_string()
        }
    }

    /// Reduce a patient payload to its field count and a fingerprint.
    ///
    /// Two submissions of the same record share a fingerprint, which is
    /// enough to correlate proxy and backend logs without storing values.
    pub fn summarize_patient(&self, payload: &Value) -> String {
        let fields = payload.as_object().map_or(0, serde_json::Map::len);
        format!(
            "fields={} fingerprint={}",
            fields,
            self.hash_value(&payload.to_string())
        )
    }

    fn mask(&self, label: &str, value: &str) -> String {
        if self.config.hash_for_correlation {
            format!("{}[{}]", label, self.hash_value(value))
        } else {
            format!("{}[REDACTED]", label)
        }
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        general_purpose::URL_SAFE_NO_PAD.encode(result.get(..8).unwrap_or_default()) // Use first 8 bytes for shorter hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_and_ip_redaction() {
        let redactor = PhiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        });

        let text = "Falha para joao.silva@example.com vindo de 192.168.1.10";
        let redacted = redactor.redact(text);
        assert_eq!(redacted, "Falha para EMAIL[REDACTED] vindo de IP[REDACTED]");
    }

    #[test]
    fn test_file_path_redaction_is_stable() {
        let redactor = PhiRedactor::default();
        let a = redactor.redact("arquivo /srv/uploads/enc/a1.bin não encontrado");
        let b = redactor.redact("arquivo /srv/uploads/enc/a1.bin não encontrado");
        assert_eq!(a, b);
        assert!(!a.contains("/srv/uploads"));
        assert!(a.contains("FILE["));
    }

    #[test]
    fn test_dataset_handle() {
        let redactor = PhiRedactor::default();
        assert_eq!(redactor.redact_dataset_handle(""), "FILE[empty]");
        assert_ne!(redactor.redact_dataset_handle("/enc/a"), "/enc/a");

        let passthrough = PhiRedactor::new(RedactionConfig::disabled());
        assert_eq!(passthrough.redact_dataset_handle("/enc/a"), "/enc/a");
    }

    #[test]
    fn test_patient_summary_has_no_values() {
        let redactor = PhiRedactor::default();
        let summary = redactor.summarize_patient(&json!({"idade": 45, "sexo": "1"}));
        assert!(summary.starts_with("fields=2 fingerprint="));
        assert!(!summary.contains("idade"));
    }
}
