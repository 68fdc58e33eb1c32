//! Envelopes returned by the backend RNA service
//!
//! The backend wraps every answer as `{timestamp, status, error, path, data}`.
//! Every field is optional here and loosely typed: the proxy must cope with
//! partial or oddly typed replies the same way a browser would, defaulting
//! what is missing instead of failing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Exact message the backend uses when no network has been trained yet
pub const UNTRAINED_NETWORK_MESSAGE: &str = "Rede neural não treinada.";

/// Status the backend pairs with [`UNTRAINED_NETWORK_MESSAGE`]
pub const UNTRAINED_NETWORK_STATUS: i64 = 400;

/// Scalars other than strings are kept as their JSON text
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

/// Integer status, also accepted as numeric text; anything else is absent
fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BackendEnvelope {
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub path: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl BackendEnvelope {
    /// The one place that recognises the backend's "not trained" answer
    pub fn reports_untrained_model(&self) -> bool {
        self.status == Some(UNTRAINED_NETWORK_STATUS)
            && self.error.as_deref() == Some(UNTRAINED_NETWORK_MESSAGE)
    }

    /// Non-empty string member of `data`
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Non-empty timestamp, as a browser `||` default would treat it
    pub fn timestamp_or_else(&self, now: impl FnOnce() -> String) -> String {
        self.timestamp
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(now)
    }

    /// Status code the backend reported in its body, when usable
    pub fn reported_status(&self) -> Option<u16> {
        self.status
            .filter(|s| *s != 0)
            .and_then(|s| u16::try_from(s).ok())
    }

    /// Raw neural input vector, if present and well formed
    pub fn input_vector(&self) -> Option<Vec<u8>> {
        self.data
            .get("entradaNeuronio")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Raw neural output vector, if present and well formed
    pub fn output_vector(&self) -> Option<Vec<f64>> {
        self.data
            .get("saidaRecognize")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
