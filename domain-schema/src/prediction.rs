use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::now_iso;

/// Label used when the backend does not report a cure time
pub const UNDETERMINED_CURE_TIME: &str = "Não determinado";

/// Client-facing answer to a prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Predicted cure-time label
    #[schema(example = "6 meses")]
    pub tempo_cura: String,
    /// Probability in [0, 1]; the current backend contract does not supply it
    #[serde(default)]
    pub probabilidade: f64,
    /// ISO-8601 timestamp
    pub timestamp: String,
    /// Status code mirrored in the body
    #[schema(example = 200)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw 0/1 input vector fed to the network
    #[serde(default)]
    pub entrada_neuronio: Option<Vec<u8>>,
    /// Raw network output activations
    #[serde(default)]
    pub saida_recognize: Option<Vec<f64>>,
}

impl PredictionResult {
    /// Error-shaped result: empty label, zero probability, no vectors
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self::failure_at(status, message, now_iso())
    }

    pub fn failure_at(status: u16, message: impl Into<String>, timestamp: String) -> Self {
        Self {
            tempo_cura: String::new(),
            probabilidade: 0.0,
            timestamp,
            status,
            error: Some(message.into()),
            entrada_neuronio: None,
            saida_recognize: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }
}
