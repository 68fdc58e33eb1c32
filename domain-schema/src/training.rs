use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One request to train the backend network on an uploaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainingCommand {
    /// Opaque handle returned by the upload endpoint
    #[schema(example = "/uploads/enc/2f1c9a.bin")]
    pub encrypted_file_path: String,
    #[schema(example = 2)]
    pub hidden_layers: u32,
    #[schema(example = 10)]
    pub neurons_per_layer: u32,
    #[schema(example = 0.1)]
    pub learning_rate: f64,
    #[schema(example = 0.01)]
    pub error_margin: f64,
    #[schema(example = 1000)]
    pub max_iterations: u32,
}

impl TrainingCommand {
    /// Command with the console's suggested hyperparameters
    pub fn with_defaults(encrypted_file_path: impl Into<String>) -> Self {
        Self {
            encrypted_file_path: encrypted_file_path.into(),
            hidden_layers: 2,
            neurons_per_layer: 10,
            learning_rate: 0.1,
            error_margin: 0.01,
            max_iterations: 1000,
        }
    }

    /// Check the advisory UI ranges. The proxy never enforces these; only the
    /// training console does, before sending.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range parameter as a user-facing message.
    pub fn check_suggested_ranges(&self) -> Result<(), String> {
        if self.encrypted_file_path.trim().is_empty() {
            return Err("Caminho do arquivo criptografado é obrigatório".to_string());
        }
        if !(1..=10).contains(&self.hidden_layers) {
            return Err("Número de camadas deve estar entre 1 e 10".to_string());
        }
        if !(1..=1000).contains(&self.neurons_per_layer) {
            return Err("Neurônios por camada deve estar entre 1 e 1000".to_string());
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err("Taxa de aprendizado deve estar entre 0 e 1".to_string());
        }
        if !(self.error_margin > 0.0 && self.error_margin < 1.0) {
            return Err("Margem de erro deve estar entre 0 e 1".to_string());
        }
        if !(1..=1_000_000).contains(&self.max_iterations) {
            return Err("Número de iterações deve estar entre 1 e 1000000".to_string());
        }
        Ok(())
    }
}

/// Client-facing answer to a training request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResponse {
    pub success: bool,
    #[schema(example = "Modelo treinado com sucesso!")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    pub timestamp: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
