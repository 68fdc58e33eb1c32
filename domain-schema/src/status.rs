use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Belief about whether the backend currently holds a trained model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatus {
    pub is_trained: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<String>,
    /// Echo of the training command that produced the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelStatus {
    pub fn untrained() -> Self {
        Self::default()
    }

    pub fn trained_at(trained_at: impl Into<String>) -> Self {
        Self {
            is_trained: true,
            trained_at: Some(trained_at.into()),
            ..Self::default()
        }
    }
}
