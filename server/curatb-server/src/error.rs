use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use domain_schema::{now_iso, ModelStatus, PredictionResult, TrainingResponse, UploadEnvelope};
use error_common::codes;
use logger_redacted::PhiRedactor;
use thiserror::Error;
use tracing::{error, warn};

use crate::integrations::BackendError;
use crate::routes::paths;

pub const MISSING_FIELD_PREFIX: &str = "Campo obrigatório não preenchido";
pub const MODEL_NOT_TRAINED_MESSAGE: &str =
    "Modelo não treinado. Treine o modelo antes de realizar análises.";
pub const PREDICTION_FAILED_MESSAGE: &str = "Erro interno do servidor ao processar a análise";
pub const DATASET_REQUIRED_MESSAGE: &str = "Caminho do arquivo criptografado é obrigatório";
pub const DATASET_REQUIRED_ERROR: &str = "encryptedFilePath é obrigatório";
pub const TRAINING_FAILED_MESSAGE: &str = "Erro interno do servidor ao treinar o modelo";
pub const INTERNAL_ERROR: &str = "Erro interno do servidor";
pub const NO_FILE_MESSAGE: &str = "Nenhum arquivo foi enviado";
pub const STATUS_CHECK_FAILED_MESSAGE: &str = "Erro ao verificar status do modelo";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Requisição excede o tamanho máximo permitido";

/// Endpoint an error belongs to; each one answers with its own JSON shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Prediction,
    Training,
    ModelStatus,
    Upload,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Prediction => "prediction",
            Surface::Training => "training",
            Surface::ModelStatus => "model_status",
            Surface::Upload => "upload",
        }
    }
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller payload is missing something; detected locally
    #[error("Validation error: {message}")]
    Validation {
        surface: Surface,
        message: String,
        /// Short machine-oriented companion message, when the surface has one
        detail: Option<String>,
    },

    /// Backend answered that no network has been trained yet
    #[error("Model not trained")]
    ModelNotTrained { timestamp: Option<String> },

    #[error("Upstream error: {source}")]
    Upstream {
        surface: Surface,
        #[source]
        source: BackendError,
    },

    #[error("Internal server error: {message}")]
    Internal { surface: Surface, message: String },

    /// Body exceeded the configured upload limit
    #[error("Request body too large")]
    PayloadTooLarge { surface: Surface },
}

impl ApiError {
    /// First blank required field of a prediction request
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            surface: Surface::Prediction,
            message: format!("{}: {}", MISSING_FIELD_PREFIX, field),
            detail: None,
        }
    }

    pub fn missing_dataset() -> Self {
        Self::Validation {
            surface: Surface::Training,
            message: DATASET_REQUIRED_MESSAGE.to_string(),
            detail: Some(DATASET_REQUIRED_ERROR.to_string()),
        }
    }

    pub fn missing_upload_file() -> Self {
        Self::Validation {
            surface: Surface::Upload,
            message: NO_FILE_MESSAGE.to_string(),
            detail: None,
        }
    }

    pub fn upstream(surface: Surface, source: BackendError) -> Self {
        Self::Upstream { surface, source }
    }

    pub fn internal(surface: Surface, message: impl Into<String>) -> Self {
        Self::Internal {
            surface,
            message: message.into(),
        }
    }

    /// Body that could not be buffered; over-limit bodies get their own 413
    pub fn unreadable_body(surface: Surface, rejection: BytesRejection) -> Self {
        Self::from_body_status(surface, rejection.status(), rejection.body_text())
    }

    pub(crate) fn from_body_status(surface: Surface, status: StatusCode, detail: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge { surface }
        } else {
            Self::internal(surface, detail)
        }
    }

    pub fn surface(&self) -> Surface {
        match self {
            ApiError::Validation { surface, .. }
            | ApiError::Upstream { surface, .. }
            | ApiError::Internal { surface, .. }
            | ApiError::PayloadTooLarge { surface } => *surface,
            ApiError::ModelNotTrained { .. } => Surface::Prediction,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::ModelNotTrained { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::ModelNotTrained { .. } => "model_not_trained",
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::Internal { .. } => "internal_error",
            ApiError::PayloadTooLarge { .. } => "payload_too_large",
        }
    }

    /// Stable code attached to the log event
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => codes::validation::MISSING_REQUIRED_FIELD,
            ApiError::PayloadTooLarge { .. } => codes::validation::OUT_OF_RANGE,
            ApiError::ModelNotTrained { .. } => codes::model::NOT_TRAINED,
            ApiError::Upstream { source, .. } => match source {
                BackendError::Transport(_) => codes::upstream::UNREACHABLE,
                BackendError::Status(_) => codes::upstream::FAILED_STATUS,
                BackendError::Decode(_) => codes::upstream::UNDECODABLE_REPLY,
                BackendError::Setup(_) => codes::system::CONFIGURATION,
            },
            ApiError::Internal {
                surface: Surface::ModelStatus,
                ..
            } => codes::model::STATUS_STORE_FAILED,
            ApiError::Internal { .. } => codes::validation::MALFORMED_PAYLOAD,
        }
    }

    /// Client-facing body for this error on its surface
    fn body(&self, timestamp: String) -> serde_json::Value {
        let status = self.status_code().as_u16();
        let value = match (self.surface(), self) {
            (_, ApiError::ModelNotTrained { timestamp: reported }) => {
                let timestamp = reported
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or(timestamp);
                serde_json::to_value(PredictionResult::failure_at(
                    status,
                    MODEL_NOT_TRAINED_MESSAGE,
                    timestamp,
                ))
            }
            (Surface::Prediction, ApiError::Validation { message, .. }) => serde_json::to_value(
                PredictionResult::failure_at(status, message.clone(), timestamp),
            ),
            (Surface::Prediction, ApiError::PayloadTooLarge { .. }) => serde_json::to_value(
                PredictionResult::failure_at(status, PAYLOAD_TOO_LARGE_MESSAGE, timestamp),
            ),
            (Surface::Prediction, _) => serde_json::to_value(PredictionResult::failure_at(
                status,
                PREDICTION_FAILED_MESSAGE,
                timestamp,
            )),
            (Surface::Training, ApiError::Validation { message, detail, .. }) => {
                serde_json::to_value(TrainingResponse {
                    success: false,
                    message: message.clone(),
                    model_id: None,
                    timestamp,
                    status,
                    error: detail.clone(),
                })
            }
            (Surface::Training, ApiError::PayloadTooLarge { .. }) => {
                serde_json::to_value(TrainingResponse {
                    success: false,
                    message: PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
                    model_id: None,
                    timestamp,
                    status,
                    error: Some(PAYLOAD_TOO_LARGE_MESSAGE.to_string()),
                })
            }
            (Surface::Training, _) => serde_json::to_value(TrainingResponse {
                success: false,
                message: TRAINING_FAILED_MESSAGE.to_string(),
                model_id: None,
                timestamp,
                status,
                error: Some(INTERNAL_ERROR.to_string()),
            }),
            (Surface::ModelStatus, _) => serde_json::to_value(ModelStatus {
                error: Some(STATUS_CHECK_FAILED_MESSAGE.to_string()),
                ..ModelStatus::untrained()
            }),
            (Surface::Upload, error) => {
                let message = match error {
                    ApiError::Validation { message, .. } => message.clone(),
                    ApiError::PayloadTooLarge { .. } => PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
                    _ => INTERNAL_ERROR.to_string(),
                };
                serde_json::to_value(UploadEnvelope {
                    timestamp,
                    status,
                    error: Some(message),
                    path: Some(paths::api::UPLOAD.to_string()),
                    data: serde_json::Value::Null,
                })
            }
        };

        value.unwrap_or_else(|_| serde_json::json!({ "status": status, "error": INTERNAL_ERROR }))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        // Backend messages can echo request content
        let detail = PhiRedactor::default().redact(&self.to_string());

        if status_code.is_server_error() {
            error!(
                error_code = self.error_code(),
                error_type = self.error_type(),
                surface = self.surface().as_str(),
                status_code = status_code.as_u16(),
                error = %detail,
                "API error occurred"
            );
        } else {
            warn!(
                error_code = self.error_code(),
                error_type = self.error_type(),
                surface = self.surface().as_str(),
                status_code = status_code.as_u16(),
                error = %detail,
                "Request rejected"
            );
        }

        (status_code, Json(self.body(now_iso()))).into_response()
    }
}
