use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use chrono::Utc;
use domain_schema::{is_blank, now_iso, ModelStatus, TrainingResponse};
use serde_json::Value;
use tracing::{error, info};

use crate::error::{ApiError, Surface};
use crate::integrations::BackendReply;
use crate::server::CuraServer;

pub const DEFAULT_TRAINING_MESSAGE: &str = "Modelo treinado com sucesso!";

/// Train the backend network on a previously uploaded dataset.
///
/// Only the dataset reference is checked here; hyperparameters are passed
/// to the backend as received.
#[utoipa::path(
    post,
    path = "/api/tuberculosis/train",
    tag = "tuberculosis",
    request_body = domain_schema::TrainingCommand,
    responses(
        (status = 200, description = "Backend answered the training request", body = TrainingResponse),
        (status = 400, description = "Dataset reference missing", body = TrainingResponse),
        (status = 413, description = "Body exceeds the configured limit", body = TrainingResponse),
        (status = 500, description = "Backend unavailable or failed", body = TrainingResponse)
    )
)]
pub async fn train(
    State(server): State<CuraServer>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TrainingResponse>, ApiError> {
    let body = body.map_err(|e| ApiError::unreadable_body(Surface::Training, e))?;
    let command: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::internal(Surface::Training, format!("Invalid JSON body: {}", e)))?;

    let dataset = command.get("encryptedFilePath");
    if is_blank(dataset) {
        return Err(ApiError::missing_dataset());
    }

    let handle = dataset.and_then(Value::as_str).unwrap_or_default();
    info!(
        dataset = %server.redactor.redact_dataset_handle(handle),
        "Forwarding training request"
    );

    let reply = server
        .backend
        .train(&command)
        .await
        .map_err(|e| ApiError::upstream(Surface::Training, e))?;

    let response = training_response(&reply, || {
        format!("model_{}", Utc::now().timestamp_millis())
    });

    if response.success {
        let status = ModelStatus {
            is_trained: true,
            model_id: response.model_id.clone(),
            trained_at: Some(now_iso()),
            parameters: Some(command),
            error: None,
        };
        // The backend already holds the model; a local write failure only
        // loses metadata, so the client still gets the backend's answer.
        if let Err(e) = server.status_store.record(status).await {
            error!(error = %e, "Failed to record model status");
        }
    }

    info!(
        model_id = response.model_id.as_deref().unwrap_or_default(),
        success = response.success,
        status = response.status,
        "Training request completed"
    );
    Ok(Json(response))
}

/// Backend training reply to client-facing response
pub fn training_response(
    reply: &BackendReply,
    fallback_model_id: impl FnOnce() -> String,
) -> TrainingResponse {
    let envelope = &reply.envelope;
    // Success follows the status the backend put in its body; the HTTP
    // status line is not consulted.
    let success = matches!(envelope.reported_status(), Some(200 | 201));
    let status = envelope.reported_status().unwrap_or(200);

    let message = envelope
        .data_str("message")
        .or_else(|| envelope.message.as_deref().filter(|m| !m.is_empty()))
        .unwrap_or(DEFAULT_TRAINING_MESSAGE)
        .to_string();

    TrainingResponse {
        success,
        message,
        model_id: Some(
            envelope
                .data_str("modelId")
                .map(str::to_string)
                .unwrap_or_else(fallback_model_id),
        ),
        timestamp: envelope.timestamp_or_else(now_iso),
        status,
        error: envelope.error.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(http_status: u16, body: Value) -> BackendReply {
        BackendReply {
            http_status,
            envelope: serde_json::from_value(body).unwrap(),
        }
    }

    #[test]
    fn test_backend_model_id_and_message_win() {
        let response = training_response(
            &reply(200, json!({"status": 201, "data": {"modelId": "rna-7", "message": "Treinado"}})),
            || "model_0".to_string(),
        );
        assert!(response.success);
        assert_eq!(response.status, 201);
        assert_eq!(response.model_id.as_deref(), Some("rna-7"));
        assert_eq!(response.message, "Treinado");
    }

    #[test]
    fn test_fallbacks() {
        let response = training_response(&reply(200, json!({})), || "model_42".to_string());
        assert!(!response.success);
        assert_eq!(response.status, 200);
        assert_eq!(response.model_id.as_deref(), Some("model_42"));
        assert_eq!(response.message, DEFAULT_TRAINING_MESSAGE);

        let response = training_response(
            &reply(200, json!({"message": "Iniciado"})),
            || "model_1".to_string(),
        );
        assert_eq!(response.message, "Iniciado");
    }

    #[test]
    fn test_http_status_does_not_decide_success() {
        let response = training_response(
            &reply(201, json!({"data": {"modelId": "rna-3"}})),
            || "model_1".to_string(),
        );
        assert!(!response.success);
        assert_eq!(response.status, 200);
        assert_eq!(response.model_id.as_deref(), Some("rna-3"));

        let response = training_response(&reply(200, json!({"status": 201})), || "m".to_string());
        assert!(response.success);
        assert_eq!(response.status, 201);
    }

    #[test]
    fn test_body_status_decides_success() {
        let response = training_response(
            &reply(200, json!({"status": 422, "error": "Parâmetros inválidos"})),
            || "model_1".to_string(),
        );
        assert!(!response.success);
        assert_eq!(response.status, 422);
        assert_eq!(response.error.as_deref(), Some("Parâmetros inválidos"));
    }
}
