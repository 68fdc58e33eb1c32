use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use domain_schema::{
    first_missing_field, now_iso, BackendEnvelope, PredictionResult, UNDETERMINED_CURE_TIME,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ApiError, Surface};
use crate::server::CuraServer;

/// Run a cure-time prediction for one patient record.
///
/// The body is checked for the 13 required fields and then forwarded to the
/// backend byte for byte.
#[utoipa::path(
    post,
    path = "/api/tuberculosis/predict",
    tag = "tuberculosis",
    request_body = domain_schema::PatientRecord,
    responses(
        (status = 200, description = "Prediction computed", body = PredictionResult),
        (status = 400, description = "Missing field or model not trained", body = PredictionResult),
        (status = 413, description = "Body exceeds the configured limit", body = PredictionResult),
        (status = 500, description = "Backend unavailable or failed", body = PredictionResult)
    )
)]
pub async fn predict(
    State(server): State<CuraServer>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let body = body.map_err(|e| ApiError::unreadable_body(Surface::Prediction, e))?;
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::internal(Surface::Prediction, format!("Invalid JSON body: {}", e)))?;

    if let Some(field) = first_missing_field(&payload) {
        return Err(ApiError::missing_field(field));
    }

    debug!(
        patient = %server.redactor.summarize_patient(&payload),
        "Forwarding prediction request"
    );

    let reply = server
        .backend
        .recognize(body)
        .await
        .map_err(|e| ApiError::upstream(Surface::Prediction, e))?;

    if reply.envelope.reports_untrained_model() {
        if let Err(e) = server.status_store.invalidate_current().await {
            warn!(error = %e, "Could not clear current model after untrained reply");
        }
        return Err(ApiError::ModelNotTrained {
            timestamp: reply.envelope.timestamp,
        });
    }

    let result = reshape(reply.envelope);
    info!(
        tempo_cura = %result.tempo_cura,
        status = result.status,
        "Prediction completed"
    );
    Ok(Json(result))
}

/// Backend inference envelope to client-facing result, with the
/// browser-style defaults for blank values
pub fn reshape(envelope: BackendEnvelope) -> PredictionResult {
    PredictionResult {
        tempo_cura: envelope
            .data_str("tempoCura")
            .unwrap_or(UNDETERMINED_CURE_TIME)
            .to_string(),
        probabilidade: 0.0,
        timestamp: envelope.timestamp_or_else(now_iso),
        status: envelope.reported_status().unwrap_or(200),
        entrada_neuronio: envelope.input_vector(),
        saida_recognize: envelope.output_vector(),
        error: envelope.error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> BackendEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reshape_defaults() {
        let result = reshape(envelope(json!({"data": {}})));
        assert_eq!(result.tempo_cura, UNDETERMINED_CURE_TIME);
        assert_eq!(result.status, 200);
        assert_eq!(result.probabilidade, 0.0);
        assert!(result.entrada_neuronio.is_none());
        assert!(!result.timestamp.is_empty());
    }

    #[test]
    fn test_reshape_passes_backend_values_through() {
        let result = reshape(envelope(json!({
            "timestamp": "2024-03-01T10:00:00.000Z",
            "status": 200,
            "data": {"tempoCura": "9 meses", "entradaNeuronio": [1, 0], "saidaRecognize": [0.2]}
        })));
        assert_eq!(result.tempo_cura, "9 meses");
        assert_eq!(result.timestamp, "2024-03-01T10:00:00.000Z");
        assert_eq!(result.entrada_neuronio, Some(vec![1, 0]));
        assert_eq!(result.saida_recognize, Some(vec![0.2]));
        assert!(result.error.is_none());
    }
}
