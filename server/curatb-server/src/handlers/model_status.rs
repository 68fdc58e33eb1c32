use axum::{extract::State, Json};
use config_engine::ProbeFailurePolicy;
use domain_schema::{now_iso, ModelStatus};
use tracing::{debug, warn};

use crate::error::{ApiError, Surface};
use crate::server::CuraServer;

/// Report whether the backend currently holds a trained model.
///
/// The backend probe decides; the status store only adds what it knows
/// about the model (id, training time, parameters).
#[utoipa::path(
    get,
    path = "/api/tuberculosis/model-status",
    tag = "tuberculosis",
    responses(
        (status = 200, description = "Current model status", body = ModelStatus),
        (status = 500, description = "Status store unreadable", body = ModelStatus)
    )
)]
pub async fn model_status(State(server): State<CuraServer>) -> Result<Json<ModelStatus>, ApiError> {
    let store_error = |e: crate::storage::StoreError| ApiError::internal(Surface::ModelStatus, e.to_string());

    let trained = match server.backend.probe().await {
        Ok(envelope) if envelope.reports_untrained_model() => {
            debug!("Backend reports no trained model");
            server
                .status_store
                .invalidate_current()
                .await
                .map_err(store_error)?;
            false
        }
        Ok(_) => true,
        Err(e) => {
            warn!(
                error = %e,
                policy = ?server.settings.probe_failure,
                "Model status probe failed"
            );
            server.settings.probe_failure == ProbeFailurePolicy::AssumeTrained
        }
    };

    if !trained {
        return Ok(Json(ModelStatus::untrained()));
    }

    let status = server
        .status_store
        .current()
        .await
        .map_err(store_error)?
        .filter(|status| status.is_trained)
        .unwrap_or_else(|| ModelStatus::trained_at(now_iso()));

    Ok(Json(status))
}
