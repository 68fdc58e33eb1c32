use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::routes::paths;
use crate::server::CuraServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::health::version_info,
        crate::handlers::prediction::predict,
        crate::handlers::training::train,
        crate::handlers::model_status::model_status,
        crate::handlers::upload::upload,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,
            crate::handlers::health::VersionResponse,
            crate::handlers::upload::UploadForm,
            domain_schema::PatientRecord,
            domain_schema::PredictionResult,
            domain_schema::TrainingCommand,
            domain_schema::TrainingResponse,
            domain_schema::ModelStatus,
            domain_schema::UploadEnvelope,
        )
    ),
    tags(
        (name = "health", description = "Proxy health and version"),
        (name = "tuberculosis", description = "Cure-time prediction, training and model status"),
        (name = "arquivo", description = "Training dataset upload"),
    ),
    info(
        title = "CuraTB API",
        version = "0.1.0",
        description = "Browser-facing proxy in front of the tuberculosis cure-time RNA service.",
        license(name = "AGPL-3.0-only"),
    ),
)]
pub struct ApiDoc;

/// Serve the generated document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn docs_routes() -> Router<CuraServer> {
    Router::new().route(paths::docs::OPENAPI_JSON, get(openapi_json))
}
