pub mod paths;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{health, model_status, prediction, training, upload},
    openapi,
    server::CuraServer,
};

/// Create health check routes
pub fn health_routes() -> Router<CuraServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::VERSION, get(health::version_info))
}

/// Create tuberculosis prediction and training routes
pub fn tuberculosis_routes() -> Router<CuraServer> {
    Router::new()
        .route(paths::api::PREDICT, post(prediction::predict))
        .route(paths::api::TRAIN, post(training::train))
        .route(paths::api::MODEL_STATUS, get(model_status::model_status))
}

/// Create dataset upload routes
pub fn upload_routes() -> Router<CuraServer> {
    Router::new().route(paths::api::UPLOAD, post(upload::upload))
}

/// Create all application routes
pub fn create_routes() -> Router<CuraServer> {
    Router::new()
        .merge(health_routes())
        .merge(tuberculosis_routes())
        .merge(upload_routes())
        .merge(openapi::docs_routes())
}
