//! CuraTB Server - browser-facing proxy for the tuberculosis RNA service
//!
//! Four endpoints sit in front of the backend: prediction, training, model
//! status and dataset upload. Each makes one backend call, reshapes the
//! answer for the browser and turns every failure into that endpoint's JSON
//! error shape.

pub mod error;
pub mod handlers;
pub mod integrations;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use error::*;
pub use server::CuraServer;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: CuraServer) -> Router {
    let max_body = server.settings.max_upload_bytes;

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer(&server.settings.allowed_origins))
                .layer(from_fn(middleware::request_timing_middleware))
                // Enforced by the extractors so handlers can answer 413 in
                // their own JSON shape
                .layer(DefaultBodyLimit::max(max_body)),
        )
        .with_state(server)
}
