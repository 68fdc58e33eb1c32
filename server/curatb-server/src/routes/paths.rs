//! Centralized route path constants
//!
//! utoipa `#[path(...)]` attributes need string literals, so they repeat
//! these values; keep the two in sync.

/// Operational endpoints
pub mod health {
    pub const HEALTH: &str = "/health";
    pub const VERSION: &str = "/version";
}

/// Browser-facing proxy endpoints
pub mod api {
    pub const PREDICT: &str = "/api/tuberculosis/predict";
    pub const TRAIN: &str = "/api/tuberculosis/train";
    pub const MODEL_STATUS: &str = "/api/tuberculosis/model-status";
    pub const UPLOAD: &str = "/api/arquivo/upload";
}

/// API documentation
pub mod docs {
    pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
}
