//! Model status storage for CuraTB
//!
//! The store is the only place the proxy remembers anything between
//! requests. It holds metadata about trained models (id, training time,
//! parameters) and a pointer to the current one. Whether a model is actually
//! trained is always settled by probing the backend; the store never
//! overrides a probe.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStatusStore;
pub use memory::InMemoryStatusStore;

use async_trait::async_trait;
use domain_schema::ModelStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Status store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Status store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Model status has no model id")]
    MissingModelId,
}

/// Explicit read/write interface over the model status record
#[async_trait]
pub trait ModelStatusStore: Send + Sync {
    /// Store `status` under its model id and make it the current model
    async fn record(&self, status: ModelStatus) -> Result<(), StoreError>;

    /// Status of the current model, if any
    async fn current(&self) -> Result<Option<ModelStatus>, StoreError>;

    /// Status recorded for a specific model id
    async fn get(&self, model_id: &str) -> Result<Option<ModelStatus>, StoreError>;

    /// Forget which model is current; history is kept
    async fn invalidate_current(&self) -> Result<(), StoreError>;
}

fn model_id_of(status: &ModelStatus) -> Result<String, StoreError> {
    status
        .model_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(StoreError::MissingModelId)
}
