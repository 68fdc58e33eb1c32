use std::sync::Arc;

use config_engine::{ServerSettings, StatusStoreKind};
use logger_redacted::PhiRedactor;

use crate::integrations::{BackendError, RnaBackendClient};
use crate::storage::{InMemoryStatusStore, JsonFileStatusStore, ModelStatusStore};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct CuraServer {
    pub settings: Arc<ServerSettings>,
    /// Client for the backend RNA service
    pub backend: RnaBackendClient,
    /// Authoritative model status record
    pub status_store: Arc<dyn ModelStatusStore>,
    pub redactor: PhiRedactor,
}

impl CuraServer {
    /// Build the state with the status store selected in `settings`
    ///
    /// # Errors
    ///
    /// Fails when the backend HTTP client cannot be built.
    pub fn new(settings: ServerSettings) -> Result<Self, BackendError> {
        let status_store: Arc<dyn ModelStatusStore> = match settings.status_store {
            StatusStoreKind::File => {
                Arc::new(JsonFileStatusStore::new(settings.status_store_path.clone()))
            }
            StatusStoreKind::Memory => Arc::new(InMemoryStatusStore::new()),
        };
        Self::with_store(settings, status_store)
    }

    /// Build the state around an existing store; tests use this to inspect it
    ///
    /// # Errors
    ///
    /// Fails when the backend HTTP client cannot be built.
    pub fn with_store(
        settings: ServerSettings,
        status_store: Arc<dyn ModelStatusStore>,
    ) -> Result<Self, BackendError> {
        let backend = RnaBackendClient::new(settings.backend_base())?;
        Ok(Self {
            settings: Arc::new(settings),
            backend,
            status_store,
            redactor: PhiRedactor::default(),
        })
    }

    pub fn with_redactor(mut self, redactor: PhiRedactor) -> Self {
        self.redactor = redactor;
        self
    }
}
