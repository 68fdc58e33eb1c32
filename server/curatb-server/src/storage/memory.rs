use std::collections::HashMap;

use async_trait::async_trait;
use domain_schema::ModelStatus;
use tokio::sync::RwLock;

use super::{model_id_of, ModelStatusStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    current: Option<String>,
    models: HashMap<String, ModelStatus>,
}

/// Process-lifetime store for tests and throwaway runs
#[derive(Debug, Default)]
pub struct InMemoryStatusStore {
    inner: RwLock<Inner>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModelStatusStore for InMemoryStatusStore {
    async fn record(&self, status: ModelStatus) -> Result<(), StoreError> {
        let model_id = model_id_of(&status)?;
        let mut inner = self.inner.write().await;
        inner.models.insert(model_id.clone(), status);
        inner.current = Some(model_id);
        Ok(())
    }

    async fn current(&self) -> Result<Option<ModelStatus>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .current
            .as_ref()
            .and_then(|id| inner.models.get(id))
            .cloned())
    }

    async fn get(&self, model_id: &str) -> Result<Option<ModelStatus>, StoreError> {
        Ok(self.inner.read().await.models.get(model_id).cloned())
    }

    async fn invalidate_current(&self) -> Result<(), StoreError> {
        self.inner.write().await.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained(id: &str) -> ModelStatus {
        ModelStatus {
            model_id: Some(id.to_string()),
            ..ModelStatus::trained_at("2024-05-01T12:00:00.000Z")
        }
    }

    #[tokio::test]
    async fn test_record_moves_current_pointer() {
        let store = InMemoryStatusStore::new();
        assert!(store.current().await.unwrap().is_none());

        store.record(trained("model_1")).await.unwrap();
        store.record(trained("model_2")).await.unwrap();

        let current = store.current().await.unwrap().unwrap();
        assert_eq!(current.model_id.as_deref(), Some("model_2"));
        assert!(store.get("model_1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalidate_keeps_history() {
        let store = InMemoryStatusStore::new();
        store.record(trained("model_1")).await.unwrap();
        store.invalidate_current().await.unwrap();

        assert!(store.current().await.unwrap().is_none());
        assert!(store.get("model_1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_status_without_id_is_refused() {
        let store = InMemoryStatusStore::new();
        let result = store.record(ModelStatus::trained_at("now")).await;
        assert!(matches!(result, Err(StoreError::MissingModelId)));
    }
}
