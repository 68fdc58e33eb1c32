use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domain_schema::ModelStatus;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{model_id_of, ModelStatusStore, StoreError};

/// On-disk layout of the status file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StatusFile {
    #[serde(default)]
    current: Option<String>,
    #[serde(default)]
    models: BTreeMap<String, ModelStatus>,
}

/// Status store persisted as a single JSON document.
///
/// Every operation reads the file under a mutex, so several handles on the
/// same path inside one process stay consistent. Writes go to a sibling
/// temporary file that is renamed over the original.
#[derive(Debug)]
pub struct JsonFileStatusStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StatusFile, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(StatusFile::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StatusFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, file: &StatusFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, serde_json::to_vec_pretty(file)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ModelStatusStore for JsonFileStatusStore {
    async fn record(&self, status: ModelStatus) -> Result<(), StoreError> {
        let model_id = model_id_of(&status)?;
        let _guard = self.lock.lock().await;

        let mut file = self.load().await?;
        file.models.insert(model_id.clone(), status);
        file.current = Some(model_id);
        self.save(&file).await?;

        tracing::debug!(path = %self.path.display(), "Model status recorded");
        Ok(())
    }

    async fn current(&self) -> Result<Option<ModelStatus>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        Ok(file
            .current
            .take()
            .and_then(|id| file.models.remove(&id)))
    }

    async fn get(&self, model_id: &str) -> Result<Option<ModelStatus>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.models.remove(model_id))
    }

    async fn invalidate_current(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        if file.current.take().is_some() {
            self.save(&file).await?;
        }
        Ok(())
    }
}
