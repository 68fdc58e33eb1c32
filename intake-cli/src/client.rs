use std::path::Path;

use async_trait::async_trait;
use domain_schema::{
    now_iso, ModelStatus, PatientRecord, PredictionResult, TrainingCommand, TrainingResponse,
    UploadEnvelope,
};
use error_common::{CuraError, Result};
use reqwest::multipart;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::console::TrainingGateway;
use crate::wizard::PredictionGateway;

/// Message shown whenever the proxy cannot be reached
pub const CONNECTION_ERROR: &str = "Erro de conexão com o servidor";

/// Status given to results synthesised after a transport failure
pub const CONNECTION_ERROR_STATUS: u16 = 500;

pub mod paths {
    pub const PREDICT: &str = "/api/tuberculosis/predict";
    pub const TRAIN: &str = "/api/tuberculosis/train";
    pub const MODEL_STATUS: &str = "/api/tuberculosis/model-status";
    pub const UPLOAD: &str = "/api/arquivo/upload";
}

/// Typed client for the CuraTB proxy.
///
/// The proxy answers every endpoint with a JSON body, including its errors,
/// so the body is decoded whatever the HTTP status. Only a failed exchange
/// (no connection, unreadable body) turns into a synthesised result.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    /// # Errors
    ///
    /// [`CuraError::Config`] when reqwest cannot build its client.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("curatb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CuraError::Config(format!("HTTP client could not be built: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| CuraError::Transport(format!("Unreadable proxy reply: {}", e)))
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| CuraError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn try_predict(&self, record: &PatientRecord) -> Result<PredictionResult> {
        self.post_json(paths::PREDICT, record).await
    }

    async fn try_train(&self, command: &TrainingCommand) -> Result<TrainingResponse> {
        self.post_json(paths::TRAIN, command).await
    }

    async fn try_model_status(&self) -> Result<ModelStatus> {
        let response = self
            .client
            .get(self.url(paths::MODEL_STATUS))
            .send()
            .await
            .map_err(|e| CuraError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn try_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadEnvelope> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| CuraError::Internal(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(paths::UPLOAD))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CuraError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    pub async fn predict(&self, record: &PatientRecord) -> PredictionResult {
        self.try_predict(record).await.unwrap_or_else(|e| {
            log_transport_failure("predict", &e);
            PredictionResult::failure(CONNECTION_ERROR_STATUS, CONNECTION_ERROR)
        })
    }

    pub async fn train(&self, command: &TrainingCommand) -> TrainingResponse {
        self.try_train(command).await.unwrap_or_else(|e| {
            log_transport_failure("train", &e);
            TrainingResponse {
                success: false,
                message: CONNECTION_ERROR.to_string(),
                model_id: None,
                timestamp: now_iso(),
                status: CONNECTION_ERROR_STATUS,
                error: Some(CONNECTION_ERROR.to_string()),
            }
        })
    }

    pub async fn model_status(&self) -> ModelStatus {
        self.try_model_status().await.unwrap_or_else(|e| {
            log_transport_failure("model_status", &e);
            ModelStatus {
                error: Some(CONNECTION_ERROR.to_string()),
                ..ModelStatus::untrained()
            }
        })
    }

    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> UploadEnvelope {
        self.try_upload(file_name, bytes).await.unwrap_or_else(|e| {
            log_transport_failure("upload", &e);
            UploadEnvelope {
                timestamp: now_iso(),
                status: CONNECTION_ERROR_STATUS,
                error: Some(CONNECTION_ERROR.to_string()),
                path: Some(paths::UPLOAD.to_string()),
                data: serde_json::Value::Null,
            }
        })
    }

    /// Read a dataset from disk and upload it
    ///
    /// # Errors
    ///
    /// Only reading the local file can fail; proxy problems come back as an
    /// error-shaped envelope.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadEnvelope> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("dataset")
            .to_string();
        Ok(self.upload(&file_name, bytes).await)
    }
}

fn log_transport_failure(operation: &str, error: &CuraError) {
    warn!(
        operation = operation,
        error_code = error.code(),
        error = %error,
        "Proxy call failed"
    );
}

#[async_trait]
impl PredictionGateway for ProxyClient {
    async fn predict(&self, record: &PatientRecord) -> PredictionResult {
        ProxyClient::predict(self, record).await
    }
}

#[async_trait]
impl TrainingGateway for ProxyClient {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> UploadEnvelope {
        ProxyClient::upload(self, file_name, bytes).await
    }

    async fn train(&self, command: &TrainingCommand) -> TrainingResponse {
        ProxyClient::train(self, command).await
    }
}
