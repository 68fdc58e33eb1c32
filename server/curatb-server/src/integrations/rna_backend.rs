//! HTTP client for the backend RNA service
//!
//! Every proxy endpoint makes exactly one call through this client. There is
//! no retry and no timeout override: a failed call is terminal for the
//! request that triggered it.

use axum::body::Bytes;
use domain_schema::{BackendEnvelope, PatientRecord};
use reqwest::{header, multipart};
use serde_json::Value;
use thiserror::Error;

/// Backend paths, relative to the configured base URL
pub mod paths {
    pub const RECOGNIZE: &str = "/tuberculosis-rna/rna/recognize";
    pub const TRAIN: &str = "/tuberculosis-rna/rna";
    pub const UPLOAD: &str = "/arquivo/upload";
}

#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached or the connection broke
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status
    #[error("Backend returned HTTP {0}")]
    Status(u16),

    /// The backend answered with something that is not the expected JSON
    #[error("Backend reply could not be decoded: {0}")]
    Decode(String),

    /// The HTTP client itself could not be set up (TLS backend, resolver)
    #[error("Backend client could not be built: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        BackendError::Transport(error.to_string())
    }
}

/// A decoded backend answer together with its HTTP status
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub http_status: u16,
    pub envelope: BackendEnvelope,
}

/// File part taken from a client upload, re-sent as-is
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Client for the RNA service endpoints
#[derive(Debug, Clone)]
pub struct RnaBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl RnaBackendClient {
    /// # Errors
    ///
    /// [`BackendError::Setup`] when reqwest cannot build its client.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("curatb-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Setup(e.to_string()))?;

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

    /// Forward an inference request, body bytes untouched.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx statuses and non-JSON replies.
    pub async fn recognize(&self, body: Bytes) -> Result<BackendReply, BackendError> {
        let response = self
            .client
            .post(self.url(paths::RECOGNIZE))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        Self::decode_success(response).await
    }

    /// Forward a training command as JSON
    ///
    /// # Errors
    ///
    /// Same failure modes as [`RnaBackendClient::recognize`].
    pub async fn train(&self, command: &Value) -> Result<BackendReply, BackendError> {
        let response = self
            .client
            .post(self.url(paths::TRAIN))
            .json(command)
            .send()
            .await?;

        Self::decode_success(response).await
    }

    /// Synthetic inference call used to find out whether a model exists.
    ///
    /// The HTTP status is ignored: the backend reports "not trained" in the
    /// body, whatever status line it picks.
    ///
    /// # Errors
    ///
    /// Fails when the backend is unreachable or the body is not JSON.
    pub async fn probe(&self) -> Result<BackendEnvelope, BackendError> {
        let response = self
            .client
            .post(self.url(paths::RECOGNIZE))
            .json(&PatientRecord::probe_payload())
            .send()
            .await?;

        response
            .json::<BackendEnvelope>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Re-wrap a file into a fresh multipart body and hand back the
    /// backend's status and JSON reply verbatim.
    ///
    /// # Errors
    ///
    /// Fails when the backend is unreachable or replies with non-JSON.
    pub async fn upload(&self, file: UploadedFile) -> Result<(u16, Value), BackendError> {
        let part = multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| BackendError::Transport(format!("Invalid file content type: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(paths::UPLOAD))
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok((status, body))
    }

    async fn decode_success(response: reqwest::Response) -> Result<BackendReply, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let envelope = response
            .json::<BackendEnvelope>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(BackendReply {
            http_status: status.as_u16(),
            envelope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = RnaBackendClient::new("http://rna:8080/").unwrap();
        assert_eq!(client.base_url(), "http://rna:8080");
        assert_eq!(client.url(paths::TRAIN), "http://rna:8080/tuberculosis-rna/rna");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", paths::RECOGNIZE)
            .with_status(503)
            .with_body("down")
            .create_async()
            .await;

        let client = RnaBackendClient::new(&server.url()).unwrap();
        let result = client.recognize(Bytes::from_static(b"{}")).await;
        assert!(matches!(result, Err(BackendError::Status(503))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe_reads_body_of_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", paths::RECOGNIZE)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":400,"error":"Rede neural não treinada."}"#)
            .create_async()
            .await;

        let client = RnaBackendClient::new(&server.url()).unwrap();
        let envelope = client.probe().await.unwrap();
        assert!(envelope.reports_untrained_model());
    }
}
