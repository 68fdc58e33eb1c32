use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::policy::{AgePolicy, ProbeFailurePolicy, StatusStoreKind};

/// Default file consulted when no explicit settings path is given
pub const DEFAULT_SETTINGS_FILE: &str = "curatb.toml";

/// Complete settings tree, one section per binary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub client: ClientSettings,
}

/// Proxy server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the proxy listens on
    pub bind_address: String,
    /// Base URL of the backend RNA service
    pub backend_url: String,
    pub status_store: StatusStoreKind,
    /// Location of the status file when `status_store = "file"`
    pub status_store_path: PathBuf,
    /// Largest dataset accepted by the upload endpoint
    pub max_upload_bytes: usize,
    pub probe_failure: ProbeFailurePolicy,
    /// Browser origins allowed by CORS; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            backend_url: "http://localhost:8080".to_string(),
            status_store: StatusStoreKind::File,
            status_store_path: PathBuf::from("./data/model-status.json"),
            max_upload_bytes: 50 * 1024 * 1024,
            probe_failure: ProbeFailurePolicy::AssumeUntrained,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerSettings {
    /// Backend base URL without a trailing slash, ready for path joining
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

/// Intake client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the CuraTB proxy
    pub proxy_url: String,
    pub age_policy: AgePolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            proxy_url: "http://localhost:3000".to_string(),
            age_policy: AgePolicy::ZeroTo120,
        }
    }
}

impl ClientSettings {
    pub fn proxy_base(&self) -> &str {
        self.proxy_url.trim_end_matches('/')
    }
}
