#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use config_engine::{ServerSettings, StatusStoreKind};
use curatb_server::{create_app, storage::ModelStatusStore, CuraServer};
use serde_json::{json, Value};

pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:1";

pub fn settings_for(backend_url: &str) -> ServerSettings {
    ServerSettings {
        backend_url: backend_url.to_string(),
        status_store: StatusStoreKind::Memory,
        ..ServerSettings::default()
    }
}

pub fn app_with(settings: ServerSettings, store: Arc<dyn ModelStatusStore>) -> Router {
    create_app(CuraServer::with_store(settings, store).unwrap())
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A record with every required field filled in
pub fn complete_patient() -> Value {
    json!({
        "idade": 45,
        "sexo": "1",
        "raca": 4,
        "zona": 1,
        "tipoEntrada": 1,
        "radiografiaTorax": 2,
        "formaTuberculose": 1,
        "agravanteAIDS": 2,
        "agravanteAlcoolismo": 1,
        "agravanteDiabetes": 2,
        "agravanteDoencaMental": 2,
        "baciloscopia": 1,
        "culturaEscarro": 1
    })
}
