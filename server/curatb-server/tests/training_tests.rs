mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::*;
use curatb_server::storage::{InMemoryStatusStore, ModelStatusStore};
use mockito::Matcher;
use serde_json::json;
use tower::ServiceExt;

const TRAIN_BACKEND: &str = "/tuberculosis-rna/rna";
const TRAIN: &str = "/api/tuberculosis/train";

fn command(path: &str) -> serde_json::Value {
    json!({
        "encryptedFilePath": path,
        "hiddenLayers": 2,
        "neuronsPerLayer": 10,
        "learningRate": 0.1,
        "errorMargin": 0.01,
        "maxIterations": 1000
    })
}

#[tokio::test]
async fn test_empty_dataset_reference_never_reaches_backend() {
    let mut backend = mockito::Server::new_async().await;
    let mock = backend
        .mock("POST", TRAIN_BACKEND)
        .expect(0)
        .create_async()
        .await;
    let app = app_with(settings_for(&backend.url()), Arc::new(InMemoryStatusStore::new()));

    let mut without_path = command("");
    without_path.as_object_mut().unwrap().remove("encryptedFilePath");

    for payload in [command(""), without_path] {
        let response = app
            .clone()
            .oneshot(post_json(TRAIN, payload.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Caminho do arquivo criptografado é obrigatório");
        assert_eq!(body["error"], "encryptedFilePath é obrigatório");
        assert_eq!(body["status"], 400);
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_successful_training_is_recorded() {
    let mut backend = mockito::Server::new_async().await;
    let mock = backend
        .mock("POST", TRAIN_BACKEND)
        .match_body(Matcher::PartialJson(json!({
            "encryptedFilePath": "/enc/dataset-01.bin",
            "hiddenLayers": 2
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"timestamp":"2024-05-01T08:00:00.000Z","status":201,"data":{"modelId":"rna-2024-05"}}"#)
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(InMemoryStatusStore::new());
    let app = app_with(settings_for(&backend.url()), store.clone());

    let response = app
        .oneshot(post_json(TRAIN, command("/enc/dataset-01.bin").to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["modelId"], "rna-2024-05");
    assert_eq!(body["message"], "Modelo treinado com sucesso!");
    assert_eq!(body["status"], 201);
    assert_eq!(body["timestamp"], "2024-05-01T08:00:00.000Z");
    mock.assert_async().await;

    let current = store.current().await.unwrap().unwrap();
    assert!(current.is_trained);
    assert_eq!(current.model_id.as_deref(), Some("rna-2024-05"));
    assert!(current.trained_at.is_some());
    assert_eq!(
        current.parameters.unwrap()["encryptedFilePath"],
        "/enc/dataset-01.bin"
    );
}

#[tokio::test]
async fn test_placeholder_model_id_when_backend_has_none() {
    let mut backend = mockito::Server::new_async().await;
    let _mock = backend
        .mock("POST", TRAIN_BACKEND)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":200,"data":null}"#)
        .create_async()
        .await;

    let store = Arc::new(InMemoryStatusStore::new());
    let app = app_with(settings_for(&backend.url()), store.clone());

    let response = app
        .oneshot(post_json(TRAIN, command("/enc/a.bin").to_string()))
        .await
        .unwrap();
    let body = read_json(response).await;
    let model_id = body["modelId"].as_str().unwrap().to_string();
    assert!(model_id.starts_with("model_"));
    assert!(model_id["model_".len()..].parse::<i64>().is_ok());

    assert!(store.get(&model_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_backend_rejection_is_not_recorded() {
    let mut backend = mockito::Server::new_async().await;
    let _mock = backend
        .mock("POST", TRAIN_BACKEND)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":422,"error":"Arquivo inválido"}"#)
        .create_async()
        .await;

    let store = Arc::new(InMemoryStatusStore::new());
    let app = app_with(settings_for(&backend.url()), store.clone());

    let response = app
        .oneshot(post_json(TRAIN, command("/enc/a.bin").to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 422);
    assert_eq!(body["error"], "Arquivo inválido");
    assert!(store.current().await.unwrap().is_none());
}

#[tokio::test]
async fn test_reply_without_body_status_is_not_recorded() {
    let mut backend = mockito::Server::new_async().await;
    let _mock = backend
        .mock("POST", TRAIN_BACKEND)
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"modelId":"rna-9"}}"#)
        .create_async()
        .await;

    let store = Arc::new(InMemoryStatusStore::new());
    let app = app_with(settings_for(&backend.url()), store.clone());

    let response = app
        .oneshot(post_json(TRAIN, command("/enc/a.bin").to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 200);
    assert!(store.current().await.unwrap().is_none());
}

#[tokio::test]
async fn test_backend_failure_is_generic_500() {
    let mut backend = mockito::Server::new_async().await;
    let _mock = backend
        .mock("POST", TRAIN_BACKEND)
        .with_status(500)
        .create_async()
        .await;
    let app = app_with(settings_for(&backend.url()), Arc::new(InMemoryStatusStore::new()));

    let response = app
        .oneshot(post_json(TRAIN, command("/enc/a.bin").to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Erro interno do servidor ao treinar o modelo");
    assert_eq!(body["error"], "Erro interno do servidor");
    assert_eq!(body["status"], 500);
}
