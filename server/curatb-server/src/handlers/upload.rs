use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;
use utoipa::ToSchema;

use crate::error::{ApiError, Surface};
use crate::integrations::UploadedFile;
use crate::server::CuraServer;

/// Multipart field carrying the dataset
pub const FILE_FIELD: &str = "file";

/// Multipart form accepted by the upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// Dataset file
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Store a training dataset through the backend.
///
/// The reply and its status come straight from the backend.
#[utoipa::path(
    post,
    path = "/api/arquivo/upload",
    tag = "arquivo",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Backend stored the file", body = domain_schema::UploadEnvelope),
        (status = 400, description = "No file part", body = domain_schema::UploadEnvelope),
        (status = 413, description = "File exceeds the upload limit", body = domain_schema::UploadEnvelope),
        (status = 500, description = "Backend unavailable or failed", body = domain_schema::UploadEnvelope)
    )
)]
pub async fn upload(
    State(server): State<CuraServer>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    // A body that is not multipart cannot carry a file either
    let mut multipart = multipart.map_err(|_| ApiError::missing_upload_file())?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_failure)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or(FILE_FIELD).to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_failure)?;
        file = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let file = file.ok_or_else(ApiError::missing_upload_file)?;
    info!(
        file = %server.redactor.redact_dataset_handle(&file.file_name),
        size = file.bytes.len(),
        "Forwarding dataset upload"
    );

    let (status, body) = server
        .backend
        .upload(file)
        .await
        .map_err(|e| ApiError::upstream(Surface::Upload, e))?;

    let status = StatusCode::from_u16(status)
        .map_err(|e| ApiError::internal(Surface::Upload, e.to_string()))?;
    Ok((status, Json(body)).into_response())
}

fn multipart_failure(error: MultipartError) -> ApiError {
    ApiError::from_body_status(Surface::Upload, error.status(), error.body_text())
}
