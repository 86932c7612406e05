//! Evaluation document management endpoints

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

/// Response body for GET /documents
#[derive(Debug, Serialize)]
pub struct DocumentList {
    pub documents: Vec<String>,
}

/// Response body for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploaded: Vec<String>,
}

/// List evaluation documents
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<DocumentList>, ApiError> {
    let keys = state
        .document_store
        .list(&state.documents_prefix)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to list documents");
            ApiError::from(e)
        })?;

    // strip the prefix so clients see plain filenames
    let documents = keys
        .into_iter()
        .map(|key| {
            key.strip_prefix(&state.documents_prefix)
                .map(String::from)
                .unwrap_or(key)
        })
        .collect();

    Ok(Json(DocumentList { documents }))
}

/// Upload evaluation documents, overwriting by filename
pub async fn upload_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(String::from) else {
            continue;
        };

        if file_name.is_empty() {
            return Err(ApiError::bad_request("file name must not be empty"));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        let key = format!("{}{}", state.documents_prefix, file_name);

        state.document_store.upload(&key, data).await.map_err(|e| {
            error!(key, error = %e, "upload failed");
            ApiError::from(e)
        })?;

        info!(key, "document uploaded");
        uploaded.push(file_name);
    }

    if uploaded.is_empty() {
        return Err(ApiError::bad_request("no files in upload"));
    }

    Ok((StatusCode::CREATED, Json(UploadResponse { uploaded })))
}

/// Delete one evaluation document
pub async fn delete_document(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let key = format!("{}{}", state.documents_prefix, name);

    state.document_store.delete(&key).await.map_err(|e| {
        error!(key, error = %e, "delete failed");
        ApiError::from(e)
    })?;

    info!(key, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}
