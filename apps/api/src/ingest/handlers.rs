use axum::extract::{Multipart, State};
use axum::Json;

use crate::errors::AppError;
use crate::ingest::{ingest_document, IngestResponse};
use crate::state::AppState;

/// POST /api/v1/documents
///
/// Multipart upload with a single `file` field containing a PDF.
pub async fn handle_upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::Validation(format!(
                "only PDF uploads are supported, got '{filename}'"
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".into()));
        }

        let response = ingest_document(&state, &filename, data).await?;
        return Ok(Json(response));
    }

    Err(AppError::Validation(
        "multipart field 'file' is required".into(),
    ))
}
