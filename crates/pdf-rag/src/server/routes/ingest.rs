//! PDF upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{Document, UploadResponse};

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// POST /pdf - Upload, store and index a PDF
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::BadRequest("File field has no filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(format!("Failed to read file: {}", e)))?;

        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload
        .ok_or_else(|| Error::BadRequest(format!("Missing multipart field '{}'", FILE_FIELD)))?;

    tracing::info!("Processing file: {} ({} bytes)", filename, data.len());
    let start = Instant::now();

    let document = Document::new(&filename, data.to_vec());
    let outcome = state.ingest().ingest(&document).await?;

    tracing::info!(
        "Ingested {} in {:.1}s",
        outcome.filename,
        start.elapsed().as_secs_f64()
    );

    Ok(Json(UploadResponse {
        status: "Successfully Uploaded".to_string(),
        filename: outcome.filename,
        doc_len: outcome.pages,
        chunks: outcome.chunks,
    }))
}
