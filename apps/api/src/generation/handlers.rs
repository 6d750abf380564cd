//! Axum route handlers for the Generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::generator::generate_document;
use crate::models::document::{DocumentRecord, DocumentType, Language};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    pub document_type: DocumentType,
    pub description: String,
    #[serde(default)]
    pub language: Language,
}

/// POST /api/v1/documents/generate
///
/// One provider call per request. Returns the tagged record:
/// `{"document_type": "...", "content": {...}}`.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentRecord>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let record = generate_document(
        &state.generator,
        request.document_type,
        &request.description,
        request.language,
    )
    .await
    .map_err(|e| AppError::from_document(e, request.language))?;

    Ok(Json(record))
}
