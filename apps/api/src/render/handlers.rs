//! Axum route handlers for the Export API.

use axum::{
    extract::Multipart,
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::models::document::Language;
use crate::render::{export_to_pdf, RenderSurface, EXPORT_FILENAME};

/// POST /api/v1/documents/export
///
/// Multipart fields: `surface` (PNG/JPEG of the rendered preview, required) and
/// `language` (`ar`/`en`, optional; only affects error text). Unknown fields are ignored.
pub async fn handle_export(mut multipart: Multipart) -> Result<Response, AppError> {
    let mut surface: Option<Bytes> = None;
    let mut language = Language::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from_multipart(e, language))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("surface") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::from_multipart(e, language))?;
                surface = Some(bytes);
            }
            Some("language") => {
                let code = field
                    .text()
                    .await
                    .map_err(|e| AppError::from_multipart(e, language))?;
                language = Language::from_code(&code).ok_or_else(|| {
                    AppError::Validation(format!("Unsupported language '{}'", code.trim()))
                })?;
            }
            _ => {}
        }
    }

    let surface = surface.ok_or_else(|| {
        AppError::Validation(
            language
                .pick(
                    "لم يتم إرسال معاينة المستند.",
                    "The document preview was not provided.",
                )
                .to_string(),
        )
    })?;

    info!("Export requested ({} bytes)", surface.len());

    let pdf = tokio::task::spawn_blocking(move || {
        let surface = RenderSurface::decode(&surface)?;
        export_to_pdf(&surface)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("export task failed: {e}")))?
    .map_err(|e| AppError::from_export(e, language))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        pdf,
    )
        .into_response())
}
