use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::generator::{DocumentError, GenerationError};
use crate::models::document::Language;
use crate::render::ExportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Client-visible messages are already localized; the internal cause is only logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large")]
    PayloadTooLarge(Language),

    #[error("Generation error: {source}")]
    Generation {
        source: GenerationError,
        language: Language,
    },

    #[error("Export error: {source}")]
    Export {
        source: ExportError,
        language: Language,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps a `generate_document` failure, localizing its message for `language`.
    pub fn from_document(err: DocumentError, language: Language) -> Self {
        match err {
            DocumentError::Generation(source) => AppError::Generation { source, language },
            rejected => {
                tracing::warn!("Document request rejected ({})", rejected.code());
                AppError::Validation(rejected.user_message(language).to_string())
            }
        }
    }

    pub fn from_export(source: ExportError, language: Language) -> Self {
        AppError::Export { source, language }
    }

    /// Maps a multipart read failure. An exceeded body limit becomes a 413.
    pub fn from_multipart(err: MultipartError, language: Language) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(language)
        } else {
            AppError::Validation(err.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(language) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                language
                    .pick(
                        "معاينة المستند المرفوعة كبيرة جدًا.",
                        "The uploaded document preview is too large.",
                    )
                    .to_string(),
            ),
            AppError::Generation { source, language } => {
                let status = match source {
                    GenerationError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                    GenerationError::ProviderError(_)
                    | GenerationError::MalformedResponse(_)
                    | GenerationError::SchemaMismatch { .. } => StatusCode::BAD_GATEWAY,
                };
                if status == StatusCode::SERVICE_UNAVAILABLE {
                    tracing::warn!("Generation error: {source}");
                } else {
                    tracing::error!("Generation error: {source}");
                }
                (status, source.code(), source.user_message(*language).to_string())
            }
            AppError::Export { source, language } => {
                let status = match source {
                    ExportError::Rasterization(_) | ExportError::TooManyPages { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    ExportError::PdfWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                tracing::error!("Export error: {source}");
                (status, source.code(), source.user_message(*language).to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
