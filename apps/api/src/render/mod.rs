// PDF Export: decode the rasterized preview, paginate it, write the PDF.
// Pixel work is CPU-bound; handlers run it inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod pdf;
pub mod surface;

use thiserror::Error;

use crate::models::document::Language;

pub use pdf::{export_to_pdf, EXPORT_FILENAME};
pub use surface::RenderSurface;

/// Failures of the export path. Generation state is never affected by these.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not read rendered surface: {0}")]
    Rasterization(String),

    #[error("could not write PDF: {0}")]
    PdfWrite(String),

    #[error("surface needs {pages} pages, limit is {limit}")]
    TooManyPages { pages: usize, limit: usize },
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        "EXPORT_FAILURE"
    }

    pub fn user_message(&self, language: Language) -> &'static str {
        language.pick(
            "تعذر إنشاء ملف PDF. يرجى المحاولة مرة أخرى.",
            "Could not create the PDF file. Please try again.",
        )
    }
}
