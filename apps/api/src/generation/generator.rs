//! Document Generation — turns a validated request into a typed `DocumentRecord`.
//!
//! Flow: build_prompt + schema_for → provider (one call) → strip fences → parse JSON →
//!       schema check → deserialize into the requested variant.
//!
//! No retry, no caching. A second request while one is in flight is simply another
//! independent call; deciding whether a late result is still wanted is the caller's job.

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::prompts::build_prompt;
use crate::generation::schema::{schema_for, SchemaViolation};
use crate::llm_client::{strip_json_fences, LlmError, ProviderHandle};
use crate::models::document::{DocumentRecord, DocumentType, Language};

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// Rejections raised before the generation core runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("description is empty")]
    EmptyDescription,
}

impl ValidationError {
    pub fn user_message(&self, language: Language) -> &'static str {
        match self {
            ValidationError::EmptyDescription => language.pick(
                "يرجى إدخال وصف للمستند المطلوب.",
                "Please enter a description of the document.",
            ),
        }
    }
}

/// An immutable, validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    document_type: DocumentType,
    description: String,
    language: Language,
}

impl GenerationRequest {
    /// Builds a request. Descriptions that are blank after trimming are rejected.
    ///
    /// The description itself is kept verbatim; it is embedded into the prompt as-is.
    pub fn new(
        document_type: DocumentType,
        description: impl Into<String>,
        language: Language,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(Self {
            document_type,
            description,
            language,
        })
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Failures of the generation path. `Display` is the internal description for logs;
/// `user_message` is what the caller shows.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("content provider is not configured")]
    ProviderUnavailable,

    #[error("content provider failed: {0}")]
    ProviderError(String),

    #[error("provider response is not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("provider response does not match the {document_type} schema: {violation}")]
    SchemaMismatch {
        document_type: DocumentType,
        violation: String,
    },
}

impl GenerationError {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            GenerationError::ProviderError(_) => "PROVIDER_ERROR",
            GenerationError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            GenerationError::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
        }
    }

    pub fn user_message(&self, language: Language) -> &'static str {
        match self {
            GenerationError::ProviderUnavailable => language.pick(
                "لم يتم تكوين مفتاح Gemini API. يرجى التأكد من إعداده في متغيرات البيئة الخاصة بالنشر.",
                "Gemini API key is not configured. Please ensure it is set in the deployment environment variables.",
            ),
            _ => language.pick(
                "فشل في توليد المحتوى. يرجى المحاولة مرة أخرى.",
                "Failed to generate content. Please try again.",
            ),
        }
    }

    fn schema_mismatch(document_type: DocumentType, violation: impl ToString) -> Self {
        GenerationError::SchemaMismatch {
            document_type,
            violation: violation.to_string(),
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => {
                GenerationError::MalformedResponse("provider returned no text".to_string())
            }
            other => GenerationError::ProviderError(other.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// The generation client. Cheap to clone; holds only the provider handle.
#[derive(Debug, Clone)]
pub struct DocumentGenerator {
    provider: ProviderHandle,
}

impl DocumentGenerator {
    pub fn new(provider: ProviderHandle) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Generates a document for `request`. Exactly one provider call when configured,
    /// none otherwise.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<DocumentRecord, GenerationError> {
        let document_type = request.document_type();

        let provider = match &self.provider {
            ProviderHandle::Configured(provider) => provider,
            ProviderHandle::Unconfigured => {
                warn!("Generation requested but no provider credential is configured");
                return Err(GenerationError::ProviderUnavailable);
            }
        };

        let prompt = build_prompt(document_type, request.description(), request.language());
        let schema = schema_for(document_type);

        info!(
            "Generating {} (language={}, rtl={})",
            document_type,
            request.language().code(),
            request.language().is_rtl()
        );
        let text = provider
            .generate_structured(&prompt, &schema.to_provider_schema())
            .await?;

        let value: Value = serde_json::from_str(strip_json_fences(&text))
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        schema
            .check(&value)
            .map_err(|v: SchemaViolation| GenerationError::schema_mismatch(document_type, v))?;

        let record = DocumentRecord::from_value(document_type, value)
            .map_err(|e| GenerationError::schema_mismatch(document_type, e))?;

        info!("Generated {} document", record.document_type());
        Ok(record)
    }
}

/// Caller-facing entry point: validates primitive inputs and runs one generation.
///
/// Validation failures never reach the provider.
pub async fn generate_document(
    generator: &DocumentGenerator,
    document_type: DocumentType,
    description: &str,
    language: Language,
) -> Result<DocumentRecord, DocumentError> {
    let request = GenerationRequest::new(document_type, description, language)?;
    Ok(generator.generate(&request).await?)
}

/// Either side of `generate_document`'s failure surface.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl DocumentError {
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::Validation(_) => "VALIDATION_ERROR",
            DocumentError::Generation(e) => e.code(),
        }
    }

    pub fn user_message(&self, language: Language) -> &'static str {
        match self {
            DocumentError::Validation(e) => e.user_message(language),
            DocumentError::Generation(e) => e.user_message(language),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
