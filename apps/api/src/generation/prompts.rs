// Instruction templates for document generation: one per (document type, language).
// `{description}` is replaced verbatim with the caller's text. No escaping is applied.

use crate::models::document::{DocumentType, Language};

const DESCRIPTION_SLOT: &str = "{description}";

pub const RESUME_PROMPT_AR: &str = "أنت خبير في كتابة السير الذاتية الاحترافية. \
    بناءً على الوصف التالي، قم بإنشاء سيرة ذاتية متكاملة باللغة العربية. الوصف: {description}";

pub const INVOICE_PROMPT_AR: &str = "أنت خبير في إنشاء الفواتير التجارية. \
    بناءً على الوصف التالي، قم بإنشاء فاتورة احترافية باللغة العربية. الوصف: {description}";

pub const NEWSLETTER_PROMPT_AR: &str = "أنت كاتب محتوى محترف. \
    بناءً على الوصف التالي، قم بإنشاء نشرة إخبارية جذابة باللغة العربية. الوصف: {description}";

pub const REPORT_PROMPT_AR: &str = "أنت باحث أكاديمي محترف. \
    بناءً على الوصف التالي، قم بإنشاء تقرير أكاديمي باللغة العربية. الوصف: {description}";

pub const RESUME_PROMPT_EN: &str = "You are an expert in writing professional resumes. \
    Based on the following description, create a complete resume in English. \
    Description: {description}";

pub const INVOICE_PROMPT_EN: &str = "You are an expert in creating business invoices. \
    Based on the following description, create a professional invoice in English. \
    Description: {description}";

pub const NEWSLETTER_PROMPT_EN: &str = "You are a professional content writer. \
    Based on the following description, create an engaging newsletter in English. \
    Description: {description}";

pub const REPORT_PROMPT_EN: &str = "You are a professional academic researcher. \
    Based on the following description, create an academic report in English. \
    Description: {description}";

/// Returns the raw template for a document type and language.
pub fn template_for(document_type: DocumentType, language: Language) -> &'static str {
    match (language, document_type) {
        (Language::Arabic, DocumentType::Resume) => RESUME_PROMPT_AR,
        (Language::Arabic, DocumentType::Invoice) => INVOICE_PROMPT_AR,
        (Language::Arabic, DocumentType::Newsletter) => NEWSLETTER_PROMPT_AR,
        (Language::Arabic, DocumentType::Report) => REPORT_PROMPT_AR,
        (Language::English, DocumentType::Resume) => RESUME_PROMPT_EN,
        (Language::English, DocumentType::Invoice) => INVOICE_PROMPT_EN,
        (Language::English, DocumentType::Newsletter) => NEWSLETTER_PROMPT_EN,
        (Language::English, DocumentType::Report) => REPORT_PROMPT_EN,
    }
}

/// Builds the generation prompt by embedding `description` into the matching template.
pub fn build_prompt(document_type: DocumentType, description: &str, language: Language) -> String {
    // Single replacement: a description containing "{description}" must survive as-is.
    template_for(document_type, language).replacen(DESCRIPTION_SLOT, description, 1)
}
