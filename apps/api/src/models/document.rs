//! Document records produced by generation and consumed by the preview renderer.
//!
//! Field names on the wire are camelCase and must match the property names declared
//! in `generation::schema` exactly. The lockstep is pinned by tests in that module.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of document kinds the service can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Resume,
    Invoice,
    Newsletter,
    Report,
}

impl DocumentType {
    #[cfg(test)]
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Resume,
        DocumentType::Invoice,
        DocumentType::Newsletter,
        DocumentType::Report,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::Invoice => "invoice",
            DocumentType::Newsletter => "newsletter",
            DocumentType::Report => "report",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output language. Selects prompt wording and user-facing error text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    /// Arabic previews are laid out right-to-left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Arabic)
    }

    /// Picks the Arabic or English variant of a static message pair.
    pub fn pick(&self, arabic: &'static str, english: &'static str) -> &'static str {
        match self {
            Language::Arabic => arabic,
            Language::English => english,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "ar" => Some(Language::Arabic),
            "en" => Some(Language::English),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub position: String,
    pub company: String,
    pub period: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub period: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Invoice
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    pub date: String,
    pub seller: Seller,
    pub client: Client,
    pub items: Vec<InvoiceItem>,
    /// Grand total as formatted by the provider (may include separators).
    pub total: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Newsletter
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    pub title: String,
    pub date: String,
    pub main_news: Story,
    pub updates: Vec<String>,
    pub events: Story,
}

/// A titled block of prose (main story or event announcement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub title: String,
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub summary: String,
    pub introduction: String,
    pub findings: Vec<String>,
    pub recommendations: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Tagged union
// ────────────────────────────────────────────────────────────────────────────

/// A generated document. The tag always matches the `DocumentType` it was requested with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "document_type", content = "content", rename_all = "lowercase")]
pub enum DocumentRecord {
    Resume(Resume),
    Invoice(Invoice),
    Newsletter(Newsletter),
    Report(Report),
}

impl DocumentRecord {
    pub fn document_type(&self) -> DocumentType {
        match self {
            DocumentRecord::Resume(_) => DocumentType::Resume,
            DocumentRecord::Invoice(_) => DocumentType::Invoice,
            DocumentRecord::Newsletter(_) => DocumentType::Newsletter,
            DocumentRecord::Report(_) => DocumentType::Report,
        }
    }

    /// Deserializes an untagged provider payload as the variant for `document_type`.
    pub fn from_value(document_type: DocumentType, value: Value) -> serde_json::Result<Self> {
        Ok(match document_type {
            DocumentType::Resume => DocumentRecord::Resume(serde_json::from_value(value)?),
            DocumentType::Invoice => DocumentRecord::Invoice(serde_json::from_value(value)?),
            DocumentType::Newsletter => {
                DocumentRecord::Newsletter(serde_json::from_value(value)?)
            }
            DocumentType::Report => DocumentRecord::Report(serde_json::from_value(value)?),
        })
    }

    /// Serializes the record body without the tag, in the provider's shape.
    #[cfg(test)]
    pub fn content_value(&self) -> serde_json::Result<Value> {
        match self {
            DocumentRecord::Resume(r) => serde_json::to_value(r),
            DocumentRecord::Invoice(i) => serde_json::to_value(i),
            DocumentRecord::Newsletter(n) => serde_json::to_value(n),
            DocumentRecord::Report(r) => serde_json::to_value(r),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_serde_is_lowercase() {
        let json = serde_json::to_string(&DocumentType::Newsletter).unwrap();
        assert_eq!(json, r#""newsletter""#);
        let parsed: DocumentType = serde_json::from_str(r#""invoice""#).unwrap();
        assert_eq!(parsed, DocumentType::Invoice);
    }

    #[test]
    fn test_language_wire_codes() {
        assert_eq!(serde_json::to_string(&Language::Arabic).unwrap(), r#""ar""#);
        let en: Language = serde_json::from_str(r#""en""#).unwrap();
        assert_eq!(en, Language::English);
        assert_eq!(Language::from_code(" en "), Some(Language::English));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_language_default_is_arabic_rtl() {
        let lang = Language::default();
        assert_eq!(lang, Language::Arabic);
        assert!(lang.is_rtl());
        assert!(!Language::English.is_rtl());
    }

    #[test]
    fn test_record_tag_matches_variant() {
        for doc_type in DocumentType::ALL {
            assert_eq!(fixtures::record(doc_type).document_type(), doc_type);
        }
    }

    #[test]
    fn test_record_serializes_with_tag_and_camel_case_content() {
        let record = DocumentRecord::Invoice(fixtures::invoice());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["document_type"], "invoice");
        assert_eq!(value["content"]["invoiceNumber"], "INV-0042");
        assert_eq!(value["content"]["items"][0]["quantity"], 2.0);
    }

    #[test]
    fn test_from_value_uses_requested_variant() {
        let content = DocumentRecord::Report(fixtures::report())
            .content_value()
            .unwrap();
        let record = DocumentRecord::from_value(DocumentType::Report, content).unwrap();
        assert_eq!(record, DocumentRecord::Report(fixtures::report()));
    }

    #[test]
    fn test_from_value_rejects_payload_of_another_type() {
        let resume = DocumentRecord::Resume(fixtures::resume())
            .content_value()
            .unwrap();
        assert!(DocumentRecord::from_value(DocumentType::Newsletter, resume).is_err());
    }

    #[test]
    fn test_newsletter_main_news_is_camel_case() {
        let json = r#"{
            "title": "Digest",
            "date": "May",
            "mainNews": {"title": "Big", "content": "News"},
            "updates": [],
            "events": {"title": "Meetup", "content": "Friday"}
        }"#;
        let newsletter: Newsletter = serde_json::from_str(json).unwrap();
        assert_eq!(newsletter.main_news.title, "Big");
        assert!(newsletter.updates.is_empty());
    }
}
