//! Schema Registry — the structured-output contract handed to the content provider.
//!
//! Each document type has one static `FieldSchema` tree. It is declared independently
//! of the record structs in `models::document` and the two are kept in lockstep by the
//! tests at the bottom of this file: the schema goes to a non-deterministic generator,
//! the structs are what the rest of the service consumes.

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::models::document::DocumentType;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// A recursive description of an expected JSON shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSchema {
    String {
        description: Option<&'static str>,
    },
    Number {
        description: Option<&'static str>,
    },
    Array {
        description: Option<&'static str>,
        items: Box<FieldSchema>,
    },
    /// Property order is display order.
    Object {
        description: Option<&'static str>,
        properties: Vec<(&'static str, FieldSchema)>,
    },
}

/// A structural mismatch between a provider payload and the expected schema.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("at '{path}': expected {expected}, found {found}")]
pub struct SchemaViolation {
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl FieldSchema {
    /// Name of the node kind, as used in violation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldSchema::String { .. } => "string",
            FieldSchema::Number { .. } => "number",
            FieldSchema::Array { .. } => "array",
            FieldSchema::Object { .. } => "object",
        }
    }

    pub fn description(&self) -> Option<&'static str> {
        match self {
            FieldSchema::String { description }
            | FieldSchema::Number { description }
            | FieldSchema::Array { description, .. }
            | FieldSchema::Object { description, .. } => *description,
        }
    }

    /// Property names of an object node, in display order. Empty for other kinds.
    pub fn property_names(&self) -> Vec<&'static str> {
        match self {
            FieldSchema::Object { properties, .. } => {
                properties.iter().map(|(name, _)| *name).collect()
            }
            _ => vec![],
        }
    }

    /// Renders the tree in the provider's OpenAPI-subset schema format.
    ///
    /// Every object property is marked required so the provider returns complete records.
    pub fn to_provider_schema(&self) -> Value {
        let mut node = Map::new();
        let type_name = match self {
            FieldSchema::String { .. } => "STRING",
            FieldSchema::Number { .. } => "NUMBER",
            FieldSchema::Array { .. } => "ARRAY",
            FieldSchema::Object { .. } => "OBJECT",
        };
        node.insert("type".to_string(), json!(type_name));
        if let Some(description) = self.description() {
            node.insert("description".to_string(), json!(description));
        }

        match self {
            FieldSchema::Array { items, .. } => {
                node.insert("items".to_string(), items.to_provider_schema());
            }
            FieldSchema::Object { properties, .. } => {
                let mut props = Map::new();
                for (name, schema) in properties {
                    props.insert((*name).to_string(), schema.to_provider_schema());
                }
                let names = self.property_names();
                node.insert("properties".to_string(), Value::Object(props));
                node.insert("propertyOrdering".to_string(), json!(names));
                node.insert("required".to_string(), json!(names));
            }
            FieldSchema::String { .. } | FieldSchema::Number { .. } => {}
        }

        Value::Object(node)
    }

    /// Checks that `value` structurally conforms to this schema.
    ///
    /// Missing properties and kind mismatches are violations. Properties not declared
    /// by the schema are ignored.
    pub fn check(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.check_at(value, &mut String::new())
    }

    fn check_at(&self, value: &Value, path: &mut String) -> Result<(), SchemaViolation> {
        let violation = |path: &String, expected: &'static str, found: &'static str| {
            SchemaViolation {
                path: if path.is_empty() {
                    "/".to_string()
                } else {
                    path.clone()
                },
                expected,
                found,
            }
        };

        match (self, value) {
            (FieldSchema::String { .. }, Value::String(_)) => Ok(()),
            (FieldSchema::Number { .. }, Value::Number(_)) => Ok(()),
            (FieldSchema::Array { items, .. }, Value::Array(elements)) => {
                for (index, element) in elements.iter().enumerate() {
                    let len = path.len();
                    path.push_str(&format!("/{index}"));
                    items.check_at(element, path)?;
                    path.truncate(len);
                }
                Ok(())
            }
            (FieldSchema::Object { properties, .. }, Value::Object(fields)) => {
                for (name, schema) in properties {
                    let len = path.len();
                    path.push('/');
                    path.push_str(name);
                    match fields.get(*name) {
                        Some(field) => schema.check_at(field, path)?,
                        None => return Err(violation(&*path, schema.kind(), "nothing")),
                    }
                    path.truncate(len);
                }
                Ok(())
            }
            (_, other) => Err(violation(&*path, self.kind(), json_kind(other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

fn string() -> FieldSchema {
    FieldSchema::String { description: None }
}

fn string_d(description: &'static str) -> FieldSchema {
    FieldSchema::String {
        description: Some(description),
    }
}

fn number_d(description: &'static str) -> FieldSchema {
    FieldSchema::Number {
        description: Some(description),
    }
}

fn array_d(description: &'static str, items: FieldSchema) -> FieldSchema {
    FieldSchema::Array {
        description: Some(description),
        items: Box::new(items),
    }
}

fn object(properties: Vec<(&'static str, FieldSchema)>) -> FieldSchema {
    FieldSchema::Object {
        description: None,
        properties,
    }
}

fn object_d(description: &'static str, properties: Vec<(&'static str, FieldSchema)>) -> FieldSchema {
    FieldSchema::Object {
        description: Some(description),
        properties,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// Returns the structured-output schema for a document type.
pub fn schema_for(document_type: DocumentType) -> FieldSchema {
    match document_type {
        DocumentType::Resume => resume_schema(),
        DocumentType::Invoice => invoice_schema(),
        DocumentType::Newsletter => newsletter_schema(),
        DocumentType::Report => report_schema(),
    }
}

fn resume_schema() -> FieldSchema {
    object_d(
        "A professional resume or curriculum vitae.",
        vec![
            ("name", string_d("The person's full name.")),
            (
                "title",
                string_d("The person's professional title (e.g., 'Senior Software Engineer')."),
            ),
            ("email", string_d("Contact email address.")),
            ("phone", string_d("Contact phone number.")),
            ("linkedin", string_d("URL of the person's LinkedIn profile.")),
            ("summary", string_d("A 2-4 sentence professional summary.")),
            (
                "experience",
                array_d(
                    "A list of work experiences.",
                    object(vec![
                        ("position", string_d("The job title held.")),
                        ("company", string_d("The name of the company.")),
                        (
                            "period",
                            string_d("The dates of employment (e.g., '2020-Present')."),
                        ),
                        (
                            "achievements",
                            array_d("A list of key achievements for this role.", string()),
                        ),
                    ]),
                ),
            ),
            (
                "education",
                array_d(
                    "A list of educational qualifications.",
                    object(vec![
                        (
                            "degree",
                            string_d(
                                "The degree or qualification obtained (e.g., 'B.S. in Computer Science').",
                            ),
                        ),
                        ("institution", string_d("The name of the educational institution.")),
                        (
                            "period",
                            string_d("The dates of attendance (e.g., '2016-2020')."),
                        ),
                    ]),
                ),
            ),
            ("skills", array_d("A list of relevant skills.", string())),
        ],
    )
}

fn invoice_schema() -> FieldSchema {
    object_d(
        "A commercial invoice for goods or services.",
        vec![
            ("invoiceNumber", string_d("The unique invoice identifier.")),
            ("date", string_d("The date the invoice was issued.")),
            (
                "seller",
                object_d(
                    "Information about the seller.",
                    vec![
                        ("name", string()),
                        ("address", string()),
                        ("phone", string()),
                        ("email", string()),
                    ],
                ),
            ),
            (
                "client",
                object_d(
                    "Information about the client.",
                    vec![("name", string()), ("address", string()), ("phone", string())],
                ),
            ),
            (
                "items",
                array_d(
                    "A list of line items in the invoice.",
                    object(vec![
                        (
                            "description",
                            string_d("Description of the product or service."),
                        ),
                        ("quantity", number_d("The quantity of the item.")),
                        ("price", number_d("The price per unit of the item.")),
                        (
                            "total",
                            number_d("The total price for the line item (quantity * price)."),
                        ),
                    ]),
                ),
            ),
            ("total", string_d("The grand total amount of the invoice.")),
            (
                "currency",
                string_d("The currency of the amounts (e.g., 'USD', 'SAR')."),
            ),
        ],
    )
}

fn newsletter_schema() -> FieldSchema {
    object_d(
        "A company or organization newsletter.",
        vec![
            ("title", string_d("The main title of the newsletter.")),
            ("date", string_d("The publication date of the newsletter.")),
            (
                "mainNews",
                object_d(
                    "The main story or article.",
                    vec![
                        ("title", string_d("Title of the main story.")),
                        ("content", string_d("Full content of the main story.")),
                    ],
                ),
            ),
            (
                "updates",
                array_d("A list of brief updates or announcements.", string()),
            ),
            (
                "events",
                object_d(
                    "Information about an upcoming event.",
                    vec![
                        ("title", string_d("Title of the event.")),
                        (
                            "content",
                            string_d("Details about the event (date, location, description)."),
                        ),
                    ],
                ),
            ),
        ],
    )
}

fn report_schema() -> FieldSchema {
    object_d(
        "A formal or academic report.",
        vec![
            ("title", string_d("The main title of the report.")),
            ("subtitle", string_d("The subtitle of the report.")),
            ("author", string_d("The name of the author(s).")),
            ("date", string_d("The publication date of the report.")),
            ("summary", string_d("An executive summary of the report.")),
            ("introduction", string_d("The introduction section of the report.")),
            (
                "findings",
                array_d("A list of key findings or results.", string()),
            ),
            (
                "recommendations",
                string_d("The recommendations section of the report."),
            ),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
