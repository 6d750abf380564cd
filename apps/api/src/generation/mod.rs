// Document Generation
// Implements: prompt templates, output schemas, the generation client and its route.
// All provider calls go through llm_client — no direct Gemini HTTP calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod schema;
