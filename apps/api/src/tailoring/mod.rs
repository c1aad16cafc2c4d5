// Tailored PRD generation and the review workflow built on it.
// All model calls go through llm_client::TextGenerator.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod review;
