//! Generative model abstraction

use async_trait::async_trait;
use serde_json::Value;

use super::GenerationError;

/// A single structured generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fully rendered prompt text
    pub prompt: String,
    /// Name the provider should give the structured answer
    pub schema_name: &'static str,
    /// JSON schema the answer must follow
    pub output_schema: Value,
}

/// Trait for text-generation providers constrained by an output schema
///
/// Implementations return `Ok(None)` when the provider answered without any
/// structured output. Schema conformance is checked by the caller.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Submit the request once and return the structured output, if any
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<Value>, GenerationError>;
}
