//! Recipe generation flow
//!
//! Wraps a generative model behind a fixed prompt template and a typed
//! input/output contract. Every failure, whether transport, provider or a
//! malformed answer, comes back as a [`GenerationError`] so callers never
//! deal with a provider's own error taxonomy.

pub mod anthropic;
pub mod model;
pub mod prompt;
pub mod schema;

pub use anthropic::AnthropicModel;
pub use model::{GenerationRequest, GenerativeModel};
pub use prompt::RecipePrompt;
pub use schema::{parse_recipe_output, recipe_output_schema};

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::recipe::{IngredientInput, Recipe};

#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("model returned empty output")]
    EmptyOutput,

    #[error("model output does not match the recipe schema: {0}")]
    InvalidOutput(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("model is not configured: {0}")]
    NotConfigured(String),

    #[error("prompt rendering failed: {0}")]
    Template(String),
}

/// Turns validated ingredients into a [`Recipe`] with one model call
///
/// There is no retry: a failed call is reported once and it is up to the user
/// to resubmit. Repeated calls with the same input may yield different
/// recipes.
#[derive(Clone)]
pub struct RecipeFlow {
    model: Arc<dyn GenerativeModel>,
    prompt: Arc<RecipePrompt>,
}

impl RecipeFlow {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Result<Self, GenerationError> {
        Ok(Self {
            model,
            prompt: Arc::new(RecipePrompt::new()?),
        })
    }

    /// Generate a recipe for the given ingredients
    pub async fn invoke(&self, input: &IngredientInput) -> Result<Recipe, GenerationError> {
        let request = GenerationRequest {
            prompt: self.prompt.render(input)?,
            schema_name: schema::RECIPE_SCHEMA_NAME,
            output_schema: recipe_output_schema(),
        };

        debug!(
            model = self.model.name(),
            prompt_len = request.prompt.len(),
            "Invoking recipe flow"
        );

        let output = self
            .model
            .generate(&request)
            .await?
            .ok_or(GenerationError::EmptyOutput)?;

        parse_recipe_output(output)
    }
}
