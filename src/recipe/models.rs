//! Recipe value types shared by the flow, persistence and HTTP layers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated ingredient text
///
/// Only [`validate_ingredients`](super::validate_ingredients) constructs this,
/// so holding one means the minimum-length contract was checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IngredientInput(String);

impl IngredientInput {
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for IngredientInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generated recipe
///
/// Either all three fields are present or the generation failed; there is no
/// partially populated recipe. Unknown fields are rejected, matching the
/// `additionalProperties: false` of the model output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Recipe {
    pub title: String,
    pub preparation_time: String,
    pub steps: Vec<String>,
}

impl Recipe {
    /// Check that every field carries content
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.preparation_time.trim().is_empty()
            && !self.steps.is_empty()
            && self.steps.iter().all(|step| !step.trim().is_empty())
    }
}

/// A recipe together with the ingredients it was generated from
///
/// This is the value handed to the save entry point; it is built once at the
/// call site instead of merging loose maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecipeRequest {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: String,
}

impl SaveRecipeRequest {
    pub fn new(recipe: Recipe, ingredients: impl Into<String>) -> Self {
        Self {
            recipe,
            ingredients: ingredients.into(),
        }
    }
}

/// A favorite as read back from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecipe {
    pub id: String,
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: String,
    pub created_at: DateTime<Utc>,
}
