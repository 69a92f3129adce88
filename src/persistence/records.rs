//! Stored record layouts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recipe::{Recipe, SaveRecipeRequest};

pub const HISTORY_TIMESTAMP_FIELD: &str = "timestamp";
pub const FAVORITE_TIMESTAMP_FIELD: &str = "createdAt";

/// One generation event; the recipe is kept as serialized JSON text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub ingredients: String,
    pub recipe: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl HistoryRecord {
    pub fn new(ingredients: &str, recipe: &Recipe) -> serde_json::Result<Self> {
        Ok(Self {
            ingredients: ingredients.to_string(),
            recipe: serde_json::to_string(recipe)?,
            timestamp: None,
        })
    }
}

/// A user's saved recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&SaveRecipeRequest> for FavoriteRecord {
    fn from(request: &SaveRecipeRequest) -> Self {
        Self {
            recipe: request.recipe.clone(),
            ingredients: request.ingredients.clone(),
            created_at: None,
        }
    }
}
