//! Response envelopes returned to the presentation layer

use serde::{Deserialize, Serialize};

use crate::recipe::{FavoriteRecipe, Recipe};

/// Outcome of a generation request; exactly one of `data`/`error` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRecipeResponse {
    pub data: Option<Recipe>,
    pub error: Option<String>,
}

impl GenerateRecipeResponse {
    pub fn success(recipe: Recipe) -> Self {
        Self {
            data: Some(recipe),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Outcome of a favorite save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecipeResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl SaveRecipeResponse {
    pub fn saved() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Outcome of a favorites listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub data: Option<Vec<FavoriteRecipe>>,
    pub error: Option<String>,
}

impl FavoritesResponse {
    pub fn success(favorites: Vec<FavoriteRecipe>) -> Self {
        Self {
            data: Some(favorites),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}
