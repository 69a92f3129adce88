//! Recipe data model and ingredient validation

pub mod models;
pub mod validation;

pub use models::{FavoriteRecipe, IngredientInput, Recipe, SaveRecipeRequest};
pub use validation::{validate_ingredients, ValidationError, MIN_INGREDIENTS_LEN};
