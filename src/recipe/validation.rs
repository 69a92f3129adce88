//! Ingredient input validation
//!
//! The only gate before any external call; rejects input that is too short
//! to be worth a generation round trip.

use thiserror::Error;

use super::models::IngredientInput;
use crate::messages;

/// Minimum number of characters after trimming
pub const MIN_INGREDIENTS_LEN: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ingredients field is missing")]
    Missing,

    #[error("ingredients must be at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

impl ValidationError {
    /// Message suitable for display next to the form field
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Missing => messages::VALIDATION_FAILED,
            Self::TooShort { .. } => messages::INGREDIENTS_TOO_SHORT,
        }
    }
}

/// Validate raw ingredient text and return the trimmed value
pub fn validate_ingredients(raw: Option<&str>) -> Result<IngredientInput, ValidationError> {
    let raw = raw.ok_or(ValidationError::Missing)?;
    let trimmed = raw.trim();
    let actual = trimmed.chars().count();

    if actual < MIN_INGREDIENTS_LEN {
        return Err(ValidationError::TooShort {
            min: MIN_INGREDIENTS_LEN,
            actual,
        });
    }

    Ok(IngredientInput::new_unchecked(trimmed.to_string()))
}
