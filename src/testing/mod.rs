//! Testing utilities and fixtures
//!
//! Test doubles for the external collaborators (generative model, identity
//! provider, document store) plus a few fixtures.

pub mod mocks;

pub use mocks::*;

use crate::recipe::Recipe;

/// A complete recipe for use in tests
pub fn sample_recipe() -> Recipe {
    Recipe {
        title: "Kip met rijst en broccoli".to_string(),
        preparation_time: "30 minuten".to_string(),
        steps: vec![
            "Kook de rijst volgens de verpakking.".to_string(),
            "Bak de kip goudbruin.".to_string(),
            "Stoom de broccoli en serveer alles samen.".to_string(),
        ],
    }
}

/// The structured output a model would return for [`sample_recipe`]
pub fn sample_output() -> serde_json::Value {
    serde_json::to_value(sample_recipe()).unwrap_or_default()
}
