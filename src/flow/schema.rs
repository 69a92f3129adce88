//! Output schema for the recipe flow

use serde_json::{json, Value};

use super::GenerationError;
use crate::recipe::Recipe;

pub const RECIPE_SCHEMA_NAME: &str = "recipe";

/// JSON schema requiring exactly the three recipe fields
pub fn recipe_output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "The title of the recipe."
            },
            "preparationTime": {
                "type": "string",
                "description": "The estimated preparation time."
            },
            "steps": {
                "type": "array",
                "items": { "type": "string" },
                "description": "The steps to prepare the recipe."
            }
        },
        "required": ["title", "preparationTime", "steps"],
        "additionalProperties": false
    })
}

/// Convert raw model output into a complete [`Recipe`]
pub fn parse_recipe_output(output: Value) -> Result<Recipe, GenerationError> {
    if output.is_null() {
        return Err(GenerationError::EmptyOutput);
    }

    let recipe: Recipe = serde_json::from_value(output)
        .map_err(|e| GenerationError::InvalidOutput(e.to_string()))?;

    if !recipe.is_complete() {
        return Err(GenerationError::InvalidOutput(
            "recipe has empty title, preparation time or steps".to_string(),
        ));
    }

    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = recipe_output_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required, vec!["title", "preparationTime", "steps"]);
    }

    #[test]
    fn test_parse_rejects_null_and_wrong_types() {
        assert!(matches!(
            parse_recipe_output(Value::Null),
            Err(GenerationError::EmptyOutput)
        ));
        assert!(matches!(
            parse_recipe_output(json!({
                "title": "Soep",
                "preparationTime": 20,
                "steps": ["Kook."]
            })),
            Err(GenerationError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_steps() {
        let result = parse_recipe_output(json!({
            "title": "Niets",
            "preparationTime": "0 minuten",
            "steps": []
        }));
        assert!(matches!(result, Err(GenerationError::InvalidOutput(_))));
    }

    #[test]
    fn test_parse_rejects_properties_outside_schema() {
        let result = parse_recipe_output(json!({
            "title": "Soep",
            "preparationTime": "20 minuten",
            "steps": ["Kook."],
            "calories": 300
        }));
        assert!(matches!(result, Err(GenerationError::InvalidOutput(ref msg)) if msg.contains("calories")));
        assert_eq!(recipe_output_schema()["additionalProperties"], false);
    }
}
