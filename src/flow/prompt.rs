//! Prompt template for recipe generation

use tera::{Context, Tera};

use super::GenerationError;
use crate::recipe::IngredientInput;

const TEMPLATE_NAME: &str = "generate_recipe";

const RECIPE_TEMPLATE: &str = "Ik heb deze ingrediënten: {{ ingredients }}. \
Maak een kort, leuk recept met titel, bereidingstijd en stappen.";

/// Fixed instruction template with a single `ingredients` parameter
pub struct RecipePrompt {
    tera: Tera,
}

impl RecipePrompt {
    pub fn new() -> Result<Self, GenerationError> {
        let mut tera = Tera::default();
        // Ingredients are substituted verbatim
        tera.autoescape_on(vec![]);
        tera.add_raw_template(TEMPLATE_NAME, RECIPE_TEMPLATE)
            .map_err(|e| GenerationError::Template(format!("Invalid Tera template: {e}")))?;

        Ok(Self { tera })
    }

    pub fn render(&self, input: &IngredientInput) -> Result<String, GenerationError> {
        let mut context = Context::new();
        context.insert("ingredients", input.as_str());

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| GenerationError::Template(format!("Template rendering failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::validate_ingredients;

    #[test]
    fn test_render_substitutes_verbatim() {
        let prompt = RecipePrompt::new().unwrap();
        let input = validate_ingredients(Some("kip & <rijst>, \"broccoli\"")).unwrap();

        let rendered = prompt.render(&input).unwrap();
        assert_eq!(
            rendered,
            "Ik heb deze ingrediënten: kip & <rijst>, \"broccoli\". \
Maak een kort, leuk recept met titel, bereidingstijd en stappen."
        );
    }

    #[test]
    fn test_render_does_not_evaluate_template_syntax_in_input() {
        let prompt = RecipePrompt::new().unwrap();
        let input = validate_ingredients(Some("{{ ingredients }}")).unwrap();

        let rendered = prompt.render(&input).unwrap();
        assert!(rendered.contains("{{ ingredients }}"));
    }
}
