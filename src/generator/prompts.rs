//! Prompt text and the response schema sent to the generation service.

use super::GeneratedRecipe;
use crate::model::{Category, Difficulty};
use serde_json::{json, Value};

/// Fixes tone, audience and language for every recipe request.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a fun and encouraging cooking assistant for kids called \"Little Chef\".
Create a recipe based on the user's request.
The recipe should be safe for kids (with adult supervision mentioned if needed).
Language: Hebrew.
Keep descriptions exciting and simple.";

/// Aspect ratio requested for recipe pictures.
pub const IMAGE_ASPECT_RATIO: &str = "4:3";

/// User prompt for a recipe request.
pub fn recipe_prompt(prompt: &str, category: Category) -> String {
    format!("Create a {} recipe for: {}", category.label(), prompt.trim())
}

/// Visual description used to illustrate a generated recipe.
pub fn image_prompt(recipe: &GeneratedRecipe) -> String {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|i| i.item.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "A professional, high-quality, vibrant food photography shot of a dish called \"{}\".\n\
         Description: {}.\n\
         Key ingredients to visualize: {}.\n\
         Style: Bright, colorful, appetizing, overhead or 45-degree angle, shallow depth of field, \
         suitable for a children's cooking app.\n\
         The image must strictly represent the food described.",
        recipe.title, recipe.description, ingredients
    )
}

/// Structured-output schema for a recipe, with the category pinned to the
/// requested value.
pub fn recipe_schema(category: Category) -> Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.label()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "Fun title of the recipe in Hebrew" },
            "description": { "type": "STRING", "description": "Short, appetizing description in Hebrew" },
            "category": { "type": "STRING", "enum": [category.label()] },
            "difficulty": { "type": "STRING", "enum": difficulties },
            "timeMinutes": { "type": "INTEGER" },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "amount": { "type": "STRING" }
                    },
                    "required": ["item", "amount"]
                }
            },
            "instructions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Step by step instructions"
            }
        },
        "required": [
            "title", "description", "category", "difficulty",
            "timeMinutes", "ingredients", "instructions"
        ]
    })
}
