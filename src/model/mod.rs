mod category;
mod recipe;

pub use category::{Category, Difficulty, LabelError};
pub use recipe::{fold_query, Ingredient, Recipe, FALLBACK_IMAGE_URL, QUICK_VIEW_INGREDIENTS};
