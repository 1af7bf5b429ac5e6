use super::category::{Category, Difficulty};
use serde::{Deserialize, Serialize};

/// Image shown whenever a recipe picture fails to load on the client.
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1495195129352-aec325a55b65?auto=format&fit=crop&q=80&w=800";

/// Number of ingredients shown on a card's quick view before "and N more".
pub const QUICK_VIEW_INGREDIENTS: usize = 5;

/// A single ingredient line. `amount` is free text ("2 כוסות", "a pinch").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: String,
    pub amount: String,
}

impl Ingredient {
    pub fn new(item: impl Into<String>, amount: impl Into<String>) -> Self {
        Ingredient {
            item: item.into(),
            amount: amount.into(),
        }
    }
}

/// A recipe record as shown in the catalog.
///
/// Records are never edited in place. The catalog only hands out shared
/// references, and a change to the collection replaces it wholesale.
///
/// # Examples
///
/// ```
/// use little_chef::{Category, Difficulty, Ingredient, Recipe};
///
/// let recipe = Recipe {
///     id: "1".to_string(),
///     title: "עוגיות שוקולד".to_string(),
///     description: "עוגיות רכות ומתוקות".to_string(),
///     category: Category::Baking,
///     difficulty: Difficulty::Easy,
///     time_minutes: 25,
///     ingredients: vec![Ingredient::new("קמח", "2 כוסות")],
///     instructions: vec!["מערבבים".to_string()],
///     image_url: "https://example.com/cookies.jpg".to_string(),
///     is_generated: false,
/// };
/// assert!(recipe.matches_search("שוקולד"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub time_minutes: u32,
    /// Display order is preserved.
    pub ingredients: Vec<Ingredient>,
    /// Step N depends on step N-1, so order is preserved.
    pub instructions: Vec<String>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_generated: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Recipe {
    /// Returns true if `folded_query` occurs in the title, the description
    /// or any ingredient name, comparing case-folded text.
    ///
    /// The query is expected to be trimmed and folded already (see
    /// [`fold_query`]); an empty query matches everything.
    pub fn matches_search(&self, folded_query: &str) -> bool {
        if folded_query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(folded_query)
            || self.description.to_lowercase().contains(folded_query)
            || self
                .ingredients
                .iter()
                .any(|ing| ing.item.to_lowercase().contains(folded_query))
    }

    /// First [`QUICK_VIEW_INGREDIENTS`] ingredients and how many were left out.
    pub fn ingredient_preview(&self) -> (&[Ingredient], usize) {
        let shown = self.ingredients.len().min(QUICK_VIEW_INGREDIENTS);
        (&self.ingredients[..shown], self.ingredients.len() - shown)
    }

    /// Image to render: the recipe's own picture, or the shared fallback
    /// once loading it has failed.
    pub fn display_image(&self, load_failed: bool) -> &str {
        if load_failed || self.image_url.is_empty() {
            FALLBACK_IMAGE_URL
        } else {
            &self.image_url
        }
    }

    /// Text handed to the platform share sheet (or copied to the clipboard).
    pub fn share_text(&self) -> String {
        format!(
            "תראו איזה מתכון מגניב מצאתי בשף קטן: {}\n\n{}",
            self.title, self.description
        )
    }
}

/// Trims and case-folds a raw search box value.
pub fn fold_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}
