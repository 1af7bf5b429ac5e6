//! Previous/next resolution for the recipe detail view.

use crate::model::Recipe;
use std::sync::Arc;

/// The recipes either side of the selected one in the current view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub previous: Option<Arc<Recipe>>,
    pub next: Option<Arc<Recipe>>,
}

impl Neighbors {
    /// Navigation is disabled in both directions.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Finds the neighbors of `current_id` within `view`.
///
/// `view` must be the view as it is now, not the one the recipe was opened
/// from. If the recipe has been filtered out both sides are `None`.
pub fn resolve(view: &[Arc<Recipe>], current_id: &str) -> Neighbors {
    let Some(index) = view.iter().position(|r| r.id == current_id) else {
        return Neighbors::none();
    };
    Neighbors {
        previous: index.checked_sub(1).map(|i| Arc::clone(&view[i])),
        next: view.get(index + 1).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Difficulty};

    fn recipe(id: &str) -> Arc<Recipe> {
        Arc::new(Recipe {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            category: Category::Baking,
            difficulty: Difficulty::Easy,
            time_minutes: 5,
            ingredients: vec![],
            instructions: vec![],
            image_url: String::new(),
            is_generated: false,
        })
    }

    fn id(recipe: &Option<Arc<Recipe>>) -> Option<&str> {
        recipe.as_ref().map(|r| r.id.as_str())
    }

    #[test]
    fn test_boundaries() {
        let view = vec![recipe("a"), recipe("b"), recipe("c")];

        let first = resolve(&view, "a");
        assert_eq!(id(&first.previous), None);
        assert_eq!(id(&first.next), Some("b"));

        let middle = resolve(&view, "b");
        assert_eq!(id(&middle.previous), Some("a"));
        assert_eq!(id(&middle.next), Some("c"));

        let last = resolve(&view, "c");
        assert_eq!(id(&last.previous), Some("b"));
        assert_eq!(id(&last.next), None);
    }

    #[test]
    fn test_absent_id_disables_navigation() {
        let view = vec![recipe("a"), recipe("b"), recipe("c")];
        assert_eq!(resolve(&view, "z"), Neighbors::none());
    }

    #[test]
    fn test_single_and_empty_views() {
        assert_eq!(resolve(&[recipe("a")], "a"), Neighbors::none());
        assert_eq!(resolve(&[], "a"), Neighbors::none());
    }

    #[test]
    fn test_uses_current_view() {
        let opened_from = vec![recipe("a"), recipe("b")];
        assert_eq!(id(&resolve(&opened_from, "a").previous), None);

        // a new recipe was prepended after the detail view opened
        let now = vec![recipe("new"), recipe("a"), recipe("b")];
        assert_eq!(id(&resolve(&now, "a").previous), Some("new"));
    }
}
