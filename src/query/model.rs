use crate::favorites::Favorites;
use crate::model::{Category, Difficulty, Recipe};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order of the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Locale-aware alphabetical order of titles.
    #[default]
    Title,
    /// Shortest preparation time first.
    Time,
    /// Easy, then Medium, then Challenging.
    Difficulty,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortBy::Title),
            "time" => Ok(SortBy::Time),
            "difficulty" => Ok(SortBy::Difficulty),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Filter, search and sort settings for one browsing session.
///
/// `None` for a filter means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    /// Raw search box text; trimmed and case-folded when matching.
    pub search: String,
    pub favorites_only: bool,
    pub sort_by: SortBy,
}

impl Criteria {
    /// True when nothing differs from the defaults.
    pub fn is_default(&self) -> bool {
        *self == Criteria::default()
    }

    /// True when any filter can hide a recipe. Sorting does not count.
    pub fn has_active_filters(&self) -> bool {
        self.category.is_some()
            || self.difficulty.is_some()
            || self.favorites_only
            || !self.search.trim().is_empty()
    }

    /// Returns true if `recipe` passes every filter.
    ///
    /// `folded_query` is [`crate::fold_query`] applied to `self.search`,
    /// computed once per query rather than once per recipe.
    pub(crate) fn admits(&self, recipe: &Recipe, favorites: &Favorites, folded_query: &str) -> bool {
        self.category.map_or(true, |c| recipe.category == c)
            && self.difficulty.map_or(true, |d| recipe.difficulty == d)
            && (!self.favorites_only || favorites.contains(&recipe.id))
            && recipe.matches_search(folded_query)
    }
}
