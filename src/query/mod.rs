//! The query engine: filter, search and sort over the catalog.
//!
//! Everything here is a pure function of its inputs. A view is a fresh
//! `Vec` of shared recipe handles; the catalog itself is never reordered.

use crate::catalog::Catalog;
use crate::favorites::Favorites;
use crate::model::{fold_query, Recipe};
use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::warn;

mod model;

pub use model::{Criteria, SortBy};

/// Locale used for title ordering unless configured otherwise.
pub const DEFAULT_COLLATION_LOCALE: &str = "he";

/// How titles are compared when sorting by title.
///
/// Wraps a locale; the ICU collator itself is built per sort because it
/// is not `Send`.
#[derive(Debug, Clone)]
pub struct TitleOrder {
    locale: Option<Locale>,
}

impl Default for TitleOrder {
    fn default() -> Self {
        TitleOrder::for_locale(DEFAULT_COLLATION_LOCALE)
    }
}

impl TitleOrder {
    /// Title order for a BCP-47 tag such as `"he"` or `"en-US"`.
    ///
    /// An unparsable tag falls back to case-folded code point order.
    pub fn for_locale(tag: &str) -> Self {
        match tag.parse::<Locale>() {
            Ok(locale) => TitleOrder {
                locale: Some(locale),
            },
            Err(e) => {
                warn!(tag, error = ?e, "invalid collation locale, using code point order");
                TitleOrder { locale: None }
            }
        }
    }

    fn collator(&self) -> Option<Collator> {
        let locale = self.locale.as_ref()?;
        match Collator::try_new(&locale.into(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                warn!(%locale, error = ?e, "no collation data, using code point order");
                None
            }
        }
    }
}

/// Computes the view for `criteria`, ordering titles by the default locale.
pub fn query(catalog: &Catalog, favorites: &Favorites, criteria: &Criteria) -> Vec<Arc<Recipe>> {
    query_with(catalog, favorites, criteria, &TitleOrder::default())
}

/// Computes the view for `criteria`.
///
/// Recipes that pass every filter are returned in catalog order and then
/// stably sorted, so ties keep their catalog order.
pub fn query_with(
    catalog: &Catalog,
    favorites: &Favorites,
    criteria: &Criteria,
    titles: &TitleOrder,
) -> Vec<Arc<Recipe>> {
    let folded = fold_query(&criteria.search);
    let mut view: Vec<Arc<Recipe>> = catalog
        .iter()
        .filter(|r| criteria.admits(r, favorites, &folded))
        .cloned()
        .collect();
    sort_view(&mut view, criteria.sort_by, titles);
    view
}

fn sort_view(view: &mut [Arc<Recipe>], sort_by: SortBy, titles: &TitleOrder) {
    match sort_by {
        SortBy::Title => match titles.collator() {
            Some(collator) => view.sort_by(|a, b| collator.compare(&a.title, &b.title)),
            None => view.sort_by(|a, b| fallback_title_cmp(&a.title, &b.title)),
        },
        SortBy::Time => view.sort_by_key(|r| r.time_minutes),
        SortBy::Difficulty => view.sort_by_key(|r| r.difficulty.rank()),
    }
}

fn fallback_title_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
