use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of recipe ids the user has hearted.
///
/// Ids are not checked against the catalog: a favorite may name a recipe
/// that is not (or no longer) present, which is harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: BTreeSet<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new set with `id` removed if present, added otherwise.
    pub fn toggle(&self, id: &str) -> Favorites {
        let mut ids = self.ids.clone();
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
        Favorites { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Favorites {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Favorites {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
