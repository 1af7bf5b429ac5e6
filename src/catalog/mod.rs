//! The recipe catalog.
//!
//! The catalog is an ordered, append-only collection. Generated recipes
//! are prepended so the newest one is first in the unsorted order. Every
//! change produces a new `Catalog`; existing values (and any views built
//! from them) are never modified.

use crate::model::Recipe;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;

const SEED_RECIPES: &str = include_str!("seed.yaml");

/// Errors that can occur when building or growing the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Recipe id already exists in the catalog: {0}")]
    Conflict(String),

    #[error("Failed to parse seed recipes: {0}")]
    Seed(#[from] serde_yaml::Error),
}

/// Ordered collection of recipes with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Arc<[Arc<Recipe>]>,
}

impl Catalog {
    /// Builds the catalog from the curated seed recipes, in authored order.
    pub fn initialize() -> Result<Self, CatalogError> {
        let recipes: Vec<Recipe> = serde_yaml::from_str(SEED_RECIPES)?;
        debug!(count = recipes.len(), "loaded seed recipes");
        Self::from_recipes(recipes)
    }

    /// Builds a catalog from `recipes`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` for the first repeated id.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for recipe in &recipes {
            if !seen.insert(recipe.id.as_str()) {
                return Err(CatalogError::Conflict(recipe.id.clone()));
            }
        }
        Ok(Catalog {
            recipes: recipes.into_iter().map(Arc::new).collect(),
        })
    }

    /// Returns a new catalog with `recipe` in front of all existing ones.
    ///
    /// `self` is left as it was, whether or not the insert succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if the id is already taken.
    pub fn insert(&self, recipe: impl Into<Arc<Recipe>>) -> Result<Catalog, CatalogError> {
        let recipe = recipe.into();
        if self.contains(&recipe.id) {
            return Err(CatalogError::Conflict(recipe.id.clone()));
        }
        let recipes = std::iter::once(recipe)
            .chain(self.recipes.iter().cloned())
            .collect();
        Ok(Catalog { recipes })
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Recipe>> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Recipes in catalog order.
    pub fn recipes(&self) -> &[Arc<Recipe>] {
        &self.recipes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Recipe>> {
        self.recipes.iter()
    }
}

/// Hands out ids for generated recipes.
///
/// Ids are the current Unix time in milliseconds, bumped when needed so
/// each id is strictly greater than the previous one from this generator.
#[derive(Debug, Default)]
pub struct RecipeIdGenerator {
    last: u64,
}

impl RecipeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}
