//! The recipe book: the single owner of app state.
//!
//! Front ends drive a [`RecipeBook`] through its methods and re-read the
//! view, selection and generating flag after each call. The view is never
//! cached; it is recomputed from the catalog, favorites and criteria
//! whenever it is asked for.

use crate::catalog::{Catalog, CatalogError, RecipeIdGenerator};
use crate::config::Config;
use crate::favorites::{Favorites, FavoritesStore};
use crate::generator::{
    Draft, GeminiGenerator, GeneratingFlag, Generation, GenerationError, RecipeGenerator,
};
use crate::model::{Category, Recipe};
use crate::navigation::{self, Neighbors};
use crate::query::{query_with, Criteria, TitleOrder};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct RecipeBook {
    catalog: Catalog,
    favorites: Favorites,
    store: FavoritesStore,
    criteria: Criteria,
    selected: Option<String>,
    ids: RecipeIdGenerator,
    generating: GeneratingFlag,
    generator: Option<Arc<dyn RecipeGenerator>>,
    titles: TitleOrder,
}

impl RecipeBook {
    /// Opens the book with the seed catalog and the favorites saved in
    /// `store`. No generation service is attached.
    pub fn new(store: FavoritesStore) -> Result<Self, CatalogError> {
        let catalog = Catalog::initialize()?;
        let favorites = store.load();
        Ok(RecipeBook {
            catalog,
            favorites,
            store,
            criteria: Criteria::default(),
            selected: None,
            ids: RecipeIdGenerator::new(),
            generating: GeneratingFlag::new(),
            generator: None,
            titles: TitleOrder::default(),
        })
    }

    /// Opens the book described by `config`.
    ///
    /// Without an API key the book still browses; only generation is
    /// unavailable.
    pub fn open(config: &Config) -> Result<Self, CatalogError> {
        let book = RecipeBook::new(FavoritesStore::new(&config.data_dir))?
            .with_title_order(TitleOrder::for_locale(&config.collation_locale));
        match GeminiGenerator::from_config(&config.gemini) {
            Ok(generator) => Ok(book.with_generator(Arc::new(generator))),
            Err(e) => {
                warn!(error = %e, "recipe generation disabled");
                Ok(book)
            }
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn RecipeGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_title_order(mut self, titles: TitleOrder) -> Self {
        self.titles = titles;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ------------------------------------------------------------------
    // Browsing
    // ------------------------------------------------------------------

    /// The recipes to show for the current criteria, in display order.
    pub fn view(&self) -> Vec<Arc<Recipe>> {
        query_with(&self.catalog, &self.favorites, &self.criteria, &self.titles)
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: Criteria) {
        debug!(?criteria, "criteria changed");
        self.criteria = criteria;
    }

    /// Back to all categories, all difficulties, no search, sorted by title.
    pub fn reset_criteria(&mut self) {
        self.criteria = Criteria::default();
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Flips the favorite state of `id` and saves the set.
    ///
    /// A failed save is logged; the in-memory set keeps the new state.
    /// Returns whether `id` is now a favorite.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        self.favorites = self.favorites.toggle(id);
        if let Err(e) = self.store.persist(&self.favorites) {
            error!(error = %e, "failed to save favorites");
        }
        self.favorites.contains(id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    /// Favorited ids with no recipe in the catalog.
    pub fn dangling_favorites(&self) -> Vec<String> {
        self.favorites
            .iter()
            .filter(|id| !self.catalog.contains(id))
            .map(str::to_owned)
            .collect()
    }

    // ------------------------------------------------------------------
    // Selection and navigation
    // ------------------------------------------------------------------

    /// Opens the recipe with `id`. Unknown ids leave the selection alone.
    pub fn select(&mut self, id: &str) -> Option<Arc<Recipe>> {
        let recipe = self.catalog.get(id).cloned()?;
        self.selected = Some(recipe.id.clone());
        Some(recipe)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<Arc<Recipe>> {
        self.selected
            .as_deref()
            .and_then(|id| self.catalog.get(id))
            .cloned()
    }

    /// Neighbors of the selected recipe in the view as it is now.
    pub fn neighbors(&self) -> Neighbors {
        match &self.selected {
            Some(id) => navigation::resolve(&self.view(), id),
            None => Neighbors::none(),
        }
    }

    /// Moves the selection to the next recipe in the view, if there is one.
    pub fn go_next(&mut self) -> Option<Arc<Recipe>> {
        let next = self.neighbors().next?;
        self.selected = Some(next.id.clone());
        Some(next)
    }

    /// Moves the selection to the previous recipe in the view, if there is one.
    pub fn go_previous(&mut self) -> Option<Arc<Recipe>> {
        let previous = self.neighbors().previous?;
        self.selected = Some(previous.id.clone());
        Some(previous)
    }

    // ------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------

    pub fn is_generating(&self) -> bool {
        self.generating.is_set()
    }

    /// Claims the generating flag for a new recipe.
    ///
    /// The returned [`Generation`] owns everything it needs, so the book
    /// does not have to stay borrowed while it runs.
    pub fn start_generation(
        &self,
        prompt: &str,
        category: Category,
    ) -> Result<Generation, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        let generator = self
            .generator
            .clone()
            .ok_or(GenerationError::NotConfigured)?;
        Generation::start(generator, &self.generating, prompt, category)
    }

    /// Gives the draft an id, puts it first in the catalog and selects it.
    pub fn finish_generation(&mut self, draft: Draft) -> Result<Arc<Recipe>, GenerationError> {
        let mut id = self.ids.next_id();
        while self.catalog.contains(&id) {
            id = self.ids.next_id();
        }
        let recipe = Arc::new(draft.into_recipe(id));
        self.catalog = self.catalog.insert(Arc::clone(&recipe))?;
        self.selected = Some(recipe.id.clone());
        info!(id = %recipe.id, title = %recipe.title, "added generated recipe");
        Ok(recipe)
    }

    /// Generates a recipe, adds it to the catalog and selects it.
    ///
    /// On failure the catalog and selection are unchanged.
    pub async fn generate(
        &mut self,
        prompt: &str,
        category: Category,
    ) -> Result<Arc<Recipe>, GenerationError> {
        let draft = self.start_generation(prompt, category)?.run().await?;
        self.finish_generation(draft)
    }
}
