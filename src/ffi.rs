//! UniFFI bindings for cross-platform support (iOS, Android).
//!
//! This module provides FFI-safe types and functions for use with UniFFI.
//! The app state lives in an [`FfiRecipeBook`], which wraps a
//! [`RecipeBook`] behind a mutex so the mobile UI can call it from any
//! thread.

use crate::book::RecipeBook;
use crate::catalog::CatalogError;
use crate::config::{Config, ConfigError};
use crate::generator::GenerationError;
use crate::model::{Category, Difficulty, Ingredient, Recipe, FALLBACK_IMAGE_URL};
use crate::navigation::Neighbors;
use crate::query::{Criteria, SortBy};
use camino::Utf8PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// FFI-safe error type that wraps all possible errors.
#[derive(Debug, uniffi::Error, thiserror::Error)]
pub enum LittleChefError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Busy: {message}")]
    Busy { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// `user_message` is the notice to show; `message` is for logs.
    #[error("Generation failed: {message}")]
    GenerationFailed {
        message: String,
        user_message: String,
    },
}

impl From<GenerationError> for LittleChefError {
    fn from(e: GenerationError) -> Self {
        let message = e.to_string();
        match e {
            GenerationError::EmptyPrompt => LittleChefError::InvalidInput { message },
            GenerationError::InProgress => LittleChefError::Busy { message },
            GenerationError::NotConfigured => LittleChefError::Configuration { message },
            GenerationError::Catalog(e) => e.into(),
            other => LittleChefError::GenerationFailed {
                message,
                user_message: other.user_message().to_string(),
            },
        }
    }
}

impl From<CatalogError> for LittleChefError {
    fn from(e: CatalogError) -> Self {
        LittleChefError::Catalog {
            message: e.to_string(),
        }
    }
}

impl From<ConfigError> for LittleChefError {
    fn from(e: ConfigError) -> Self {
        LittleChefError::Configuration {
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiCategory {
    Baking,
    Cooking,
    Frying,
}

impl From<Category> for FfiCategory {
    fn from(c: Category) -> Self {
        match c {
            Category::Baking => FfiCategory::Baking,
            Category::Cooking => FfiCategory::Cooking,
            Category::Frying => FfiCategory::Frying,
        }
    }
}

impl From<FfiCategory> for Category {
    fn from(c: FfiCategory) -> Self {
        match c {
            FfiCategory::Baking => Category::Baking,
            FfiCategory::Cooking => Category::Cooking,
            FfiCategory::Frying => Category::Frying,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiDifficulty {
    Easy,
    Medium,
    Challenging,
}

impl From<Difficulty> for FfiDifficulty {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => FfiDifficulty::Easy,
            Difficulty::Medium => FfiDifficulty::Medium,
            Difficulty::Challenging => FfiDifficulty::Challenging,
        }
    }
}

impl From<FfiDifficulty> for Difficulty {
    fn from(d: FfiDifficulty) -> Self {
        match d {
            FfiDifficulty::Easy => Difficulty::Easy,
            FfiDifficulty::Medium => Difficulty::Medium,
            FfiDifficulty::Challenging => Difficulty::Challenging,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSortBy {
    Title,
    Time,
    Difficulty,
}

impl From<SortBy> for FfiSortBy {
    fn from(s: SortBy) -> Self {
        match s {
            SortBy::Title => FfiSortBy::Title,
            SortBy::Time => FfiSortBy::Time,
            SortBy::Difficulty => FfiSortBy::Difficulty,
        }
    }
}

impl From<FfiSortBy> for SortBy {
    fn from(s: FfiSortBy) -> Self {
        match s {
            FfiSortBy::Title => SortBy::Title,
            FfiSortBy::Time => SortBy::Time,
            FfiSortBy::Difficulty => SortBy::Difficulty,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIngredient {
    pub item: String,
    pub amount: String,
}

impl From<&Ingredient> for FfiIngredient {
    fn from(i: &Ingredient) -> Self {
        FfiIngredient {
            item: i.item.clone(),
            amount: i.amount.clone(),
        }
    }
}

/// FFI-safe representation of a recipe.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: FfiCategory,
    /// Hebrew label for `category`
    pub category_label: String,
    pub difficulty: FfiDifficulty,
    /// Hebrew label for `difficulty`
    pub difficulty_label: String,
    pub time_minutes: u32,
    pub ingredients: Vec<FfiIngredient>,
    /// Ingredients not shown on the card's quick view
    pub hidden_ingredient_count: u32,
    pub instructions: Vec<String>,
    pub image_url: String,
    /// True for AI-generated recipes
    pub is_generated: bool,
    /// Text for the platform share sheet
    pub share_text: String,
}

impl From<&Recipe> for FfiRecipe {
    fn from(r: &Recipe) -> Self {
        let (_, hidden) = r.ingredient_preview();
        FfiRecipe {
            id: r.id.clone(),
            title: r.title.clone(),
            description: r.description.clone(),
            category: r.category.into(),
            category_label: r.category.label().to_string(),
            difficulty: r.difficulty.into(),
            difficulty_label: r.difficulty.label().to_string(),
            time_minutes: r.time_minutes,
            ingredients: r.ingredients.iter().map(FfiIngredient::from).collect(),
            hidden_ingredient_count: hidden as u32,
            instructions: r.instructions.clone(),
            image_url: r.image_url.clone(),
            is_generated: r.is_generated,
            share_text: r.share_text(),
        }
    }
}

/// Filter, search and sort settings. `None` filters mean "All".
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCriteria {
    pub category: Option<FfiCategory>,
    pub difficulty: Option<FfiDifficulty>,
    pub search: String,
    pub favorites_only: bool,
    pub sort_by: FfiSortBy,
}

impl From<&Criteria> for FfiCriteria {
    fn from(c: &Criteria) -> Self {
        FfiCriteria {
            category: c.category.map(Into::into),
            difficulty: c.difficulty.map(Into::into),
            search: c.search.clone(),
            favorites_only: c.favorites_only,
            sort_by: c.sort_by.into(),
        }
    }
}

impl From<FfiCriteria> for Criteria {
    fn from(c: FfiCriteria) -> Self {
        Criteria {
            category: c.category.map(Into::into),
            difficulty: c.difficulty.map(Into::into),
            search: c.search,
            favorites_only: c.favorites_only,
            sort_by: c.sort_by.into(),
        }
    }
}

/// Previous and next recipes for the detail view's arrows.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNeighbors {
    pub previous: Option<FfiRecipe>,
    pub next: Option<FfiRecipe>,
}

impl From<Neighbors> for FfiNeighbors {
    fn from(n: Neighbors) -> Self {
        FfiNeighbors {
            previous: n.previous.as_deref().map(FfiRecipe::from),
            next: n.next.as_deref().map(FfiRecipe::from),
        }
    }
}

/// The app state: catalog, favorites, criteria, selection and the
/// generating flag.
#[derive(uniffi::Object)]
pub struct FfiRecipeBook {
    inner: Mutex<RecipeBook>,
}

impl FfiRecipeBook {
    fn lock(&self) -> MutexGuard<'_, RecipeBook> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn from_config(config: &Config) -> Result<Arc<Self>, LittleChefError> {
        Ok(Self::wrap(RecipeBook::open(config)?))
    }

    /// Shares an already opened book with foreign callers.
    pub fn wrap(book: RecipeBook) -> Arc<Self> {
        Arc::new(FfiRecipeBook {
            inner: Mutex::new(book),
        })
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl FfiRecipeBook {
    /// Opens a book storing favorites under `data_dir`.
    ///
    /// Without an `api_key` browsing works but `generate` fails.
    #[uniffi::constructor]
    pub fn new(data_dir: String, api_key: Option<String>) -> Result<Arc<Self>, LittleChefError> {
        let mut config = Config {
            data_dir: Utf8PathBuf::from(data_dir),
            ..Config::default()
        };
        config.gemini.api_key = api_key;
        Self::from_config(&config)
    }

    /// Opens a book from the config file and environment.
    #[uniffi::constructor]
    pub fn from_environment() -> Result<Arc<Self>, LittleChefError> {
        Self::from_config(&Config::load()?)
    }

    /// Returns the recipes to show, in display order.
    pub fn view(&self) -> Vec<FfiRecipe> {
        self.lock()
            .view()
            .iter()
            .map(|r| FfiRecipe::from(r.as_ref()))
            .collect()
    }

    pub fn criteria(&self) -> FfiCriteria {
        FfiCriteria::from(self.lock().criteria())
    }

    pub fn set_criteria(&self, criteria: FfiCriteria) {
        self.lock().set_criteria(criteria.into());
    }

    pub fn reset_criteria(&self) {
        self.lock().reset_criteria();
    }

    /// Returns true if any filter or the search box can hide recipes.
    pub fn has_active_filters(&self) -> bool {
        self.lock().criteria().has_active_filters()
    }

    /// Flips a recipe's favorite state. Returns the new state.
    pub fn toggle_favorite(&self, id: String) -> bool {
        self.lock().toggle_favorite(&id)
    }

    pub fn is_favorite(&self, id: String) -> bool {
        self.lock().is_favorite(&id)
    }

    pub fn favorites_count(&self) -> u32 {
        self.lock().favorites_count() as u32
    }

    /// Opens a recipe. Returns `None` for unknown ids.
    pub fn select(&self, id: String) -> Option<FfiRecipe> {
        self.lock().select(&id).as_deref().map(FfiRecipe::from)
    }

    pub fn clear_selection(&self) {
        self.lock().clear_selection();
    }

    pub fn selected(&self) -> Option<FfiRecipe> {
        self.lock().selected().as_deref().map(FfiRecipe::from)
    }

    pub fn neighbors(&self) -> FfiNeighbors {
        self.lock().neighbors().into()
    }

    pub fn go_next(&self) -> Option<FfiRecipe> {
        self.lock().go_next().as_deref().map(FfiRecipe::from)
    }

    pub fn go_previous(&self) -> Option<FfiRecipe> {
        self.lock().go_previous().as_deref().map(FfiRecipe::from)
    }

    /// Returns true while a recipe is being generated.
    pub fn is_generating(&self) -> bool {
        self.lock().is_generating()
    }

    /// Generates a recipe, adds it to the catalog and selects it.
    ///
    /// The book stays usable while the request is in flight.
    pub async fn generate(
        &self,
        prompt: String,
        category: FfiCategory,
    ) -> Result<FfiRecipe, LittleChefError> {
        let generation = self.lock().start_generation(&prompt, category.into())?;
        let draft = generation.run().await?;
        let recipe = self.lock().finish_generation(draft)?;
        Ok(FfiRecipe::from(recipe.as_ref()))
    }
}

// ============================================================================
// Exported FFI Functions
// ============================================================================

/// Image to show when a recipe picture fails to load.
#[uniffi::export]
pub fn fallback_image_url() -> String {
    FALLBACK_IMAGE_URL.to_string()
}

/// Hebrew label for a category, as shown on the filter chips.
#[uniffi::export]
pub fn category_label(category: FfiCategory) -> String {
    Category::from(category).label().to_string()
}

/// Hebrew label for a difficulty.
#[uniffi::export]
pub fn difficulty_label(difficulty: FfiDifficulty) -> String {
    Difficulty::from(difficulty).label().to_string()
}

/// Returns the library version.
#[uniffi::export]
pub fn library_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::FavoritesStore;
    use crate::generator::testing::dino_cookies;
    use crate::generator::{GeneratedRecipe, RecipeGenerator};
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Records what the book looked like from inside a running request.
    #[derive(Default)]
    struct ObservingGenerator {
        book: Mutex<Option<Arc<FfiRecipeBook>>>,
        lock_free: Mutex<Option<bool>>,
        generating: Mutex<Option<bool>>,
    }

    #[async_trait]
    impl RecipeGenerator for ObservingGenerator {
        async fn generate_recipe(
            &self,
            _prompt: &str,
            _category: Category,
        ) -> Result<GeneratedRecipe, GenerationError> {
            let book = self.book.lock().unwrap().take();
            if let Some(book) = book {
                let lock_free = book.inner.try_lock().is_ok();
                *self.lock_free.lock().unwrap() = Some(lock_free);
                *self.generating.lock().unwrap() = Some(book.is_generating());
            }
            Ok(dino_cookies())
        }

        async fn generate_image(
            &self,
            _recipe: &GeneratedRecipe,
        ) -> Result<Option<String>, GenerationError> {
            Ok(Some("data:image/png;base64,AAAA".to_string()))
        }
    }

    fn open(temp: &TempDir) -> Arc<FfiRecipeBook> {
        let dir = temp.path().to_str().unwrap().to_string();
        FfiRecipeBook::new(dir, None).unwrap()
    }

    #[test]
    fn test_browse_and_filter() {
        let temp = TempDir::new().unwrap();
        let book = open(&temp);
        let all = book.view();
        assert!(!all.is_empty());
        assert!(!book.has_active_filters());

        book.set_criteria(FfiCriteria {
            category: Some(FfiCategory::Frying),
            difficulty: None,
            search: String::new(),
            favorites_only: false,
            sort_by: FfiSortBy::Time,
        });
        let fried = book.view();
        assert!(!fried.is_empty());
        assert!(fried.len() < all.len());
        assert!(fried.iter().all(|r| r.category == FfiCategory::Frying));
        assert!(fried.windows(2).all(|w| w[0].time_minutes <= w[1].time_minutes));
        assert!(book.has_active_filters());
        assert_eq!(book.criteria().sort_by, FfiSortBy::Time);

        book.reset_criteria();
        assert_eq!(book.view().len(), all.len());
    }

    #[test]
    fn test_favorites_persist_between_books() {
        let temp = TempDir::new().unwrap();
        let book = open(&temp);
        assert!(book.toggle_favorite("4".to_string()));
        assert_eq!(book.favorites_count(), 1);

        let reopened = open(&temp);
        assert!(reopened.is_favorite("4".to_string()));
    }

    #[test]
    fn test_selection_and_neighbors() {
        let temp = TempDir::new().unwrap();
        let book = open(&temp);
        let view = book.view();

        let opened = book.select(view[1].id.clone()).unwrap();
        assert_eq!(opened.id, view[1].id);
        let neighbors = book.neighbors();
        assert_eq!(neighbors.previous.unwrap().id, view[0].id);
        assert_eq!(neighbors.next.unwrap().id, view[2].id);

        assert_eq!(book.go_previous().unwrap().id, view[0].id);
        assert!(book.go_previous().is_none());
        assert_eq!(book.selected().unwrap().id, view[0].id);

        book.clear_selection();
        assert!(book.selected().is_none());
        assert!(book.select("missing".to_string()).is_none());
    }

    #[test]
    fn test_recipe_record() {
        let temp = TempDir::new().unwrap();
        let book = open(&temp);
        let recipe = book.select("1".to_string()).unwrap();
        assert_eq!(recipe.category_label, category_label(recipe.category));
        assert_eq!(recipe.difficulty_label, difficulty_label(recipe.difficulty));
        assert!(recipe.share_text.contains(&recipe.title));
        assert!(!recipe.is_generated);
        assert_eq!(
            recipe.hidden_ingredient_count as usize,
            recipe
                .ingredients
                .len()
                .saturating_sub(crate::model::QUICK_VIEW_INGREDIENTS)
        );
    }

    #[tokio::test]
    async fn test_generate_errors() {
        let temp = TempDir::new().unwrap();
        let book = open(&temp);

        let err = book
            .generate("  ".to_string(), FfiCategory::Baking)
            .await
            .unwrap_err();
        assert!(matches!(err, LittleChefError::InvalidInput { .. }));

        let err = book
            .generate("cookies".to_string(), FfiCategory::Baking)
            .await
            .unwrap_err();
        assert!(matches!(err, LittleChefError::Configuration { .. }));
        assert!(!book.is_generating());
    }

    #[tokio::test]
    async fn test_generate_releases_book_while_waiting() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let generator = Arc::new(ObservingGenerator::default());
        let book = FfiRecipeBook::wrap(
            RecipeBook::new(FavoritesStore::new(dir))
                .unwrap()
                .with_generator(generator.clone()),
        );
        *generator.book.lock().unwrap() = Some(Arc::clone(&book));
        let before = book.view().len();

        let recipe = book
            .generate("dinosaur cookies".to_string(), FfiCategory::Frying)
            .await
            .unwrap();

        assert_eq!(*generator.lock_free.lock().unwrap(), Some(true));
        assert_eq!(*generator.generating.lock().unwrap(), Some(true));
        assert!(!book.is_generating());

        assert!(recipe.is_generated);
        assert_eq!(recipe.category, FfiCategory::Frying);
        assert_eq!(recipe.image_url, "data:image/png;base64,AAAA");
        assert_eq!(book.selected().unwrap().id, recipe.id);
        assert_eq!(book.view().len(), before + 1);
    }

    #[test]
    fn test_generation_error_mapping() {
        let err = LittleChefError::from(GenerationError::EmptyResponse);
        match err {
            LittleChefError::GenerationFailed { user_message, .. } => {
                assert_eq!(user_message, crate::generator::GENERATION_FAILED_NOTICE)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            LittleChefError::from(GenerationError::InProgress),
            LittleChefError::Busy { .. }
        ));
    }

    #[test]
    fn test_exported_helpers() {
        assert!(fallback_image_url().starts_with("https://"));
        assert_eq!(category_label(FfiCategory::Baking), "אפייה");
        assert_eq!(difficulty_label(FfiDifficulty::Challenging), "מאתגר");
    }

    #[test]
    fn test_library_version() {
        let version = library_version();
        assert!(!version.is_empty());
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }
}
