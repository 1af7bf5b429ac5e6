uniffi::setup_scaffolding!();

pub mod book;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod ffi;
pub mod generator;
pub mod model;
pub mod navigation;
pub mod query;

pub use book::RecipeBook;
pub use catalog::{Catalog, CatalogError};
pub use config::{Config, ConfigError};
pub use favorites::{Favorites, FavoritesError, FavoritesStore};
pub use generator::{GeminiGenerator, GenerationError, RecipeGenerator};
pub use model::*;
pub use navigation::Neighbors;
pub use query::{query, Criteria, SortBy};
