//! AI recipe generation.
//!
//! A generation asks the text service for a recipe, then asks the image
//! service for a picture of it. The first call failing fails the whole
//! generation; the second one failing only swaps in a placeholder image.
//!
//! Only one generation may be in flight at a time. The "generating" state
//! is held by a [`GeneratingGuard`] that is released when the generation
//! ends, however it ends.

use crate::model::{Category, Difficulty, Ingredient, Recipe};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

mod gemini;
pub mod prompts;

pub use gemini::GeminiGenerator;

/// Notice shown to the user when a recipe could not be generated.
pub const GENERATION_FAILED_NOTICE: &str =
    "אופס! השף הקטן התבלבל קצת. נסו שוב או בדקו את חיבור האינטרנט.";

/// Errors that can occur while generating a recipe.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("A recipe is already being generated")]
    InProgress,

    #[error("No generation service is configured")]
    NotConfigured,

    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Generation service returned no content")]
    EmptyResponse,

    #[error("Generated recipe does not match the schema: {0}")]
    InvalidPayload(String),

    #[error("Generation service error: {0}")]
    Service(String),

    #[error("Failed to add generated recipe: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),
}

impl GenerationError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_NOTICE
    }
}

/// Recipe fields produced by the text service, before an id and image are
/// attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub time_minutes: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
}

impl GeneratedRecipe {
    /// Parses and checks the JSON document returned by the text service.
    pub fn from_json(text: &str) -> Result<Self, GenerationError> {
        let recipe: GeneratedRecipe = serde_json::from_str(text)
            .map_err(|e| GenerationError::InvalidPayload(e.to_string()))?;
        if recipe.title.trim().is_empty() {
            return Err(GenerationError::InvalidPayload("title is empty".to_string()));
        }
        if recipe.instructions.is_empty() {
            return Err(GenerationError::InvalidPayload("no instructions".to_string()));
        }
        Ok(recipe)
    }
}

/// External service that writes and illustrates recipes.
///
/// Implementations only talk to the service; fallbacks and bookkeeping
/// live in [`Generation::run`].
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// Asks for a recipe of `category` matching `prompt`.
    async fn generate_recipe(
        &self,
        prompt: &str,
        category: Category,
    ) -> Result<GeneratedRecipe, GenerationError>;

    /// Asks for a picture of `recipe`.
    ///
    /// Returns an image reference (typically a `data:` URI), or `None`
    /// when the service answered without an image.
    async fn generate_image(
        &self,
        recipe: &GeneratedRecipe,
    ) -> Result<Option<String>, GenerationError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn RecipeGenerator) {}
};

/// Deterministic stand-in picture for a recipe title.
pub fn placeholder_image_url(title: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/800/600",
        urlencoding::encode(title)
    )
}

/// Shared "a recipe is being generated" flag.
#[derive(Debug, Clone, Default)]
pub struct GeneratingFlag {
    busy: Arc<AtomicBool>,
}

impl GeneratingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Sets the flag, or returns `None` if it is already set.
    pub fn try_acquire(&self) -> Option<GeneratingGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GeneratingGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Clears the generating flag when dropped.
#[derive(Debug)]
pub struct GeneratingGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for GeneratingGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// A generation that has claimed the generating flag but not yet run.
pub struct Generation {
    generator: Arc<dyn RecipeGenerator>,
    prompt: String,
    category: Category,
    guard: GeneratingGuard,
}

impl Generation {
    /// Claims `flag` for a new generation.
    ///
    /// # Errors
    ///
    /// `EmptyPrompt` if the prompt is blank, `InProgress` if another
    /// generation holds the flag.
    pub fn start(
        generator: Arc<dyn RecipeGenerator>,
        flag: &GeneratingFlag,
        prompt: &str,
        category: Category,
    ) -> Result<Self, GenerationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        let guard = flag.try_acquire().ok_or(GenerationError::InProgress)?;
        Ok(Generation {
            generator,
            prompt: prompt.to_string(),
            category,
            guard,
        })
    }

    /// Runs the text request and then the image request.
    ///
    /// On error the generating flag is released before returning.
    #[instrument(skip(self), fields(category = %self.category, prompt = %self.prompt))]
    pub async fn run(self) -> Result<Draft, GenerationError> {
        let mut recipe = match self
            .generator
            .generate_recipe(&self.prompt, self.category)
            .await
        {
            Ok(recipe) => recipe,
            Err(e) => {
                error!(error = %e, "recipe generation failed");
                return Err(e);
            }
        };
        if recipe.category != self.category {
            warn!(returned = %recipe.category, "service ignored requested category");
            recipe.category = self.category;
        }
        debug!(title = %recipe.title, "recipe text generated");

        let image_url = match self.generator.generate_image(&recipe).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                warn!(title = %recipe.title, "no image returned, using placeholder");
                placeholder_image_url(&recipe.title)
            }
            Err(e) => {
                warn!(title = %recipe.title, error = %e, "image generation failed, using placeholder");
                placeholder_image_url(&recipe.title)
            }
        };

        info!(title = %recipe.title, "recipe generated");
        Ok(Draft {
            recipe,
            image_url,
            _guard: self.guard,
        })
    }
}

/// A finished generation waiting for an id. Still holds the generating flag.
#[derive(Debug)]
pub struct Draft {
    recipe: GeneratedRecipe,
    image_url: String,
    _guard: GeneratingGuard,
}

impl Draft {
    pub fn recipe(&self) -> &GeneratedRecipe {
        &self.recipe
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Builds the catalog record and releases the generating flag.
    pub fn into_recipe(self, id: String) -> Recipe {
        let GeneratedRecipe {
            title,
            description,
            category,
            difficulty,
            time_minutes,
            ingredients,
            instructions,
        } = self.recipe;
        Recipe {
            id,
            title,
            description,
            category,
            difficulty,
            time_minutes,
            ingredients,
            instructions,
            image_url: self.image_url,
            is_generated: true,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_placeholder_is_deterministic_and_encoded() {
        let url = placeholder_image_url("Dino Cookies & Milk");
        assert_eq!(url, placeholder_image_url("Dino Cookies & Milk"));
        assert_eq!(
            url,
            "https://picsum.photos/seed/Dino%20Cookies%20%26%20Milk/800/600"
        );
    }

    #[test]
    fn test_flag_is_exclusive_and_released_on_drop() {
        let flag = GeneratingFlag::new();
        let guard = flag.try_acquire().unwrap();
        assert!(flag.is_set());
        assert!(flag.try_acquire().is_none());
        drop(guard);
        assert!(!flag.is_set());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn test_from_json_validates() {
        let json = serde_json::to_string(&dino_cookies()).unwrap();
        assert_eq!(GeneratedRecipe::from_json(&json).unwrap(), dino_cookies());

        assert!(matches!(
            GeneratedRecipe::from_json(r#"{"title": "x"}"#),
            Err(GenerationError::InvalidPayload(_))
        ));

        let mut untitled = dino_cookies();
        untitled.title = "  ".to_string();
        let json = serde_json::to_string(&untitled).unwrap();
        assert!(matches!(
            GeneratedRecipe::from_json(&json),
            Err(GenerationError::InvalidPayload(_))
        ));

        let bad_difficulty = json.replace("קל", "very hard");
        assert!(GeneratedRecipe::from_json(&bad_difficulty).is_err());
    }

    #[test]
    fn test_start_rejects_blank_prompt_without_taking_flag() {
        let flag = GeneratingFlag::new();
        let generator = Arc::new(FakeGenerator::new(Ok(dino_cookies()), Ok(None)));
        let result = Generation::start(generator, &flag, "   ", Category::Baking);
        assert!(matches!(result, Err(GenerationError::EmptyPrompt)));
        assert!(!flag.is_set());
    }

    #[test]
    fn test_start_refuses_second_generation() {
        let flag = GeneratingFlag::new();
        let generator: Arc<dyn RecipeGenerator> =
            Arc::new(FakeGenerator::new(Ok(dino_cookies()), Ok(None)));
        let _first = Generation::start(generator.clone(), &flag, "cookies", Category::Baking).unwrap();
        let second = Generation::start(generator, &flag, "cake", Category::Baking);
        assert!(matches!(second, Err(GenerationError::InProgress)));
    }

    #[tokio::test]
    async fn test_run_uses_generated_image() {
        let flag = GeneratingFlag::new();
        let generator = FakeGenerator::new(
            Ok(dino_cookies()),
            Ok(Some("data:image/png;base64,AAAA".to_string())),
        )
        .watching(&flag);
        let generator = Arc::new(generator);

        let draft = Generation::start(generator.clone(), &flag, "dinosaur cookies", Category::Baking)
            .unwrap()
            .run()
            .await
            .unwrap();
        assert_eq!(*generator.saw_flag.lock().unwrap(), Some(true));
        assert!(flag.is_set());

        let recipe = draft.into_recipe("42".to_string());
        assert!(!flag.is_set());
        assert_eq!(recipe.id, "42");
        assert_eq!(recipe.image_url, "data:image/png;base64,AAAA");
        assert!(recipe.is_generated);
        assert_eq!(recipe.title, "עוגיות דינוזאור");
    }

    #[tokio::test]
    async fn test_image_failure_falls_back_to_placeholder() {
        let flag = GeneratingFlag::new();
        let generator = Arc::new(FakeGenerator::new(
            Ok(dino_cookies()),
            Err(GenerationError::Service("image model overloaded".to_string())),
        ));

        let draft = Generation::start(generator, &flag, "dinosaur cookies", Category::Baking)
            .unwrap()
            .run()
            .await
            .unwrap();
        let recipe = draft.into_recipe("1".to_string());
        assert!(recipe.is_generated);
        assert!(!recipe.image_url.is_empty());
        assert_eq!(recipe.image_url, placeholder_image_url("עוגיות דינוזאור"));
    }

    #[tokio::test]
    async fn test_missing_image_falls_back_to_placeholder() {
        let flag = GeneratingFlag::new();
        let generator = Arc::new(FakeGenerator::new(Ok(dino_cookies()), Ok(None)));
        let draft = Generation::start(generator, &flag, "cookies", Category::Baking)
            .unwrap()
            .run()
            .await
            .unwrap();
        assert_eq!(draft.image_url(), placeholder_image_url("עוגיות דינוזאור"));
    }

    #[tokio::test]
    async fn test_text_failure_clears_flag() {
        let flag = GeneratingFlag::new();
        let generator = Arc::new(FakeGenerator::new(
            Err(GenerationError::EmptyResponse),
            Ok(None),
        ));
        let result = Generation::start(generator, &flag, "cookies", Category::Baking)
            .unwrap()
            .run()
            .await;
        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
        assert!(!flag.is_set());
    }

    #[tokio::test]
    async fn test_requested_category_wins() {
        let flag = GeneratingFlag::new();
        let generator = Arc::new(FakeGenerator::new(Ok(dino_cookies()), Ok(None)));
        let draft = Generation::start(generator, &flag, "latkes", Category::Frying)
            .unwrap()
            .run()
            .await
            .unwrap();
        assert_eq!(draft.recipe().category, Category::Frying);
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            GenerationError::EmptyResponse.user_message(),
            GENERATION_FAILED_NOTICE
        );
    }
}
