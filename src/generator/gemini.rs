//! Google Gemini implementation of [`RecipeGenerator`].
//!
//! Recipes come from a structured-output `generateContent` call constrained
//! by [`prompts::recipe_schema`]; pictures come from an image model whose
//! inline data is returned as a `data:` URI.

use super::prompts::{self, IMAGE_ASPECT_RATIO, SYSTEM_INSTRUCTION};
use super::{GeneratedRecipe, GenerationError, RecipeGenerator};
use crate::config::{ConfigError, GeminiConfig};
use crate::model::Category;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use tracing::{debug, error, instrument};

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Content {
            role: role.map(str::to_owned),
            parts: vec![Part {
                text: Some(text.into()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default = "default_mime_type")]
    mime_type: String,
    data: String,
}

fn default_mime_type() -> String {
    "image/png".to_owned()
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .flatten()
            .take(1)
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// Concatenated text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// First inline image of the first candidate as a `data:` URI.
    fn image_data_uri(&self) -> Option<String> {
        self.parts()
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
    }
}

// ============================================================================
// Generator Implementation
// ============================================================================

/// Recipe and image generation backed by the Gemini REST API.
pub struct GeminiGenerator {
    api_key: String,
    client: Client,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl Debug for GeminiGenerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiGenerator")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiGenerator {
    /// Creates a generator from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` if no API key is configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        Ok(GeminiGenerator {
            api_key,
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    fn recipe_request(prompt: &str, category: Category) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content::text(
                Some("user"),
                prompts::recipe_prompt(prompt, category),
            )],
            system_instruction: Some(Content::text(None, SYSTEM_INSTRUCTION)),
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json".to_owned()),
                response_schema: Some(prompts::recipe_schema(category)),
                ..GenerationConfig::default()
            },
        }
    }

    fn image_request(recipe: &GeneratedRecipe) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content::text(Some("user"), prompts::image_prompt(recipe))],
            system_instruction: None,
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_owned()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: IMAGE_ASPECT_RATIO.to_owned(),
                }),
                ..GenerationConfig::default()
            },
        }
    }

    async fn send(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse, GenerationError> {
        let response = self
            .client
            .post(self.build_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(map_api_error(status.as_u16(), &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "failed to parse Gemini response");
            GenerationError::Service(format!("unreadable response: {e}"))
        })?;
        if let Some(err) = parsed.error {
            return Err(GenerationError::Service(err.message));
        }
        Ok(parsed)
    }
}

/// Extracts the service's own message from an error body when possible.
fn map_api_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<GeminiResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| body.to_owned(), |e| e.message);
    GenerationError::Api { status, message }
}

#[async_trait]
impl RecipeGenerator for GeminiGenerator {
    #[instrument(skip(self), fields(model = %self.text_model))]
    async fn generate_recipe(
        &self,
        prompt: &str,
        category: Category,
    ) -> Result<GeneratedRecipe, GenerationError> {
        let request = Self::recipe_request(prompt, category);
        debug!("requesting recipe from Gemini");
        let response = self.send(&self.text_model, &request).await?;
        let text = response.text().ok_or(GenerationError::EmptyResponse)?;
        GeneratedRecipe::from_json(&text)
    }

    #[instrument(skip(self, recipe), fields(model = %self.image_model, title = %recipe.title))]
    async fn generate_image(
        &self,
        recipe: &GeneratedRecipe,
    ) -> Result<Option<String>, GenerationError> {
        let request = Self::image_request(recipe);
        debug!("requesting image from Gemini");
        let response = self.send(&self.image_model, &request).await?;
        Ok(response.image_data_uri())
    }
}
