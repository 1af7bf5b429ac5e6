//! Configuration.
//!
//! Resolution order: built-in defaults, then the optional TOML file at
//! `$XDG_CONFIG_HOME/little-chef/config.toml` (or `~/.config/little-chef`),
//! then environment variables.

use crate::query::DEFAULT_COLLATION_LOCALE;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use thiserror::Error;
use tracing::debug;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Older name for the API key variable, still honored.
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";
pub const DATA_DIR_ENV: &str = "LITTLE_CHEF_DATA_DIR";
pub const LOCALE_ENV: &str = "LITTLE_CHEF_LOCALE";

const APP_DIR: &str = "little-chef";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No Gemini API key configured (set {API_KEY_ENV})")]
    MissingApiKey,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(String),
}

/// Settings for the Gemini generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the favorites slot.
    pub data_dir: Utf8PathBuf,
    /// BCP-47 tag used to order titles.
    pub collation_locale: String,
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: default_data_dir(),
            collation_locale: DEFAULT_COLLATION_LOCALE.to_string(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config file (if present) and applies the process
    /// environment on top.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(&path, &env)
    }

    /// Same as [`load`](Self::load) with an explicit file and environment.
    pub fn load_from(path: &Utf8Path, env: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => {
                debug!(%path, "read config file");
                toml::from_str(&contents)?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.apply_env(env);
        Ok(config)
    }

    fn apply_env(&mut self, env: &HashMap<String, String>) {
        let non_empty = |key: &str| env.get(key).filter(|v| !v.trim().is_empty()).cloned();

        if let Some(key) = non_empty(API_KEY_ENV).or_else(|| non_empty(LEGACY_API_KEY_ENV)) {
            self.gemini.api_key = Some(key);
        }
        if let Some(dir) = non_empty(DATA_DIR_ENV) {
            self.data_dir = Utf8PathBuf::from(dir);
        }
        if let Some(locale) = non_empty(LOCALE_ENV) {
            self.collation_locale = locale;
        }
    }
}

/// `$XDG_CONFIG_HOME/little-chef/config.toml`, or `~/.config/little-chef/config.toml`.
pub fn config_path() -> Result<Utf8PathBuf, ConfigError> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => std::path::PathBuf::from(xdg),
        _ => dirs::home_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(".config"),
    };
    let path = base.join(APP_DIR).join("config.toml");
    Utf8PathBuf::from_path_buf(path).map_err(|p| ConfigError::NonUtf8Path(p.display().to_string()))
}

fn default_data_dir() -> Utf8PathBuf {
    dirs::data_dir()
        .and_then(|d| Utf8PathBuf::from_path_buf(d).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
        .join(APP_DIR)
}
