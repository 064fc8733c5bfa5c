use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FrescoError;

/// Top-level configuration loaded from `.fresco.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
///
/// # Examples
///
/// ```
/// use fresco_core::FrescoConfig;
///
/// let config = FrescoConfig::default();
/// assert_eq!(config.generation.theme, "wizard adventure");
/// assert_eq!(config.openai.image_model, "dall-e-3");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrescoConfig {
    /// Theme and style settings for the generated image.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// OpenAI provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

impl FrescoConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::Io`] if the file cannot be read, or
    /// [`FrescoError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fresco_core::FrescoConfig;
    /// use std::path::Path;
    ///
    /// let config = FrescoConfig::from_file(Path::new(".fresco.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, FrescoError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use fresco_core::FrescoConfig;
    ///
    /// let toml = r#"
    /// [generation]
    /// theme = "space opera"
    /// "#;
    /// let config = FrescoConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.generation.theme, "space opera");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, FrescoError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Theme and style settings fed into the instruction template.
///
/// # Examples
///
/// ```
/// use fresco_core::GenerationConfig;
///
/// let config = GenerationConfig::default();
/// assert_eq!(config.style, "artistic");
/// assert_eq!(config.max_instruction_chars, 1000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Fantasy theme the image should follow (default: `"wizard adventure"`).
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Visual style of the image (default: `"artistic"`).
    #[serde(default = "default_style")]
    pub style: String,
    /// Character cap applied to the instruction before the completion call
    /// (default: 1000). Overflow is cut, never rejected.
    #[serde(default = "default_max_instruction_chars")]
    pub max_instruction_chars: usize,
}

fn default_theme() -> String {
    "wizard adventure".into()
}

fn default_style() -> String {
    "artistic".into()
}

fn default_max_instruction_chars() -> usize {
    1000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            style: default_style(),
            max_instruction_chars: default_max_instruction_chars(),
        }
    }
}

/// OpenAI provider configuration for both generation calls.
///
/// # Examples
///
/// ```
/// use fresco_core::OpenAiConfig;
///
/// let config = OpenAiConfig::default();
/// assert_eq!(config.completion_model, "gpt-3.5-turbo-instruct");
/// assert_eq!(config.max_tokens, 200);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key; falls back to the `OPENAI_API_KEY` env var in the binary.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
    /// Model for the prompt-synthesis completion call.
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    /// Model for the image-generation call.
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Token ceiling for the completion call (default: 200).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature for the completion call (default: 0.7).
    /// Repeated runs are expected to produce different prompts.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_completion_model() -> String {
    "gpt-3.5-turbo-instruct".into()
}

fn default_image_model() -> String {
    "dall-e-3".into()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            completion_model: default_completion_model(),
            image_model: default_image_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}
