use std::time::Duration;

use fresco_core::{FrescoError, OpenAiConfig};

use crate::image::ImageGenerator;
use crate::prompt::TextCompleter;

/// OpenAI client covering both generation calls: text completion for prompt
/// synthesis and image generation for the final artifact.
///
/// Works with any provider exposing the `/v1/completions` and
/// `/v1/images/generations` endpoints.
///
/// # Examples
///
/// ```
/// use fresco_core::OpenAiConfig;
/// use fresco_pipeline::openai::OpenAiClient;
///
/// let config = OpenAiConfig {
///     api_key: Some("test-key".into()),
///     ..OpenAiConfig::default()
/// };
/// let client = OpenAiClient::new(&config).unwrap();
/// ```
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &OpenAiConfig) -> Result<Self, FrescoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| FrescoError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com")
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        map_err: fn(String) -> FrescoError,
    ) -> Result<serde_json::Value, FrescoError> {
        let mut request = self.client.post(url);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }
        request = request.header("Content-Type", "application/json");

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| map_err(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_err(format!("OpenAI API error {status}: {body_text}")));
        }

        response
            .json()
            .await
            .map_err(|e| map_err(format!("failed to parse response: {e}")))
    }
}

impl TextCompleter for OpenAiClient {
    /// Send a completion request and return every choice's text.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::PromptSynthesis`] on HTTP errors or a response
    /// without a `choices` array.
    async fn complete(
        &self,
        instruction: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Vec<String>, FrescoError> {
        let url = format!("{}/v1/completions", self.base_url());
        let body = serde_json::json!({
            "model": self.config.completion_model,
            "prompt": instruction,
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .post_json(&url, &body, FrescoError::PromptSynthesis)
            .await?;

        let choices = response
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                FrescoError::PromptSynthesis(format!("unexpected response structure: {response}"))
            })?;

        Ok(choices
            .iter()
            .filter_map(|c| c.get("text").and_then(|t| t.as_str()))
            .map(str::to_string)
            .collect())
    }
}

impl ImageGenerator for OpenAiClient {
    /// Send an image-generation request and return every result's locator.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::ImageSynthesis`] on HTTP errors or a response
    /// without a `data` array.
    async fn generate(&self, prompt: &str, model: &str) -> Result<Vec<String>, FrescoError> {
        let url = format!("{}/v1/images/generations", self.base_url());
        let body = serde_json::json!({
            "prompt": prompt,
            "model": model,
        });

        let response = self
            .post_json(&url, &body, FrescoError::ImageSynthesis)
            .await?;

        let data = response
            .get("data")
            .and_then(|d| d.as_array())
            .ok_or_else(|| {
                FrescoError::ImageSynthesis(format!("unexpected response structure: {response}"))
            })?;

        Ok(data
            .iter()
            .filter_map(|entry| entry.get("url").and_then(|u| u.as_str()))
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_construction_succeeds() {
        let config = OpenAiConfig::default();
        assert!(OpenAiClient::new(&config).is_ok());
    }

    #[test]
    fn base_url_defaults_to_openai() {
        let client = OpenAiClient::new(&OpenAiConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com");
    }

    #[test]
    fn base_url_honors_override() {
        let config = OpenAiConfig {
            base_url: Some("http://localhost:11434".into()),
            ..OpenAiConfig::default()
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }
}
