use fresco_core::{FrescoError, ImageArtifact};

/// An image-generation capability: prompt in, resource locators out.
pub trait ImageGenerator {
    /// Return the locator of every generated image, in response order.
    fn generate(
        &self,
        prompt: &str,
        model: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, FrescoError>>;
}

/// Third pipeline stage: turn a prompt into a resolvable image reference.
///
/// The most latency-sensitive stage, and deliberately retry-free: callers
/// needing resilience must wrap it.
pub struct ImageSynthesizer<'a, G> {
    generator: &'a G,
    model: &'a str,
}

impl<'a, G: ImageGenerator> ImageSynthesizer<'a, G> {
    /// Create a synthesizer that requests images from `generator` using `model`.
    pub fn new(generator: &'a G, model: &'a str) -> Self {
        Self { generator, model }
    }

    /// Generate an image for `prompt`, sent unmodified, and return the first
    /// result's locator.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::ImageSynthesis`] if the call fails, returns no
    /// image entries, or the first entry's locator is blank.
    pub async fn synthesize(&self, prompt: &str) -> Result<ImageArtifact, FrescoError> {
        let urls = self.generator.generate(prompt, self.model).await?;

        let url = urls.first().ok_or_else(|| {
            FrescoError::ImageSynthesis("image generation returned no entries".into())
        })?;

        if url.trim().is_empty() {
            return Err(FrescoError::ImageSynthesis(
                "image entry has an empty locator".into(),
            ));
        }

        Ok(ImageArtifact { url: url.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGenerator {
        urls: Vec<String>,
    }

    impl ImageGenerator for FixedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _model: &str,
        ) -> Result<Vec<String>, FrescoError> {
            Ok(self.urls.clone())
        }
    }

    #[tokio::test]
    async fn synthesize_takes_the_first_locator() {
        let generator = FixedGenerator {
            urls: vec!["https://img/1".into(), "https://img/2".into()],
        };
        let artifact = ImageSynthesizer::new(&generator, "dall-e-3")
            .synthesize("A starship...")
            .await
            .unwrap();
        assert_eq!(artifact.url, "https://img/1");
    }

    #[tokio::test]
    async fn empty_result_sequence_is_an_error() {
        let generator = FixedGenerator { urls: vec![] };
        let err = ImageSynthesizer::new(&generator, "dall-e-3")
            .synthesize("A starship...")
            .await
            .unwrap_err();
        assert!(matches!(err, FrescoError::ImageSynthesis(_)));
    }

    #[tokio::test]
    async fn blank_locator_is_an_error() {
        let generator = FixedGenerator {
            urls: vec!["  ".into()],
        };
        let err = ImageSynthesizer::new(&generator, "dall-e-3")
            .synthesize("A starship...")
            .await
            .unwrap_err();
        assert!(matches!(err, FrescoError::ImageSynthesis(_)));
    }
}
