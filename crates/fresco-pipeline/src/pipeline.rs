use std::fmt;

use fresco_core::{FrescoConfig, FrescoError, PrReference, PublishedComment};
use serde::Serialize;

use crate::content::{ContentSource, PrContentHost};
use crate::image::{ImageGenerator, ImageSynthesizer};
use crate::prompt::{PromptSynthesizer, TextCompleter};
use crate::publish::{CommentHost, Publisher};

/// Pipeline progress states, in order.
///
/// A run advances `Idle → ContentFetched → PromptReady → ImageReady →
/// Published`; the terminal failure state is the `Err` side of
/// [`Pipeline::run`], reachable from any non-terminal state.
///
/// # Examples
///
/// ```
/// use fresco_pipeline::pipeline::Stage;
///
/// assert_eq!(Stage::Idle.advance(), Stage::ContentFetched);
/// assert_eq!(Stage::Published.advance(), Stage::Published);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Nothing has run yet.
    Idle,
    /// Content aggregated and non-empty.
    ContentFetched,
    /// Image prompt synthesized and non-blank.
    PromptReady,
    /// Image reference obtained and well-formed.
    ImageReady,
    /// Comment posted; terminal success.
    Published,
}

impl Stage {
    /// The next state; `Published` is terminal and advances to itself.
    pub fn advance(self) -> Stage {
        match self {
            Stage::Idle => Stage::ContentFetched,
            Stage::ContentFetched => Stage::PromptReady,
            Stage::PromptReady => Stage::ImageReady,
            Stage::ImageReady | Stage::Published => Stage::Published,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ContentFetched => "content-fetched",
            Stage::PromptReady => "prompt-ready",
            Stage::ImageReady => "image-ready",
            Stage::Published => "published",
        };
        write!(f, "{name}")
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Terminal state; always [`Stage::Published`] on the `Ok` path.
    pub stage: Stage,
    /// The prompt the image was generated from.
    pub prompt: String,
    /// Locator of the generated image.
    pub image_url: String,
    /// The comment created on the PR.
    pub comment: PublishedComment,
}

/// Orchestrator for the four-stage run: content aggregation, prompt
/// synthesis, image synthesis, publication.
///
/// Stages execute strictly sequentially over immutable values; each stage's
/// output is guarded before the next stage runs, and the first failure is
/// surfaced verbatim with no internal retry.
pub struct Pipeline<'a, H, C, G> {
    host: &'a H,
    completer: &'a C,
    generator: &'a G,
    config: &'a FrescoConfig,
}

impl<'a, H, C, G> Pipeline<'a, H, C, G>
where
    H: PrContentHost + CommentHost,
    C: TextCompleter,
    G: ImageGenerator,
{
    /// Assemble a pipeline from its collaborators and configuration.
    pub fn new(host: &'a H, completer: &'a C, generator: &'a G, config: &'a FrescoConfig) -> Self {
        Self {
            host,
            completer,
            generator,
            config,
        }
    }

    /// Execute one full run against `pr`.
    ///
    /// # Errors
    ///
    /// Fails fast with the first stage error: [`FrescoError::ContentFetch`]
    /// (including a PR with no usable text), [`FrescoError::PromptSynthesis`],
    /// [`FrescoError::ImageSynthesis`], or [`FrescoError::Publish`]. Later
    /// stages are never invoked after a failure.
    pub async fn run(&self, pr: &PrReference) -> Result<RunReport, FrescoError> {
        let mut stage = Stage::Idle;

        let bundle = ContentSource::new(self.host).fetch(pr).await?;
        if bundle.is_blank() {
            return Err(FrescoError::ContentFetch(format!(
                "{pr} has no usable comment or commit text"
            )));
        }
        stage = stage.advance();

        let prompt = PromptSynthesizer::new(
            self.completer,
            &self.config.generation,
            &self.config.openai,
        )
        .synthesize(&bundle)
        .await?;
        stage = stage.advance();

        let artifact = ImageSynthesizer::new(self.generator, &self.config.openai.image_model)
            .synthesize(&prompt)
            .await?;
        stage = stage.advance();

        let comment = Publisher::new(self.host).publish(pr, &artifact, &prompt).await?;
        stage = stage.advance();
        debug_assert_eq!(stage, Stage::Published);

        Ok(RunReport {
            stage,
            prompt,
            image_url: artifact.url,
            comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_in_order_and_terminate() {
        let mut stage = Stage::Idle;
        let expected = [
            Stage::ContentFetched,
            Stage::PromptReady,
            Stage::ImageReady,
            Stage::Published,
            Stage::Published,
        ];
        for want in expected {
            stage = stage.advance();
            assert_eq!(stage, want);
        }
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Idle.to_string(), "idle");
        assert_eq!(Stage::ContentFetched.to_string(), "content-fetched");
        assert_eq!(Stage::PromptReady.to_string(), "prompt-ready");
        assert_eq!(Stage::ImageReady.to_string(), "image-ready");
        assert_eq!(Stage::Published.to_string(), "published");
    }

    #[test]
    fn stage_serializes_kebab_case() {
        let json = serde_json::to_string(&Stage::ContentFetched).unwrap();
        assert_eq!(json, "\"content-fetched\"");
    }
}
