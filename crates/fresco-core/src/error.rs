/// Errors that can occur across the Fresco pipeline.
///
/// Each variant maps to one pipeline stage (or to setup before the pipeline
/// starts). Library crates use this type directly; the binary crate reports
/// it through `miette` at the boundary, which the [`miette::Diagnostic`]
/// derive makes a plain `?` conversion.
///
/// # Examples
///
/// ```
/// use fresco_core::FrescoError;
///
/// let err = FrescoError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum FrescoError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration before the pipeline starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// Comment or commit retrieval failed, or the PR had nothing usable.
    #[error("content fetch error: {0}")]
    ContentFetch(String),

    /// Completion call failed or returned no usable text.
    #[error("prompt synthesis error: {0}")]
    PromptSynthesis(String),

    /// Image call failed or returned no usable locator.
    #[error("image synthesis error: {0}")]
    ImageSynthesis(String),

    /// Comment submission failed.
    #[error("publish error: {0}")]
    Publish(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FrescoError {
    /// Name of the pipeline stage this error belongs to, for diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use fresco_core::FrescoError;
    ///
    /// let err = FrescoError::ImageSynthesis("no image entries".into());
    /// assert_eq!(err.stage(), "image-synthesis");
    /// ```
    pub fn stage(&self) -> &'static str {
        match self {
            FrescoError::ContentFetch(_) => "content-fetch",
            FrescoError::PromptSynthesis(_) => "prompt-synthesis",
            FrescoError::ImageSynthesis(_) => "image-synthesis",
            FrescoError::Publish(_) => "publish",
            _ => "setup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FrescoError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = FrescoError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn converts_into_a_miette_report() {
        let report: miette::Report = FrescoError::Config("missing API key".into()).into();
        assert!(report.to_string().contains("missing API key"));
    }

    #[test]
    fn each_pipeline_variant_names_its_stage() {
        assert_eq!(FrescoError::ContentFetch("x".into()).stage(), "content-fetch");
        assert_eq!(
            FrescoError::PromptSynthesis("x".into()).stage(),
            "prompt-synthesis"
        );
        assert_eq!(
            FrescoError::ImageSynthesis("x".into()).stage(),
            "image-synthesis"
        );
        assert_eq!(FrescoError::Publish("x".into()).stage(), "publish");
        assert_eq!(FrescoError::Config("x".into()).stage(), "setup");
    }
}
