use fresco_core::{FrescoError, ImageArtifact, PrReference, PublishedComment};

/// Write access to a PR's discussion thread.
pub trait CommentHost {
    /// Create a new comment with `body`; never edits an existing one.
    fn create_comment(
        &self,
        pr: &PrReference,
        body: &str,
    ) -> impl std::future::Future<Output = Result<PublishedComment, FrescoError>>;
}

/// Render the markdown comment body: the image embed with the prompt as alt
/// text, newlines escaped so the alt text stays on one line.
///
/// # Examples
///
/// ```
/// use fresco_pipeline::publish::render_comment_body;
///
/// let body = render_comment_body("A starship...", "https://img/1");
/// assert_eq!(body, "![A starship...](https://img/1)");
/// ```
pub fn render_comment_body(prompt: &str, url: &str) -> String {
    let alt_text = prompt.replace('\n', "\\n");
    format!("![{alt_text}]({url})")
}

/// Final pipeline stage: post the artifact onto the PR.
pub struct Publisher<'a, H> {
    host: &'a H,
}

impl<'a, H: CommentHost> Publisher<'a, H> {
    /// Create a publisher backed by `host`.
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Submit the rendered comment.
    ///
    /// Repeated invocations on the same PR produce multiple comments; nothing
    /// is deduplicated, and a failed submission is not retried or persisted.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::Publish`] from the underlying host.
    pub async fn publish(
        &self,
        pr: &PrReference,
        artifact: &ImageArtifact,
        prompt: &str,
    ) -> Result<PublishedComment, FrescoError> {
        let body = render_comment_body(prompt, &artifact.url);
        self.host.create_comment(pr, &body).await
    }
}
