use fresco_core::{ContentBundle, FrescoError, PrReference};

/// Read-only access to a PR's discussion comments and commit messages.
///
/// Implementations must return items in host order and exhaust pagination
/// before returning.
pub trait PrContentHost {
    /// All discussion comment bodies on the PR's issue thread, oldest first.
    fn list_comments(
        &self,
        pr: &PrReference,
    ) -> impl std::future::Future<Output = Result<Vec<String>, FrescoError>>;

    /// All commit messages belonging to the PR, in host-returned order.
    fn list_commits(
        &self,
        pr: &PrReference,
    ) -> impl std::future::Future<Output = Result<Vec<String>, FrescoError>>;
}

/// First pipeline stage: aggregate the PR's raw text into a [`ContentBundle`].
pub struct ContentSource<'a, H> {
    host: &'a H,
}

impl<'a, H: PrContentHost> ContentSource<'a, H> {
    /// Create a source backed by `host`.
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Fetch comments then commits and bundle them in that order.
    ///
    /// If either sub-fetch fails the whole bundle is abandoned; partial
    /// results are never returned.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::ContentFetch`] from the underlying host.
    pub async fn fetch(&self, pr: &PrReference) -> Result<ContentBundle, FrescoError> {
        let comments = self.host.list_comments(pr).await?;
        let commit_messages = self.host.list_commits(pr).await?;
        Ok(ContentBundle::from_parts(comments, commit_messages))
    }
}
