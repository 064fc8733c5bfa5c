use fresco_core::{FrescoError, PrReference, PublishedComment};
use serde::Deserialize;

use crate::content::PrContentHost;
use crate::publish::CommentHost;

const PER_PAGE: usize = 100;

/// GitHub client for reading PR discussion content and posting comments.
///
/// Read paths go through plain REST calls so pagination stays explicit;
/// the write path uses octocrab's authenticated POST.
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
    http: reqwest::Client,
    token: String,
}

#[derive(Deserialize)]
struct IssueComment {
    body: Option<String>,
}

#[derive(Deserialize)]
struct PullCommit {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    message: String,
}

impl GitHubClient {
    /// Create a client from an explicit token or the `GITHUB_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::Config`] if no token is available or the client
    /// cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fresco_pipeline::github::GitHubClient;
    ///
    /// let client = GitHubClient::new(Some("ghp_xxxx")).unwrap();
    /// ```
    pub fn new(token: Option<&str>) -> Result<Self, FrescoError> {
        let token = match token {
            Some(t) => t.to_string(),
            None => std::env::var("GITHUB_TOKEN").map_err(|_| {
                FrescoError::Config(
                    "GITHUB_TOKEN not set. Pass --github-token or set GITHUB_TOKEN env var".into(),
                )
            })?,
        };

        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token.clone())
            .build()
            .map_err(|e| FrescoError::Config(format!("failed to create GitHub client: {e}")))?;

        let http = reqwest::Client::new();

        Ok(Self {
            octocrab,
            http,
            token,
        })
    }

    /// Fetch one page of a paginated listing endpoint.
    async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<Vec<T>, FrescoError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "fresco")
            .send()
            .await
            .map_err(|e| FrescoError::ContentFetch(format!("failed to fetch {what}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FrescoError::ContentFetch(format!(
                "GitHub API error {status} fetching {what}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FrescoError::ContentFetch(format!("failed to parse {what}: {e}")))
    }

    /// Exhaust every page of `base_url`, which must accept `per_page`/`page`
    /// query parameters.
    async fn get_all_pages<T: serde::de::DeserializeOwned>(
        &self,
        base_url: &str,
        what: &str,
    ) -> Result<Vec<T>, FrescoError> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let url = format!("{base_url}?per_page={PER_PAGE}&page={page}");
            let batch: Vec<T> = self.get_page(&url, what).await?;
            let count = batch.len();
            items.extend(batch);
            if count < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}

impl PrContentHost for GitHubClient {
    /// List all discussion comment bodies on the PR's issue thread, in
    /// host-returned (insertion) order.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::ContentFetch`] on network or API errors.
    async fn list_comments(&self, pr: &PrReference) -> Result<Vec<String>, FrescoError> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/issues/{}/comments",
            pr.owner, pr.repo, pr.number
        );
        let comments: Vec<IssueComment> = self.get_all_pages(&url, "PR comments").await?;
        Ok(comments.into_iter().filter_map(|c| c.body).collect())
    }

    /// List all commit messages belonging to the PR, in host-returned order.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::ContentFetch`] on network or API errors.
    async fn list_commits(&self, pr: &PrReference) -> Result<Vec<String>, FrescoError> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/pulls/{}/commits",
            pr.owner, pr.repo, pr.number
        );
        let commits: Vec<PullCommit> = self.get_all_pages(&url, "PR commits").await?;
        Ok(commits.into_iter().map(|c| c.commit.message).collect())
    }
}

impl CommentHost for GitHubClient {
    /// Create a new comment on the PR's discussion thread.
    ///
    /// Always creates; never edits or deduplicates against prior runs.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::Publish`] on API errors or an unexpected
    /// response shape.
    async fn create_comment(
        &self,
        pr: &PrReference,
        body: &str,
    ) -> Result<PublishedComment, FrescoError> {
        let route = format!(
            "/repos/{}/{}/issues/{}/comments",
            pr.owner, pr.repo, pr.number
        );
        let payload = serde_json::json!({ "body": body });

        let response: serde_json::Value = self
            .octocrab
            .post(route, Some(&payload))
            .await
            .map_err(|e| FrescoError::Publish(format!("failed to post comment: {e}")))?;

        let id = response
            .get("id")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                FrescoError::Publish(format!("unexpected comment response: {response}"))
            })?;
        let html_url = response
            .get("html_url")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(PublishedComment {
            id,
            body: body.to_string(),
            html_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_body_field_is_optional() {
        let parsed: IssueComment = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(parsed.body.is_none());

        let parsed: IssueComment = serde_json::from_str(r#"{"body": "LGTM"}"#).unwrap();
        assert_eq!(parsed.body.as_deref(), Some("LGTM"));
    }

    #[test]
    fn pull_commit_parses_nested_message() {
        let json = r#"{"sha": "abc", "commit": {"message": "fix bug", "author": {}}}"#;
        let parsed: PullCommit = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.commit.message, "fix bug");
    }

    #[tokio::test]
    async fn client_requires_a_token() {
        // Only meaningful when the environment has no ambient token.
        if std::env::var("GITHUB_TOKEN").is_err() {
            assert!(GitHubClient::new(None).is_err());
        }
        assert!(GitHubClient::new(Some("ghp_test")).is_ok());
    }
}
