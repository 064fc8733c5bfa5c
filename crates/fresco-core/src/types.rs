use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FrescoError;

/// Coordinates of a pull request on the hosting system.
///
/// Immutable once constructed; the number is always positive.
///
/// # Examples
///
/// ```
/// use fresco_core::PrReference;
///
/// let pr: PrReference = "octocat/hello-world#42".parse().unwrap();
/// assert_eq!(pr.owner, "octocat");
/// assert_eq!(pr.repo, "hello-world");
/// assert_eq!(pr.number, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrReference {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number (positive).
    pub number: u64,
}

impl PrReference {
    /// Build a reference from the GitHub Actions environment surface:
    /// `GITHUB_REPOSITORY` (`owner/repo`) and `PULL_REQUEST_NUMBER`.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::Config`] if the repository is not `owner/repo`
    /// or the number is not a positive integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use fresco_core::PrReference;
    ///
    /// let pr = PrReference::from_env_parts("octocat/hello-world", "7").unwrap();
    /// assert_eq!(pr.number, 7);
    /// ```
    pub fn from_env_parts(repository: &str, number: &str) -> Result<Self, FrescoError> {
        let Some((owner, repo)) = repository.split_once('/') else {
            return Err(FrescoError::Config(format!(
                "invalid repository '{repository}', expected owner/repo"
            )));
        };
        if owner.is_empty() || repo.is_empty() {
            return Err(FrescoError::Config(format!(
                "invalid repository '{repository}', expected owner/repo"
            )));
        }
        let number: u64 = number
            .trim()
            .parse()
            .map_err(|_| FrescoError::Config(format!("invalid PR number: {number}")))?;
        if number == 0 {
            return Err(FrescoError::Config("PR number must be positive".into()));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

impl fmt::Display for PrReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

impl FromStr for PrReference {
    type Err = FrescoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((owner_repo, number_str)) = s.split_once('#') else {
            return Err(FrescoError::Config(format!(
                "invalid PR reference '{s}', expected owner/repo#number"
            )));
        };
        PrReference::from_env_parts(owner_repo, number_str)
    }
}

/// Where a content fragment came from.
///
/// # Examples
///
/// ```
/// use fresco_core::ContentOrigin;
///
/// let json = serde_json::to_string(&ContentOrigin::CommitMessage).unwrap();
/// assert_eq!(json, "\"commit-message\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentOrigin {
    /// A discussion comment on the PR's issue thread.
    Comment,
    /// A commit message from the PR's commit list.
    CommitMessage,
}

/// One textual artifact fetched from the PR, tagged with its origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFragment {
    /// Source of the text.
    pub origin: ContentOrigin,
    /// Raw text as returned by the host.
    pub text: String,
}

/// Ordered textual artifacts aggregated from a PR.
///
/// Comments always precede commit messages, each group in host-returned
/// order. Produced by the content stage, consumed once by prompt synthesis.
///
/// # Examples
///
/// ```
/// use fresco_core::ContentBundle;
///
/// let bundle = ContentBundle::from_parts(
///     vec!["great work".into(), "LGTM".into()],
///     vec!["fix bug".into()],
/// );
/// assert_eq!(bundle.combined(), "great work LGTM fix bug");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    /// Fragments in pipeline order: comments first, then commit messages.
    pub fragments: Vec<ContentFragment>,
}

impl ContentBundle {
    /// Assemble a bundle from comment bodies and commit messages, preserving
    /// the order each sequence arrived in.
    pub fn from_parts(comments: Vec<String>, commit_messages: Vec<String>) -> Self {
        let fragments = comments
            .into_iter()
            .map(|text| ContentFragment {
                origin: ContentOrigin::Comment,
                text,
            })
            .chain(commit_messages.into_iter().map(|text| ContentFragment {
                origin: ContentOrigin::CommitMessage,
                text,
            }))
            .collect();
        Self { fragments }
    }

    /// Flatten the bundle: comments joined with a single space, commit
    /// messages joined with a single space, the two groups joined with a
    /// single space (comments first).
    ///
    /// # Examples
    ///
    /// ```
    /// use fresco_core::ContentBundle;
    ///
    /// let bundle = ContentBundle::from_parts(vec!["a".into()], vec!["b".into(), "c".into()]);
    /// assert_eq!(bundle.combined(), "a b c");
    /// ```
    pub fn combined(&self) -> String {
        let join = |origin: ContentOrigin| {
            self.fragments
                .iter()
                .filter(|f| f.origin == origin)
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let comments = join(ContentOrigin::Comment);
        let commits = join(ContentOrigin::CommitMessage);
        format!("{comments} {commits}")
    }

    /// `true` when the flattened text contains no non-whitespace characters.
    ///
    /// A PR with no comments and no commits still combines to a single
    /// space, so the emptiness guard trims first.
    pub fn is_blank(&self) -> bool {
        self.combined().trim().is_empty()
    }
}

/// A resolvable reference to a generated image.
///
/// Terminal value of the image stage; never transformed further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageArtifact {
    /// Dereferenceable locator returned by the image provider.
    pub url: String,
}

/// A comment created on the PR's discussion thread.
///
/// Write-once: there is no update or delete path, and repeated runs create
/// additional comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedComment {
    /// Identity assigned by the hosting system.
    pub id: u64,
    /// Markdown body that was submitted.
    pub body: String,
    /// Browser URL of the comment, when the host reports one.
    pub html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_pr_reference() {
        let pr: PrReference = "rust-lang/rust#12345".parse().unwrap();
        assert_eq!(pr.owner, "rust-lang");
        assert_eq!(pr.repo, "rust");
        assert_eq!(pr.number, 12345);
    }

    #[test]
    fn parse_pr_reference_missing_hash() {
        let err = "owner/repo".parse::<PrReference>().unwrap_err();
        assert!(matches!(err, FrescoError::Config(_)));
    }

    #[test]
    fn parse_pr_reference_missing_slash() {
        assert!("repo#123".parse::<PrReference>().is_err());
    }

    #[test]
    fn parse_pr_reference_invalid_number() {
        assert!("owner/repo#abc".parse::<PrReference>().is_err());
    }

    #[test]
    fn parse_pr_reference_rejects_zero() {
        assert!("owner/repo#0".parse::<PrReference>().is_err());
    }

    #[test]
    fn from_env_parts_rejects_bare_repository() {
        assert!(PrReference::from_env_parts("just-a-repo", "5").is_err());
        assert!(PrReference::from_env_parts("/repo", "5").is_err());
        assert!(PrReference::from_env_parts("owner/", "5").is_err());
    }

    #[test]
    fn pr_parse_failures_are_config_errors() {
        let err = PrReference::from_env_parts("owner/repo", "abc").unwrap_err();
        assert!(matches!(err, FrescoError::Config(_)));
        assert_eq!(err.stage(), "setup");
    }

    #[test]
    fn pr_reference_display_roundtrips() {
        let pr: PrReference = "octocat/hello-world#42".parse().unwrap();
        assert_eq!(pr.to_string(), "octocat/hello-world#42");
    }

    #[test]
    fn bundle_preserves_host_order() {
        let bundle = ContentBundle::from_parts(
            vec!["first".into(), "second".into()],
            vec!["m1".into(), "m2".into()],
        );
        assert_eq!(bundle.combined(), "first second m1 m2");
        assert_eq!(bundle.fragments[0].origin, ContentOrigin::Comment);
        assert_eq!(bundle.fragments[2].origin, ContentOrigin::CommitMessage);
    }

    #[test]
    fn bundle_with_no_fragments_is_blank() {
        let bundle = ContentBundle::from_parts(vec![], vec![]);
        // The verbatim join is a single space; the guard trims.
        assert_eq!(bundle.combined(), " ");
        assert!(bundle.is_blank());
    }

    #[test]
    fn bundle_with_only_commits_keeps_verbatim_join() {
        let bundle = ContentBundle::from_parts(vec![], vec!["fix bug".into()]);
        assert_eq!(bundle.combined(), " fix bug");
        assert!(!bundle.is_blank());
    }

    #[test]
    fn bundle_with_whitespace_comments_is_blank() {
        let bundle = ContentBundle::from_parts(vec!["   ".into()], vec![]);
        assert!(bundle.is_blank());
    }

    #[test]
    fn fragment_serializes_kebab_case_origin() {
        let fragment = ContentFragment {
            origin: ContentOrigin::CommitMessage,
            text: "fix bug".into(),
        };
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json["origin"], "commit-message");
    }
}
