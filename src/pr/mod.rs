pub mod diff;
pub mod fake;
pub mod github;
pub mod types;

pub use fake::FakeSourceControl;
pub use github::GitHubClient;
pub use types::{PullRequestInfo, Repository};

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Pull request not found: {0}")]
    NotFound(String),

    #[error("GitHub token not found in config or environment")]
    MissingToken,

    #[error("Repository not configured; pass --repo owner/repo or set [github] repository")]
    MissingRepository,

    #[error("Invalid repository {0:?}, expected owner/repo")]
    InvalidRepository(String),

    #[error("Source control rejected the credentials")]
    Unauthenticated,
}

/// Source-control collaborator the review pipeline reads pull requests from.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Whether the collaborator is reachable and authenticated.
    /// Implementations swallow their own errors and answer `false`.
    async fn auth_status(&self) -> bool;

    /// Fetch metadata and diff for a normalized identifier (see [`normalize`]).
    async fn fetch_pull_request(&self, id: &str) -> Result<PullRequestInfo, PrError>;
}

/// Canonicalize a user-supplied PR reference.
///
/// - a web URL containing `/<owner>/<repo>/pull/<digits>` gives the digits,
///   with or without a scheme
/// - `#<digits>` gives the digits
/// - anything else (bare numbers, branch names) is returned unchanged
pub fn normalize(reference: &str) -> String {
    if let Some((_, number)) = pull_url_parts(reference) {
        return number;
    }

    if let Some(digits) = reference.strip_prefix('#') {
        if is_digits(digits) {
            return digits.to_string();
        }
    }

    reference.to_string()
}

/// Repository named by a PR web URL (`https://host/{owner}/{repo}/pull/{n}`),
/// if the reference is one.
pub fn repository_from_url(reference: &str) -> Option<Repository> {
    pull_url_parts(reference).map(|(repository, _)| repository)
}

fn pull_url_parts(reference: &str) -> Option<(Repository, String)> {
    static PULL_URL: OnceLock<Regex> = OnceLock::new();
    let re = PULL_URL.get_or_init(|| {
        Regex::new(r"(?:^|/)([^/\s]+)/([^/\s]+)/pull/(\d+)(?:[/?#]|$)").expect("pull URL regex compiles")
    });
    let caps = re.captures(reference.trim())?;
    Some((
        Repository {
            owner: caps[1].to_string(),
            name: caps[2].to_string(),
        },
        caps[3].to_string(),
    ))
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pull_url() {
        assert_eq!(normalize("https://host/org/repo/pull/2125/files"), "2125");
        assert_eq!(normalize("https://github.com/org/repo/pull/42"), "42");
        assert_eq!(normalize("https://github.com/org/repo/pull/42?diff=split"), "42");
    }

    #[test]
    fn test_normalize_pull_url_without_scheme() {
        assert_eq!(normalize("github.com/org/repo/pull/2125/files"), "2125");
        assert_eq!(normalize("  github.com/org/repo/pull/7  "), "7");
    }

    #[test]
    fn test_normalize_hash_number() {
        assert_eq!(normalize("#2125"), "2125");
    }

    #[test]
    fn test_normalize_passes_through() {
        assert_eq!(normalize("feat/ABC-1"), "feat/ABC-1");
        assert_eq!(normalize("2125"), "2125");
        assert_eq!(normalize("#abc"), "#abc");
        assert_eq!(normalize("#"), "#");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_url_without_numeric_pull() {
        let url = "https://github.com/org/repo/pulls/42";
        assert_eq!(normalize(url), url);
        let url = "https://github.com/org/repo/pull/new-branch";
        assert_eq!(normalize(url), url);
        let url = "https://github.com/org/repo/pull/42abc";
        assert_eq!(normalize(url), url);
    }

    #[test]
    fn test_repository_from_url() {
        let repo = repository_from_url("https://github.com/org/service/pull/7/files").unwrap();
        assert_eq!(repo.to_string(), "org/service");
        let repo = repository_from_url("github.com/org/service/pull/7").unwrap();
        assert_eq!(repo.to_string(), "org/service");
        assert!(repository_from_url("#7").is_none());
        assert!(repository_from_url("feat/ABC-1").is_none());
    }
}
