use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{PrError, PullRequestInfo, Repository, SourceControl};
use crate::config::GitHubConfig;

const USER_AGENT: &str = "pr-reviewer";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.diff";

/// Live source-control collaborator backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
    repository: Option<Repository>,
}

#[derive(Deserialize)]
struct PullResponse {
    title: String,
    body: Option<String>,
    head: HeadRef,
}

#[derive(Deserialize)]
struct HeadRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Deserialize)]
struct PullSummary {
    number: u64,
}

impl GitHubClient {
    /// Build a client from the `[github]` config section.
    ///
    /// A missing token or repository is not an error here: the client then
    /// reports itself unauthenticated, or fails the fetch, respectively.
    pub fn from_config(config: &GitHubConfig) -> Result<GitHubClient, PrError> {
        let repository = config
            .repository
            .as_deref()
            .map(|value| {
                Repository::parse(value).ok_or_else(|| PrError::InvalidRepository(value.to_string()))
            })
            .transpose()?;

        Ok(GitHubClient {
            http: reqwest::Client::new(),
            api_url: config.api_url().trim_end_matches('/').to_string(),
            token: config.token.clone(),
            repository,
        })
    }

    fn get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{}", self.api_url, path))
            .header("User-Agent", USER_AGENT)
            .bearer_auth(token)
    }

    /// Resolve a PR number from a normalized identifier: numbers are used as
    /// is, anything else is looked up as a head branch name.
    async fn resolve_number(
        &self,
        id: &str,
        repository: &Repository,
        token: &str,
    ) -> Result<u64, PrError> {
        if let Ok(number) = id.parse::<u64>() {
            return Ok(number);
        }

        debug!(branch = %id, "looking up PR by head branch");
        let head = format!("{}:{}", repository.owner, id);
        let pulls = self
            .get(
                &format!("/repos/{}/{}/pulls", repository.owner, repository.name),
                token,
            )
            .header("Accept", JSON_MEDIA_TYPE)
            .query(&[("head", head.as_str()), ("state", "all")])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<PullSummary>>()
            .await?;

        pulls
            .first()
            .map(|pull| pull.number)
            .ok_or_else(|| PrError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl SourceControl for GitHubClient {
    async fn auth_status(&self) -> bool {
        let Some(token) = self.token.as_deref() else {
            debug!("no GitHub token configured");
            return false;
        };

        let response = self
            .get("/user", token)
            .header("Accept", JSON_MEDIA_TYPE)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match response {
            Ok(_) => true,
            Err(error) => {
                warn!(%error, "GitHub authentication check failed");
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn fetch_pull_request(&self, id: &str) -> Result<PullRequestInfo, PrError> {
        let token = self.token.as_deref().ok_or(PrError::MissingToken)?;
        let repository = self.repository.as_ref().ok_or(PrError::MissingRepository)?;

        debug!(%repository, "resolving PR");
        let number = self.resolve_number(id, repository, token).await?;
        let path = format!(
            "/repos/{}/{}/pulls/{}",
            repository.owner, repository.name, number
        );

        debug!(number, "fetching PR metadata from GitHub API");
        let response = self
            .get(&path, token)
            .header("Accept", JSON_MEDIA_TYPE)
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(PrError::NotFound(id.to_string())),
            StatusCode::UNAUTHORIZED => return Err(PrError::Unauthenticated),
            _ => {}
        }
        let metadata = response.error_for_status()?.json::<PullResponse>().await?;
        debug!(title = %metadata.title, branch = %metadata.head.name, "received PR metadata");

        debug!("fetching PR diff from GitHub API");
        let diff = self
            .get(&path, token)
            .header("Accept", DIFF_MEDIA_TYPE)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(diff_bytes = diff.len(), "received PR diff");

        Ok(PullRequestInfo {
            title: metadata.title,
            body: metadata.body.unwrap_or_default(),
            head_branch: metadata.head.name,
            diff,
        })
    }
}
