use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".pr-reviewer.toml";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-reviewer.toml.
/// All fields are optional; a collaborator without credentials simply
/// reports itself unauthenticated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// GitHub (source control) settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Jira (ticket tracker) settings
    #[serde(default)]
    pub jira: JiraConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// REST API root, defaults to https://api.github.com
    pub api_url: Option<String>,
    /// Repository to review PRs in, as "owner/repo".
    /// If None, falls back to GITHUB_REPOSITORY env var.
    pub repository: Option<String>,
}

impl GitHubConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_GITHUB_API_URL)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraConfig {
    /// Site root, e.g. "https://company.atlassian.net". Falls back to JIRA_BASE_URL.
    pub base_url: Option<String>,
    /// Account email. Falls back to JIRA_EMAIL.
    pub email: Option<String>,
    /// API token. Falls back to JIRA_API_TOKEN.
    pub api_token: Option<String>,
}

impl Config {
    /// Load configuration from .pr-reviewer.toml in the current directory,
    /// then fill unset fields from the environment.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        config.fill_from_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Fill every field the file left unset from `lookup`, keyed by
    /// environment variable name. File values take precedence.
    pub fn fill_from_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fill = |field: &mut Option<String>, name: &str| {
            if field.is_none() {
                *field = lookup(name).filter(|value| !value.trim().is_empty());
            }
        };

        fill(&mut self.github.token, "GITHUB_TOKEN");
        fill(&mut self.github.repository, "GITHUB_REPOSITORY");
        fill(&mut self.jira.base_url, "JIRA_BASE_URL");
        fill(&mut self.jira.email, "JIRA_EMAIL");
        fill(&mut self.jira.api_token, "JIRA_API_TOKEN");
    }
}
