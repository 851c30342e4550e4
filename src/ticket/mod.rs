pub mod fake;
pub mod jira;

pub use fake::FakeTicketTracker;
pub use jira::JiraClient;

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Jira API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Ticket not found: {0}")]
    NotFound(String),

    #[error("Jira base URL, email and API token are required")]
    MissingCredentials,
}

/// Ticket details shown in the review.
///
/// Either resolved from the tracker or a placeholder built when the tracker
/// could not be asked; both have the same shape and only the summary and
/// status tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketInfo {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub status: String,
    pub url: String,
    pub acceptance_criteria: Option<String>,
}

impl TicketInfo {
    /// Stand-in for a ticket whose fetch failed.
    pub fn fetch_failed(key: &str, url: String) -> TicketInfo {
        TicketInfo {
            key: key.to_string(),
            summary: format!("Ticket {key} (tracker access failed)"),
            description: format!("View ticket at: {url}"),
            status: "Unknown".to_string(),
            url,
            acceptance_criteria: None,
        }
    }

    /// Stand-in for a ticket that was not fetched because the tracker is
    /// not authenticated.
    pub fn auth_required(key: &str, url: String) -> TicketInfo {
        TicketInfo {
            key: key.to_string(),
            summary: format!("{key} (auth required for details)"),
            description: "Tracker authentication required for full details".to_string(),
            status: "Unknown".to_string(),
            url,
            acceptance_criteria: None,
        }
    }
}

/// Issue-tracker collaborator the review pipeline resolves tickets from.
#[async_trait]
pub trait TicketTracker: Send + Sync {
    /// Whether the tracker is reachable and authenticated. Never fails.
    async fn auth_status(&self) -> bool;

    async fn fetch_ticket(&self, key: &str) -> Result<TicketInfo, TicketError>;

    /// Web URL of the ticket, used in placeholder records.
    fn browse_url(&self, key: &str) -> String;
}

/// First ticket key (`[A-Z]+-[0-9]+`, e.g. "PAB-2197") in `text`.
pub fn extract_ticket_key(text: &str) -> Option<&str> {
    static TICKET_KEY: OnceLock<Regex> = OnceLock::new();
    let re = TICKET_KEY.get_or_init(|| Regex::new(r"[A-Z]+-[0-9]+").expect("ticket key regex compiles"));
    re.find(text).map(|m| m.as_str())
}

/// First ticket key found across `candidates`, tried in order.
pub fn find_ticket_key<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|&candidate| extract_ticket_key(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_branch_name() {
        assert_eq!(extract_ticket_key("feat/PAB-2197-fix-bug"), Some("PAB-2197"));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_ticket_key("no ticket here"), None);
        assert_eq!(extract_ticket_key(""), None);
        assert_eq!(extract_ticket_key("ABC-"), None);
        assert_eq!(extract_ticket_key("abc-123"), None);
        assert_eq!(extract_ticket_key("ABC123"), None);
    }

    #[test]
    fn test_extract_first_match_only() {
        assert_eq!(extract_ticket_key("XYZ-9 and ABC-10"), Some("XYZ-9"));
    }

    #[test]
    fn test_extract_skips_non_matching_capitals() {
        assert_eq!(extract_ticket_key("README update for OPS-42"), Some("OPS-42"));
        assert_eq!(extract_ticket_key("feature/Pab-1 CORE-77"), Some("CORE-77"));
        assert_eq!(extract_ticket_key("über ab-1 AB-12x"), Some("AB-12"));
    }

    #[test]
    fn test_find_in_priority_order() {
        assert_eq!(
            find_ticket_key(&["feature/login", "XYZ-9 login", "Closes ABC-1"]),
            Some("XYZ-9")
        );
        assert_eq!(
            find_ticket_key(&["feat/ABC-1", "XYZ-9 login", ""]),
            Some("ABC-1")
        );
        assert_eq!(find_ticket_key(&["main", "Tidy up", ""]), None);
    }

    #[test]
    fn test_placeholders() {
        let failed = TicketInfo::fetch_failed("ABC-1", "https://jira.example.com/browse/ABC-1".to_string());
        assert_eq!(failed.summary, "Ticket ABC-1 (tracker access failed)");
        assert_eq!(failed.description, "View ticket at: https://jira.example.com/browse/ABC-1");
        assert_eq!(failed.status, "Unknown");

        let unauthenticated = TicketInfo::auth_required("ABC-1", String::new());
        assert_eq!(unauthenticated.summary, "ABC-1 (auth required for details)");
        assert!(unauthenticated.acceptance_criteria.is_none());
    }
}
