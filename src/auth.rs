use tracing::{info, instrument, warn};

use crate::pr::SourceControl;
use crate::ticket::TicketTracker;

pub const SOURCE_CONTROL_DIAGNOSTIC: &str =
    "Source control not authenticated: set GITHUB_TOKEN or [github] token in .pr-reviewer.toml";
pub const TRACKER_DIAGNOSTIC: &str =
    "Ticket tracker not authenticated: set JIRA_BASE_URL, JIRA_EMAIL and JIRA_API_TOKEN";

/// Result of checking both collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStatus {
    pub source_control_ok: bool,
    pub tracker_ok: bool,
    /// One line per failed check, source control first
    pub diagnostics: Vec<String>,
}

/// Check both collaborators concurrently. Always returns; each check runs to
/// completion whatever the other's result.
#[instrument(skip_all)]
pub async fn probe(source_control: &dyn SourceControl, tracker: &dyn TicketTracker) -> AuthStatus {
    let (source_control_ok, tracker_ok) =
        tokio::join!(source_control.auth_status(), tracker.auth_status());

    let mut diagnostics = Vec::new();
    if source_control_ok {
        info!("source control authenticated");
    } else {
        warn!("source control not authenticated");
        diagnostics.push(SOURCE_CONTROL_DIAGNOSTIC.to_string());
    }
    if tracker_ok {
        info!("ticket tracker authenticated");
    } else {
        warn!("ticket tracker not authenticated");
        diagnostics.push(TRACKER_DIAGNOSTIC.to_string());
    }

    AuthStatus {
        source_control_ok,
        tracker_ok,
        diagnostics,
    }
}
