use crate::report::Finding;
use crate::ticket::TicketInfo;

/// Where a review is in its lifecycle. Reviews only move forward through
/// these in declaration order, or drop to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Start,
    AuthChecked,
    PrFetched,
    TicketResolved,
    Analyzed,
    Done,
    Failed,
}

impl ReviewState {
    /// The state a successful stage moves to, if any.
    pub fn next(self) -> Option<ReviewState> {
        match self {
            ReviewState::Start => Some(ReviewState::AuthChecked),
            ReviewState::AuthChecked => Some(ReviewState::PrFetched),
            ReviewState::PrFetched => Some(ReviewState::TicketResolved),
            ReviewState::TicketResolved => Some(ReviewState::Analyzed),
            ReviewState::Analyzed => Some(ReviewState::Done),
            ReviewState::Done | ReviewState::Failed => None,
        }
    }
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewState::Start => write!(f, "START"),
            ReviewState::AuthChecked => write!(f, "AUTH_CHECKED"),
            ReviewState::PrFetched => write!(f, "PR_FETCHED"),
            ReviewState::TicketResolved => write!(f, "TICKET_RESOLVED"),
            ReviewState::Analyzed => write!(f, "ANALYZED"),
            ReviewState::Done => write!(f, "DONE"),
            ReviewState::Failed => write!(f, "FAILED"),
        }
    }
}

/// What a pipeline stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome<T> {
    /// Stage succeeded with full-fidelity data.
    Ok(T),
    /// Stage produced usable but reduced data; the note says why.
    SoftDegraded(T, String),
    /// Stage cannot produce data and the review must stop.
    Fatal(String),
}

/// Final result of a review. Expected failures end up here too, never as
/// an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// `Done` or `Failed`
    pub state: ReviewState,
    /// Last state reached before `Failed`; None for successful reviews
    pub failed_at: Option<ReviewState>,
    /// Stage-by-stage narrative, ending in the failure line on failure
    pub progress: String,
    /// Rendered review, present once the review is `Done`
    pub report: Option<String>,
    pub ticket: Option<TicketInfo>,
    pub findings: Vec<Finding>,
    /// Notes from every stage that degraded
    pub degradations: Vec<String>,
}

impl ReviewOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == ReviewState::Done
    }

    /// Text handed back to the caller: the progress narrative, followed by
    /// the report when there is one.
    pub fn text(&self) -> String {
        match &self.report {
            Some(report) => format!("{}{}", self.progress, report),
            None => self.progress.clone(),
        }
    }
}
