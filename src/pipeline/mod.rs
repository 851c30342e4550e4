pub mod types;

pub use types::{ReviewOutcome, ReviewState, StageOutcome};

use std::sync::Arc;

use tracing::{debug, info, info_span, instrument, warn, Instrument};

use crate::analysis;
use crate::auth::{self, AuthStatus};
use crate::pr::{self, diff, PullRequestInfo, SourceControl};
use crate::report::{self, Finding};
use crate::ticket::{self, TicketInfo, TicketTracker};

const BANNER: &str = "---- PR Review ----";
const STAGES: usize = 4;
const SOURCE_CONTROL_REQUIRED: &str = "Code review failed: source control authentication is required";
const TRACKER_SKIPPED: &str = "Continuing without ticket tracker details";

/// Reviews pull requests against the two collaborators it was built with.
///
/// The pipeline itself holds no per-review state: every call to [`run`]
/// keeps its own progress and data, so one pipeline can serve concurrent
/// reviews.
///
/// [`run`]: Pipeline::run
pub struct Pipeline {
    source_control: Arc<dyn SourceControl>,
    tracker: Arc<dyn TicketTracker>,
}

/// State and narrative of a single review in progress.
struct Review {
    state: ReviewState,
    failed_at: Option<ReviewState>,
    progress: String,
    degradations: Vec<String>,
}

impl Review {
    fn start() -> Review {
        Review {
            state: ReviewState::Start,
            failed_at: None,
            progress: format!("{}\n\n", BANNER),
            degradations: Vec::new(),
        }
    }

    fn step(&mut self, number: usize, title: &str) {
        self.progress
            .push_str(&format!("**Step {} of {}:** {}\n", number, STAGES, title));
    }

    fn line(&mut self, text: &str) {
        self.progress.push_str(text);
        self.progress.push('\n');
    }

    fn end_step(&mut self) {
        self.progress.push('\n');
    }

    fn advance(&mut self, next: ReviewState) {
        debug_assert_eq!(self.state.next(), Some(next), "review states only move forward");
        debug!(from = %self.state, to = %next, "review state transition");
        self.state = next;
    }

    /// Unwrap a stage result. Degradations are noted and the data kept; a
    /// fatal result moves the review to `Failed` and yields nothing.
    fn settle<T>(&mut self, outcome: StageOutcome<T>) -> Option<T> {
        match outcome {
            StageOutcome::Ok(data) => Some(data),
            StageOutcome::SoftDegraded(data, note) => {
                warn!(%note, state = %self.state, "review degraded");
                self.line(&format!("[warn] {}", note));
                self.degradations.push(note);
                Some(data)
            }
            StageOutcome::Fatal(reason) => {
                warn!(%reason, state = %self.state, "review failed");
                self.line(&format!("[fail] {}", reason));
                self.end_step();
                self.failed_at = Some(self.state);
                self.state = ReviewState::Failed;
                None
            }
        }
    }

    fn finish(
        self,
        ticket: Option<TicketInfo>,
        findings: Vec<Finding>,
        report: Option<String>,
    ) -> ReviewOutcome {
        ReviewOutcome {
            state: self.state,
            failed_at: self.failed_at,
            progress: self.progress,
            report,
            ticket,
            findings,
            degradations: self.degradations,
        }
    }

    fn fail(self) -> ReviewOutcome {
        self.finish(None, Vec::new(), None)
    }
}

impl Pipeline {
    pub fn new(source_control: Arc<dyn SourceControl>, tracker: Arc<dyn TicketTracker>) -> Pipeline {
        Pipeline {
            source_control,
            tracker,
        }
    }

    /// Review the PR named by `pr_ref` (URL, `#N`, number or branch name).
    ///
    /// Never fails: a missing source-control login or an unfetchable PR ends
    /// the review as `Failed` with the narrative so far; tracker problems
    /// only degrade the ticket section.
    #[instrument(skip(self))]
    pub async fn run(&self, pr_ref: &str) -> ReviewOutcome {
        let mut review = Review::start();

        review.step(1, "Verifying authentication status...");
        let outcome = self
            .check_auth(&mut review)
            .instrument(info_span!("stage", name = "auth"))
            .await;
        review.advance(ReviewState::AuthChecked);
        let Some(auth) = review.settle(outcome) else {
            return review.fail();
        };
        review.end_step();

        review.step(2, "Fetching PR info...");
        let outcome = self
            .fetch_pull_request(&mut review, pr_ref)
            .instrument(info_span!("stage", name = "fetch_pr"))
            .await;
        let Some(pull_request) = review.settle(outcome) else {
            return review.fail();
        };
        review.advance(ReviewState::PrFetched);
        review.end_step();

        review.step(3, "Extracting ticket...");
        let outcome = self
            .resolve_ticket(&mut review, &pull_request, auth.tracker_ok)
            .instrument(info_span!("stage", name = "ticket"))
            .await;
        let Some(ticket) = review.settle(outcome) else {
            return review.fail();
        };
        review.advance(ReviewState::TicketResolved);
        review.end_step();

        review.step(4, "Analyzing code changes...");
        let findings = analysis::analyze(&pull_request.diff);
        review.line(&format!("Found {} review comments", findings.len()));
        review.advance(ReviewState::Analyzed);
        review.end_step();

        let rendered = report::render(pr_ref, ticket.as_ref(), &findings);
        review.advance(ReviewState::Done);
        info!(findings = findings.len(), ticket = ?ticket.as_ref().map(|t| &t.key), "review done");
        review.finish(ticket, findings, Some(rendered))
    }

    /// Source control is required; the tracker is optional. Every probe
    /// diagnostic is written to the narrative, in probe order, before the
    /// stage settles.
    async fn check_auth(&self, review: &mut Review) -> StageOutcome<AuthStatus> {
        let status = auth::probe(self.source_control.as_ref(), self.tracker.as_ref()).await;

        if status.source_control_ok {
            review.line("[ok] Source control authenticated");
        }
        if status.tracker_ok {
            review.line("[ok] Ticket tracker authenticated");
        }
        for diagnostic in &status.diagnostics {
            review.line(diagnostic);
        }

        if !status.source_control_ok {
            StageOutcome::Fatal(SOURCE_CONTROL_REQUIRED.to_string())
        } else if !status.tracker_ok {
            StageOutcome::SoftDegraded(status, TRACKER_SKIPPED.to_string())
        } else {
            StageOutcome::Ok(status)
        }
    }

    /// There is no fallback PR data, so any fetch error is fatal.
    async fn fetch_pull_request(
        &self,
        review: &mut Review,
        pr_ref: &str,
    ) -> StageOutcome<PullRequestInfo> {
        let id = pr::normalize(pr_ref);
        debug!(%id, "normalized PR reference");

        match self.source_control.fetch_pull_request(&id).await {
            Ok(pull_request) => {
                review.line(&format!("Found PR: {}", pull_request.title));
                review.line(&format!("Branch: {}", pull_request.head_branch));
                review.line(&format!(
                    "Found {} lines of changes",
                    diff::line_count(&pull_request.diff)
                ));
                StageOutcome::Ok(pull_request)
            }
            Err(error) => StageOutcome::Fatal(format!("Code review failed: {}", error)),
        }
    }

    /// Looks for a ticket key in the branch name, then the title, then the
    /// body. A missing key is not a failure; tracker trouble gives a
    /// placeholder ticket instead of an error.
    async fn resolve_ticket(
        &self,
        review: &mut Review,
        pull_request: &PullRequestInfo,
        tracker_ok: bool,
    ) -> StageOutcome<Option<TicketInfo>> {
        let candidates = [
            pull_request.head_branch.as_str(),
            pull_request.title.as_str(),
            pull_request.body.as_str(),
        ];
        let Some(key) = ticket::find_ticket_key(&candidates) else {
            review.line("No ticket found in PR");
            return StageOutcome::Ok(None);
        };
        review.line(&format!("Found ticket: {}", key));

        if !tracker_ok {
            return StageOutcome::SoftDegraded(
                Some(TicketInfo::auth_required(key, self.tracker.browse_url(key))),
                "Skipping ticket details (ticket tracker not authenticated)".to_string(),
            );
        }

        review.line("Fetching ticket details...");
        match self.tracker.fetch_ticket(key).await {
            Ok(ticket) => {
                review.line(&format!("Ticket loaded: {}", ticket.summary));
                StageOutcome::Ok(Some(ticket))
            }
            Err(error) => StageOutcome::SoftDegraded(
                Some(TicketInfo::fetch_failed(key, self.tracker.browse_url(key))),
                format!("Could not fetch ticket {}: {}", key, error),
            ),
        }
    }
}
