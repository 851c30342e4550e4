use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use pr_reviewer::config::Config;
use pr_reviewer::pr::{self, FakeSourceControl, GitHubClient, PullRequestInfo, SourceControl};
use pr_reviewer::report;
use pr_reviewer::ticket::{FakeTicketTracker, JiraClient, TicketInfo, TicketTracker};
use pr_reviewer::Pipeline;

const MOCK_PR: &str = "#42";

/// PR Reviewer: CLI tool that takes a GitHub Pull Request, finds its Jira
/// ticket and returns a review of the changes.
#[derive(Parser, Debug)]
#[command(name = "pr-reviewer", version, about)]
struct Cli {
    /// Pull request to review: URL, #number, number or branch name
    /// (e.g., https://github.com/org/repo/pull/42)
    ///
    /// Not required when --mock is used.
    pr: Option<String>,

    /// Optional output file path for the review
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Repository as owner/repo; defaults to the one in a PR URL, then config
    #[arg(long)]
    repo: Option<String>,

    /// Use built-in mock collaborators for demo purposes (no tokens needed)
    #[arg(long)]
    r#mock: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (pr_ref, source_control, tracker) = if cli.r#mock {
        info!("using mock collaborators for demo");
        let (source_control, tracker) = build_mock_collaborators();
        (cli.pr.clone().unwrap_or_else(|| MOCK_PR.to_string()), source_control, tracker)
    } else {
        let pr_ref = cli.pr.clone().ok_or(
            "PR reference is required unless --mock is used. Usage: pr-reviewer <PR> or pr-reviewer --mock",
        )?;

        info!("loading configuration");
        let mut config = Config::load()?;
        if let Some(repository) = cli
            .repo
            .clone()
            .or_else(|| pr::repository_from_url(&pr_ref).map(|r| r.to_string()))
        {
            config.github.repository = Some(repository);
        }
        debug!(repository = ?config.github.repository, api_url = config.github.api_url(), "resolved configuration");

        let source_control: Arc<dyn SourceControl> = Arc::new(GitHubClient::from_config(&config.github)?);
        let tracker: Arc<dyn TicketTracker> = Arc::new(JiraClient::from_config(&config.jira));
        (pr_ref, source_control, tracker)
    };

    let pipeline = Pipeline::new(source_control, tracker);
    let outcome = pipeline
        .run(&pr_ref)
        .instrument(info_span!("pr_review", pr = %pr_ref))
        .await;
    info!(state = %outcome.state, findings = outcome.findings.len(), "review finished");

    report::output(&outcome.text(), outcome.succeeded(), cli.output.as_deref())?;

    Ok(())
}

/// Build fakes serving one PR from the embedded sample diff fixture and its
/// ticket. This enables running the full review pipeline without tokens.
fn build_mock_collaborators() -> (Arc<dyn SourceControl>, Arc<dyn TicketTracker>) {
    let pull_request = PullRequestInfo {
        title: "Add OAuth2 login flow".to_string(),
        body: "Implements the login flow described in the ticket.".to_string(),
        head_branch: "feat/PAB-2197-oauth-login".to_string(),
        diff: include_str!("../tests/fixtures/sample_diff.patch").to_string(),
    };
    let ticket = TicketInfo {
        key: "PAB-2197".to_string(),
        summary: "Add OAuth2 login flow".to_string(),
        description: "Users sign in through the company identity provider.".to_string(),
        status: "In Review".to_string(),
        url: "https://jira.example.com/browse/PAB-2197".to_string(),
        acceptance_criteria: Some("users land on the dashboard after signing in".to_string()),
    };

    let source_control = FakeSourceControl::new()
        .with_pull_request(pr::normalize(MOCK_PR), pull_request);
    let tracker = FakeTicketTracker::new().with_ticket(ticket);
    (Arc::new(source_control), Arc::new(tracker))
}
