pub mod types;

pub use types::Finding;

use crate::ticket::TicketInfo;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Render the review as markdown text.
///
/// # Code Review: #42
///
/// ## Ticket: PAB-2197
/// **Summary:** Add OAuth2 login flow
/// **Status:** In Review
/// ...
///
/// ## Review Comments
///
/// - src/auth.ts:12
///   Remove console.log before merging
///
/// The ticket and comments sections are left out entirely when there is
/// nothing to put in them. Summary, status and description always appear in
/// the ticket section; acceptance criteria and URL only when non-empty.
/// Output depends only on the arguments.
pub fn render(pr_label: &str, ticket: Option<&TicketInfo>, findings: &[Finding]) -> String {
    let mut md = format!("# Code Review: {}\n\n", pr_label);

    if let Some(ticket) = ticket {
        md.push_str(&format!("## Ticket: {}\n", ticket.key));
        md.push_str(&format!("**Summary:** {}\n", ticket.summary));
        md.push_str(&format!("**Status:** {}\n", ticket.status));
        md.push_str(&format!("**Description:** {}\n", ticket.description));
        let optional = [
            ("Acceptance Criteria", ticket.acceptance_criteria.as_deref().unwrap_or_default()),
            ("URL", ticket.url.as_str()),
        ];
        for (label, value) in optional {
            if !value.is_empty() {
                md.push_str(&format!("**{}:** {}\n", label, value));
            }
        }
        md.push('\n');
    }

    if !findings.is_empty() {
        md.push_str("## Review Comments\n\n");
        for finding in findings {
            md.push_str(&format!("- {}\n  {}\n\n", finding.location(), finding.comment));
        }
    }

    md
}

/// Output the review text to the terminal (default) or to a file.
///
/// On the terminal the text is followed by a coloured DONE/FAILED line.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn output(text: &str, succeeded: bool, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing review to terminal");
            print_terminal_report(text, succeeded);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing review to file");
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn print_terminal_report(text: &str, succeeded: bool) {
    println!("{}", text.trim_end());
    println!();
    println!("═══ Review: {} ═══", colorize_status(succeeded));
}

fn colorize_status(succeeded: bool) -> colored::ColoredString {
    if succeeded {
        "DONE".green().bold()
    } else {
        "FAILED".red().bold()
    }
}
