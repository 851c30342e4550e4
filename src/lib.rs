//! PR Reviewer: reviews a pull request against the ticket it references.
//!
//! Given a PR reference, the [`pipeline::Pipeline`] checks that source
//! control and the ticket tracker are reachable, fetches the PR and its
//! diff, resolves the ticket named in the branch, title or body, runs the
//! textual rules in [`analysis`] over the added lines and renders a
//! markdown review with [`report::render`].

pub mod analysis;
pub mod auth;
pub mod config;
pub mod pipeline;
pub mod pr;
pub mod report;
pub mod ticket;

pub use pipeline::{Pipeline, ReviewOutcome, ReviewState};
