use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{PrError, PullRequestInfo, SourceControl};

/// In-memory source-control collaborator for `--mock` runs and tests.
#[derive(Debug)]
pub struct FakeSourceControl {
    authenticated: bool,
    pulls: HashMap<String, PullRequestInfo>,
    fetch_calls: AtomicUsize,
}

impl FakeSourceControl {
    /// An authenticated fake with no pull requests.
    pub fn new() -> FakeSourceControl {
        FakeSourceControl {
            authenticated: true,
            pulls: HashMap::new(),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn unauthenticated(mut self) -> FakeSourceControl {
        self.authenticated = false;
        self
    }

    /// Serve `pr` for the normalized identifier `id`.
    pub fn with_pull_request(mut self, id: impl Into<String>, pr: PullRequestInfo) -> FakeSourceControl {
        self.pulls.insert(id.into(), pr);
        self
    }

    /// How many times `fetch_pull_request` has been called.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeSourceControl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceControl for FakeSourceControl {
    async fn auth_status(&self) -> bool {
        self.authenticated
    }

    async fn fetch_pull_request(&self, id: &str) -> Result<PullRequestInfo, PrError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if !self.authenticated {
            return Err(PrError::Unauthenticated);
        }
        self.pulls
            .get(id)
            .cloned()
            .ok_or_else(|| PrError::NotFound(id.to_string()))
    }
}
