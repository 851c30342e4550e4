use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{TicketError, TicketInfo, TicketTracker};

pub const FAKE_BROWSE_BASE: &str = "https://jira.example.com/browse";

/// In-memory ticket tracker for `--mock` runs and tests. Keys it does not
/// hold fail with [`TicketError::NotFound`].
#[derive(Debug)]
pub struct FakeTicketTracker {
    authenticated: bool,
    tickets: HashMap<String, TicketInfo>,
    fetch_calls: AtomicUsize,
}

impl FakeTicketTracker {
    pub fn new() -> FakeTicketTracker {
        FakeTicketTracker {
            authenticated: true,
            tickets: HashMap::new(),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn unauthenticated(mut self) -> FakeTicketTracker {
        self.authenticated = false;
        self
    }

    pub fn with_ticket(mut self, ticket: TicketInfo) -> FakeTicketTracker {
        self.tickets.insert(ticket.key.clone(), ticket);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeTicketTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketTracker for FakeTicketTracker {
    async fn auth_status(&self) -> bool {
        self.authenticated
    }

    async fn fetch_ticket(&self, key: &str) -> Result<TicketInfo, TicketError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if !self.authenticated {
            return Err(TicketError::MissingCredentials);
        }
        self.tickets
            .get(key)
            .cloned()
            .ok_or_else(|| TicketError::NotFound(key.to_string()))
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{FAKE_BROWSE_BASE}/{key}")
    }
}
