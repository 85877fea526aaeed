use std::collections::HashMap;
use tracing::debug;

use crate::models::CacheKey;

/// Proof that a fetch was issued, carried until its response is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub key: CacheKey,
    pub generation: u64,
}

/// Tags fetches with an increasing generation per key.
///
/// Only the response to the most recently issued request for a key is
/// current. Anything older is stale and must be dropped.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: u64,
    latest: HashMap<CacheKey, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, key: CacheKey) -> RequestTicket {
        self.next += 1;
        self.latest.insert(key.clone(), self.next);
        RequestTicket {
            key,
            generation: self.next,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest.get(&ticket.key) == Some(&ticket.generation)
    }

    /// Retire `ticket`. Returns false if a newer request superseded it.
    pub fn complete(&mut self, ticket: &RequestTicket) -> bool {
        if self.is_current(ticket) {
            self.latest.remove(&ticket.key);
            true
        } else {
            debug!(key = %ticket.key, generation = ticket.generation, "Discarding superseded response");
            false
        }
    }

    /// Forget every outstanding request for `key`.
    pub fn invalidate(&mut self, key: &CacheKey) {
        self.latest.remove(key);
    }
}
