//! Debounced, last-query-wins delivery of [`SearchIndex`] results.
//!
//! Time is passed in by the caller so the UI loop decides when to poll.

use crate::search::{ResultEntry, SearchIndex, SearchRequest};
use log::debug;
use std::time::{Duration, Instant};

/// Default delay between the last keystroke and query execution.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct PendingQuery {
    generation: u64,
    request: SearchRequest,
    due_at: Instant,
}

/// One completed query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDelivery {
    /// Generation returned by the [`DebouncedSearch::submit`] call that produced it.
    pub generation: u64,
    pub results: Vec<ResultEntry>,
}

/// At most one pending query; a new submission cancels the previous one.
#[derive(Debug, Clone)]
pub struct DebouncedSearch {
    delay: Duration,
    generation: u64,
    pending: Option<PendingQuery>,
}

impl Default for DebouncedSearch {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl DebouncedSearch {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `request` at `now + delay`, replacing any pending query.
    ///
    /// Returns the generation that its delivery will carry.
    pub fn submit(&mut self, request: SearchRequest, now: Instant) -> u64 {
        self.generation += 1;
        if let Some(stale) = self.pending.take() {
            debug!(
                "event=search_debounce module=search status=superseded generation={}",
                stale.generation
            );
        }
        self.pending = Some(PendingQuery {
            generation: self.generation,
            request,
            due_at: now + self.delay,
        });
        self.generation
    }

    /// Drops the pending query, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Generation of the most recent submission.
    pub fn latest_generation(&self) -> u64 {
        self.generation
    }

    /// Runs the pending query against `index` once it is due.
    ///
    /// Each submitted query is delivered at most once.
    pub fn poll(&mut self, index: &SearchIndex, now: Instant) -> Option<SearchDelivery> {
        if self.pending.as_ref()?.due_at > now {
            return None;
        }
        let pending = self.pending.take()?;
        let results = index.search(&pending.request);
        debug!(
            "event=search_deliver module=search status=ok generation={} hits={}",
            pending.generation,
            results.len()
        );
        Some(SearchDelivery {
            generation: pending.generation,
            results,
        })
    }
}
