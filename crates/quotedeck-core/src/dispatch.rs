//! Debounced search dispatch with stale-response suppression.
//!
//! The dispatcher is a deterministic state machine driven by an injected
//! clock instant rather than any event-loop timer API: keystrokes arm a
//! single debounce deadline, `poll_due` fires at most one tagged query per
//! settled window, and `apply_response` accepts only the response whose
//! tag matches the current sequence. Callers (UI loop, CLI, tests) decide
//! when time passes.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{FetchError, SearchHit};

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LEN: usize = 2;

/// Input quiet period before a query is dispatched.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Default bound on the visible result list.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// A dispatched query tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub sequence: u64,
}

#[derive(Debug)]
struct PendingQuery {
    text: String,
    due: Instant,
}

/// Owns the debounce timer state and the visible search results.
#[derive(Debug)]
pub struct SearchDispatcher {
    sequence: u64,
    pending: Option<PendingQuery>,
    results: Vec<SearchHit>,
    loading: bool,
    error: Option<String>,
    result_limit: usize,
}

impl Default for SearchDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_LIMIT)
    }
}

impl SearchDispatcher {
    pub fn new(result_limit: usize) -> Self {
        Self {
            sequence: 0,
            pending: None,
            results: Vec::new(),
            loading: false,
            error: None,
            result_limit,
        }
    }

    /// Called on every keystroke.
    ///
    /// Sub-2-character input clears results and cancels the pending
    /// window without issuing a request; the sequence still advances so
    /// any in-flight response dies on arrival. Longer input (re)arms the
    /// single debounce deadline, so only the last keystroke of a burst
    /// survives to dispatch.
    pub fn on_query_changed(&mut self, text: &str, now: Instant) {
        self.sequence += 1;

        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            self.pending = None;
            self.results.clear();
            self.loading = false;
            self.error = None;
            return;
        }

        self.pending = Some(PendingQuery {
            text: trimmed.to_owned(),
            due: now + DEBOUNCE_WINDOW,
        });
    }

    /// Fire the debounce window if it has settled.
    ///
    /// Returns the query to send, tagged with the current sequence;
    /// exactly one query is produced per settled window.
    pub fn poll_due(&mut self, now: Instant) -> Option<SearchQuery> {
        if self.pending.as_ref()?.due > now {
            return None;
        }

        let pending = self.pending.take().expect("pending checked above");
        self.loading = true;
        self.error = None;
        debug!(sequence = self.sequence, text = %pending.text, "dispatching search query");

        Some(SearchQuery {
            text: pending.text,
            sequence: self.sequence,
        })
    }

    /// Apply a completed search. Responses tagged with anything other
    /// than the current sequence are discarded silently and return
    /// `false`, leaving loading state and results to the newer request.
    pub fn apply_response(
        &mut self,
        sequence: u64,
        outcome: Result<Vec<SearchHit>, FetchError>,
    ) -> bool {
        if sequence != self.sequence {
            debug!(
                stale = sequence,
                current = self.sequence,
                "discarding stale search response"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(mut hits) => {
                hits.truncate(self.result_limit);
                self.results = hits;
                self.error = None;
            }
            Err(error) => {
                self.results.clear();
                self.error = Some(error.to_string());
            }
        }
        true
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Deadline of the armed debounce window, if any. Lets an async
    /// driver sleep exactly until the next poll is worthwhile.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }
}
