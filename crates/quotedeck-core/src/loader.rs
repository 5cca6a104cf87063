//! Per-kind load lifecycle with stale-response suppression.
//!
//! Every data kind (price series, volatility, forecast) owns one
//! [`LoadLifecycle`]. Starting a load hands out a token; only the response
//! carrying the *current* token may transition the lifecycle, so a burst
//! of symbol or period switches can never let an older request's result
//! land on top of a newer one. The transport is never cancelled; a
//! superseded response simply arrives, fails the token check and is
//! dropped.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::FetchError;

/// The three independent data kinds a selection fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadKind {
    History,
    Volatility,
    Forecast,
}

impl LoadKind {
    pub const ALL: [Self; 3] = [Self::History, Self::Volatility, Self::Forecast];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Volatility => "volatility",
            Self::Forecast => "forecast",
        }
    }
}

impl Display for LoadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle states observed by rendering code.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Opaque proof of the request a fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// One data kind's state machine: `Idle -> Loading -> Loaded | Failed`,
/// with `begin` pre-empting from any state.
#[derive(Debug)]
pub struct LoadLifecycle<T> {
    kind: LoadKind,
    state: LoadState<T>,
    token: u64,
}

impl<T> LoadLifecycle<T> {
    pub const fn new(kind: LoadKind) -> Self {
        Self {
            kind,
            state: LoadState::Idle,
            token: 0,
        }
    }

    pub const fn kind(&self) -> LoadKind {
        self.kind
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Start a new load: clears any displayed data immediately and
    /// invalidates every previously issued token.
    pub fn begin(&mut self) -> RequestToken {
        self.token += 1;
        self.state = LoadState::Loading;
        RequestToken(self.token)
    }

    /// Apply a completed fetch. Returns `false` (leaving state untouched)
    /// when the token has been superseded by a newer `begin`.
    pub fn apply(&mut self, token: RequestToken, outcome: Result<T, FetchError>) -> bool {
        if token.0 != self.token {
            debug!(
                kind = self.kind.as_str(),
                stale = token.0,
                current = self.token,
                "discarding stale load result"
            );
            return false;
        }

        self.state = match outcome {
            Ok(value) => LoadState::Loaded(value),
            Err(error) => LoadState::Failed(error.to_string()),
        };
        true
    }

    /// Drop back to `Idle`, invalidating in-flight tokens. Used when the
    /// selection is cleared entirely.
    pub fn reset(&mut self) {
        self.token += 1;
        self.state = LoadState::Idle;
    }
}
