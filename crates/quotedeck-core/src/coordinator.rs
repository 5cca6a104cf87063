//! Selection state shared by every dependent view.
//!
//! Exactly one `Selected` value exists per coordinator; it changes only
//! through `select`, and symbol/company name always change together. A
//! selection change immediately resets all three load kinds to `Loading`
//! so no stale data flashes while the new symbol's fetches are in flight.
//! Rendering code reads state; it never mutates it.

use crate::client::PriceView;
use crate::loader::{LoadKind, LoadLifecycle, LoadState, RequestToken};
use crate::{FetchError, Forecast, Period, Selected, TimeRange, VolatilityReport};

/// Whether re-selecting an already-loaded symbol refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Always issue fresh fetches (default).
    #[default]
    RefetchAlways,
    /// Re-selecting the current symbol with every kind loaded is a no-op.
    ReuseLoaded,
}

/// Tokens for the three fetches a selection fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPlan {
    pub history: RequestToken,
    pub volatility: RequestToken,
    pub forecast: RequestToken,
}

/// Owner of the selected symbol and the three per-kind lifecycles.
#[derive(Debug)]
pub struct SelectionCoordinator {
    selected: Option<Selected>,
    period: Period,
    range: TimeRange,
    cache_policy: CachePolicy,
    history: LoadLifecycle<PriceView>,
    volatility: LoadLifecycle<VolatilityReport>,
    forecast: LoadLifecycle<Forecast>,
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl SelectionCoordinator {
    pub fn new(cache_policy: CachePolicy) -> Self {
        Self {
            selected: None,
            period: Period::default(),
            range: TimeRange::default(),
            cache_policy,
            history: LoadLifecycle::new(LoadKind::History),
            volatility: LoadLifecycle::new(LoadKind::Volatility),
            forecast: LoadLifecycle::new(LoadKind::Forecast),
        }
    }

    /// Atomically replace the selection and begin all three loads.
    ///
    /// Returns `None` only under [`CachePolicy::ReuseLoaded`] when the
    /// same symbol is re-selected and every kind is already loaded.
    pub fn select(&mut self, candidate: Selected) -> Option<LoadPlan> {
        let reuse = self.cache_policy == CachePolicy::ReuseLoaded
            && self.selected.as_ref() == Some(&candidate)
            && self.history.state().is_loaded()
            && self.volatility.state().is_loaded()
            && self.forecast.state().is_loaded();
        if reuse {
            return None;
        }

        self.selected = Some(candidate);
        Some(LoadPlan {
            history: self.history.begin(),
            volatility: self.volatility.begin(),
            forecast: self.forecast.begin(),
        })
    }

    /// Drop the selection and all displayed data.
    pub fn clear(&mut self) {
        self.selected = None;
        self.history.reset();
        self.volatility.reset();
        self.forecast.reset();
    }

    /// Change the chart period; re-begins only the history load.
    pub fn set_period(&mut self, period: Period) -> Option<RequestToken> {
        self.period = period;
        self.selected.is_some().then(|| self.history.begin())
    }

    /// Change the volatility window; re-begins only the volatility load.
    pub fn set_time_range(&mut self, range: TimeRange) -> Option<RequestToken> {
        self.range = range;
        self.selected.is_some().then(|| self.volatility.begin())
    }

    /// User-triggered retry of one failed kind. Nothing retries on its own.
    pub fn retry(&mut self, kind: LoadKind) -> Option<RequestToken> {
        if self.selected.is_none() {
            return None;
        }
        match kind {
            LoadKind::History => self
                .history
                .state()
                .error()
                .is_some()
                .then(|| self.history.begin()),
            LoadKind::Volatility => self
                .volatility
                .state()
                .error()
                .is_some()
                .then(|| self.volatility.begin()),
            LoadKind::Forecast => self
                .forecast
                .state()
                .error()
                .is_some()
                .then(|| self.forecast.begin()),
        }
    }

    pub fn apply_history(
        &mut self,
        token: RequestToken,
        outcome: Result<PriceView, FetchError>,
    ) -> bool {
        self.history.apply(token, outcome)
    }

    pub fn apply_volatility(
        &mut self,
        token: RequestToken,
        outcome: Result<VolatilityReport, FetchError>,
    ) -> bool {
        self.volatility.apply(token, outcome)
    }

    pub fn apply_forecast(
        &mut self,
        token: RequestToken,
        outcome: Result<Forecast, FetchError>,
    ) -> bool {
        self.forecast.apply(token, outcome)
    }

    pub fn selected(&self) -> Option<&Selected> {
        self.selected.as_ref()
    }

    pub const fn period(&self) -> Period {
        self.period
    }

    pub const fn time_range(&self) -> TimeRange {
        self.range
    }

    pub fn history(&self) -> &LoadState<PriceView> {
        self.history.state()
    }

    pub fn volatility(&self) -> &LoadState<VolatilityReport> {
        self.volatility.state()
    }

    pub fn forecast(&self) -> &LoadState<Forecast> {
        self.forecast.state()
    }
}
