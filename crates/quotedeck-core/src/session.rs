//! Async glue between the coordinator and the backend client.
//!
//! The session owns the fetch fan-out: a selection issues the three loads
//! concurrently and applies each result through its token, so a result
//! that was superseded mid-flight is dropped by the lifecycle rather than
//! rendered. Forecasting consumes the freshly loaded history (its closes
//! form the request body in post style and its last date anchors
//! horizon-indexed predictions), so the forecast leg runs after history
//! inside the same fan-out, while volatility proceeds in parallel.

use std::time::Instant;

use crate::client::{DashboardClient, PriceView};
use crate::coordinator::{CachePolicy, SelectionCoordinator};
use crate::dispatch::{SearchDispatcher, DEFAULT_RESULT_LIMIT};
use crate::loader::LoadKind;
use crate::series::TimeSeriesPoint;
use crate::{Period, Selected, TimeRange};

const DEFAULT_FORECAST_HORIZON: usize = 30;

/// One user's dashboard: selection state plus the client that feeds it.
pub struct DashboardSession {
    client: DashboardClient,
    coordinator: SelectionCoordinator,
    forecast_horizon: usize,
}

impl DashboardSession {
    pub fn new(client: DashboardClient) -> Self {
        Self::with_policy(client, CachePolicy::default())
    }

    pub fn with_policy(client: DashboardClient, cache_policy: CachePolicy) -> Self {
        Self {
            client,
            coordinator: SelectionCoordinator::new(cache_policy),
            forecast_horizon: DEFAULT_FORECAST_HORIZON,
        }
    }

    pub fn with_forecast_horizon(mut self, horizon: usize) -> Self {
        self.forecast_horizon = horizon;
        self
    }

    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    pub fn client(&self) -> &DashboardClient {
        &self.client
    }

    /// Select a symbol and run its three loads to completion.
    ///
    /// Returns `false` when the cache policy made the selection a no-op.
    /// Failures land in the per-kind states; one failing kind never
    /// blocks the other two.
    pub async fn select(&mut self, candidate: Selected) -> bool {
        let Some(plan) = self.coordinator.select(candidate) else {
            return false;
        };
        let symbol = self
            .coordinator
            .selected()
            .expect("selection was just set")
            .symbol
            .clone();
        let period = self.coordinator.period();
        let range = self.coordinator.time_range();
        let horizon = self.forecast_horizon;
        let client = &self.client;

        let history_then_forecast = async {
            let history = client.stock(&symbol, Some(period)).await;
            let closes: Vec<TimeSeriesPoint> = history
                .as_ref()
                .map(|view| view.series.points.clone())
                .unwrap_or_default();
            let forecast = client.forecast(&symbol, &closes, horizon).await;
            (history, forecast)
        };
        let volatility = client.volatility(&symbol, range);

        let ((history, forecast), volatility) = tokio::join!(history_then_forecast, volatility);

        self.coordinator.apply_history(plan.history, history);
        self.coordinator.apply_volatility(plan.volatility, volatility);
        self.coordinator.apply_forecast(plan.forecast, forecast);
        true
    }

    /// Switch chart period: refreshes the series without re-fetching the
    /// quote, carrying the previously loaded quote card across.
    pub async fn set_period(&mut self, period: Period) {
        let prior_quote = self
            .coordinator
            .history()
            .loaded()
            .and_then(|view| view.quote.clone());
        let Some(token) = self.coordinator.set_period(period) else {
            return;
        };
        let symbol = self
            .coordinator
            .selected()
            .expect("period change requires a selection")
            .symbol
            .clone();

        let outcome = self
            .client
            .chart(&symbol, period)
            .await
            .map(|series| PriceView {
                quote: prior_quote,
                series,
            });
        self.coordinator.apply_history(token, outcome);
    }

    /// Switch the volatility lookback window.
    pub async fn set_time_range(&mut self, range: TimeRange) {
        let Some(token) = self.coordinator.set_time_range(range) else {
            return;
        };
        let symbol = self
            .coordinator
            .selected()
            .expect("range change requires a selection")
            .symbol
            .clone();

        let outcome = self.client.volatility(&symbol, range).await;
        self.coordinator.apply_volatility(token, outcome);
    }

    /// User-triggered retry of one failed kind.
    pub async fn retry(&mut self, kind: LoadKind) {
        let Some(token) = self.coordinator.retry(kind) else {
            return;
        };
        let symbol = self
            .coordinator
            .selected()
            .expect("retry requires a selection")
            .symbol
            .clone();

        match kind {
            LoadKind::History => {
                let outcome = self
                    .client
                    .stock(&symbol, Some(self.coordinator.period()))
                    .await;
                self.coordinator.apply_history(token, outcome);
            }
            LoadKind::Volatility => {
                let outcome = self
                    .client
                    .volatility(&symbol, self.coordinator.time_range())
                    .await;
                self.coordinator.apply_volatility(token, outcome);
            }
            LoadKind::Forecast => {
                let closes: Vec<TimeSeriesPoint> = self
                    .coordinator
                    .history()
                    .loaded()
                    .map(|view| view.series.points.clone())
                    .unwrap_or_default();
                let outcome = self
                    .client
                    .forecast(&symbol, &closes, self.forecast_horizon)
                    .await;
                self.coordinator.apply_forecast(token, outcome);
            }
        }
    }

    /// Drive one armed debounce window: wait out its deadline, issue the
    /// query, apply the response. A no-op when nothing is pending.
    pub async fn pump_search(&self, dispatcher: &mut SearchDispatcher) {
        let Some(deadline) = dispatcher.next_deadline() else {
            return;
        };
        tokio::time::sleep_until(deadline.into()).await;

        if let Some(query) = dispatcher.poll_due(Instant::now()) {
            let outcome = self.client.search(&query.text, DEFAULT_RESULT_LIMIT).await;
            dispatcher.apply_response(query.sequence, outcome);
        }
    }
}
