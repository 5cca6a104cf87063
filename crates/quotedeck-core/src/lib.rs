//! Core interaction layer for the quotedeck stock dashboard.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The time-series normalizer for heterogeneous backend records
//! - The debounced search dispatcher with stale-response suppression
//! - The selection coordinator and per-kind load lifecycles
//! - The HTTP client over the quote, volatility and forecast services

pub mod client;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod http;
pub mod loader;
pub mod series;
pub mod session;

pub use client::{DashboardClient, PriceView};
pub use config::{BackendConfig, ForecastStyle};
pub use coordinator::{CachePolicy, LoadPlan, SelectionCoordinator};
pub use dispatch::{SearchDispatcher, SearchQuery, DEBOUNCE_WINDOW, MIN_QUERY_LEN};
pub use domain::{
    Forecast, Mover, Period, RiskLevel, SearchHit, Selected, Signal, StockQuote, Symbol, TimeRange,
    UtcDateTime, VolatilityRank, VolatilityRanking, VolatilityReport,
};
pub use error::{FetchError, ValidationError};
pub use http::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use loader::{LoadKind, LoadLifecycle, LoadState, RequestToken};
pub use series::{normalize, Normalized, SeriesKind, TimeSeriesPoint};
pub use session::DashboardSession;
