//! End-to-end session tests: coordinator plus client over a scripted
//! transport, exercising the full select/refresh/retry surface.

use std::sync::Arc;
use std::time::Instant;

use quotedeck_core::{
    BackendConfig, DashboardClient, DashboardSession, LoadKind, Period, SearchDispatcher, Selected,
    Symbol, TimeRange,
};
use quotedeck_tests::ScriptedHttpClient;

const STOCK_BODY: &str = r#"{
    "stock_data": {
        "company_name": "Apple Inc.",
        "current_price": 189.5,
        "change": -1.25,
        "change_percent": -0.65
    },
    "chart_data": [
        {"date": "2024-04-30", "close": 188.0},
        {"date": "2024-05-01", "close": 190.0}
    ]
}"#;

const VOLATILITY_BODY: &str = r#"{
    "symbol": "AAPL",
    "company_name": "Apple Inc.",
    "current_price": 189.5,
    "historical_volatility": 24.7,
    "avg_volatility": 21.0,
    "max_volatility": 38.2,
    "min_volatility": 12.4,
    "risk_level": "Medium",
    "data_points": [{"date": "2024-05-01", "volatility": 24.7}]
}"#;

const FORECAST_BODY: &str = r#"{
    "explanation": "mild upward drift",
    "predictions": [{"day": 1, "price": 191.2}]
}"#;

fn selected(symbol: &str) -> Selected {
    Selected {
        symbol: Symbol::parse(symbol).expect("valid symbol"),
        company_name: format!("{symbol} Inc."),
    }
}

fn session_over(http: Arc<ScriptedHttpClient>) -> DashboardSession {
    DashboardSession::new(DashboardClient::new(BackendConfig::default(), http))
}

// =============================================================================
// Selection fan-out through the real client
// =============================================================================

#[tokio::test]
async fn selecting_a_symbol_loads_all_three_kinds() {
    let http = Arc::new(
        ScriptedHttpClient::new()
            .ok("/stock/AAPL", STOCK_BODY)
            .ok("/api/volatility/AAPL", VOLATILITY_BODY)
            .ok("/predict", FORECAST_BODY),
    );
    let mut session = session_over(http.clone());

    assert!(session.select(selected("AAPL")).await);

    let coordinator = session.coordinator();
    let view = coordinator.history().loaded().expect("history loaded");
    assert_eq!(
        view.quote.as_ref().expect("quote present").company_name,
        "Apple Inc."
    );
    assert_eq!(view.series.points.len(), 2);

    let report = coordinator.volatility().loaded().expect("volatility loaded");
    assert_eq!(report.historical_volatility, 24.7);

    // The forecast consumed the freshly loaded history: its day-1 point
    // lands the day after the last chart date.
    let forecast = coordinator.forecast().loaded().expect("forecast loaded");
    assert_eq!(forecast.points.len(), 1);
    assert_eq!(forecast.points[0].ts.format_date(), "2024-05-02");

    // One request per backend.
    assert_eq!(http.requests().len(), 3);
}

#[tokio::test]
async fn a_failing_history_leg_does_not_block_the_other_two() {
    let http = Arc::new(
        ScriptedHttpClient::new()
            .status("/stock/AAPL", 500)
            .ok("/api/volatility/AAPL", VOLATILITY_BODY)
            .ok("/predict", r#"{"predictions": []}"#),
    );
    let mut session = session_over(http);

    assert!(session.select(selected("AAPL")).await);

    let coordinator = session.coordinator();
    assert!(coordinator
        .history()
        .error()
        .expect("history failed")
        .contains("500"));
    assert!(coordinator.volatility().is_loaded());
    // Forecast was still attempted, with no history to offer.
    let forecast = coordinator.forecast().loaded().expect("forecast loaded");
    assert!(forecast.is_empty());
}

// =============================================================================
// Period and range refreshes
// =============================================================================

#[tokio::test]
async fn changing_the_period_keeps_the_quote_card() {
    let http = Arc::new(
        ScriptedHttpClient::new()
            .ok("/stock/AAPL", STOCK_BODY)
            .ok("/api/volatility/AAPL", VOLATILITY_BODY)
            .ok("/predict", FORECAST_BODY)
            .ok(
                "/chart/AAPL",
                r#"{"chart_data": [{"date": "2023-06-01", "close": 180.0}]}"#,
            ),
    );
    let mut session = session_over(http.clone());
    assert!(session.select(selected("AAPL")).await);

    session.set_period(Period::OneYear).await;

    let coordinator = session.coordinator();
    assert_eq!(coordinator.period(), Period::OneYear);
    let view = coordinator.history().loaded().expect("history reloaded");
    // The quote survived a chart-only refresh.
    assert_eq!(
        view.quote.as_ref().expect("quote kept").company_name,
        "Apple Inc."
    );
    assert_eq!(view.series.points[0].close, 180.0);

    let urls = http.request_urls();
    assert!(urls
        .iter()
        .any(|url| url.ends_with("/chart/AAPL?period=1Y")));
}

#[tokio::test]
async fn changing_the_time_range_refetches_only_volatility() {
    let http = Arc::new(
        ScriptedHttpClient::new()
            .ok("/stock/AAPL", STOCK_BODY)
            .ok("/api/volatility/AAPL", VOLATILITY_BODY)
            .ok("/predict", FORECAST_BODY),
    );
    let mut session = session_over(http.clone());
    assert!(session.select(selected("AAPL")).await);
    let before = http.requests().len();

    session.set_time_range(TimeRange::SixMonths).await;

    assert_eq!(http.requests().len(), before + 1);
    let urls = http.request_urls();
    assert!(urls
        .last()
        .expect("request issued")
        .ends_with("/api/volatility/AAPL?time_range=6M"));
    assert!(session.coordinator().volatility().is_loaded());
}

#[tokio::test]
async fn preference_changes_before_any_selection_issue_no_requests() {
    let http = Arc::new(ScriptedHttpClient::new());
    let mut session = session_over(http.clone());

    session.set_period(Period::OneYear).await;
    session.set_time_range(TimeRange::OneYear).await;

    assert!(http.requests().is_empty());
    assert_eq!(session.coordinator().period(), Period::OneYear);
}

// =============================================================================
// Retry
// =============================================================================

#[tokio::test]
async fn retry_refetches_the_failed_kind_in_place() {
    // Volatility fails on the first pass.
    let http = Arc::new(
        ScriptedHttpClient::new()
            .ok("/stock/AAPL", STOCK_BODY)
            .status("/api/volatility/AAPL", 503)
            .ok("/predict", FORECAST_BODY),
    );
    let mut session = session_over(http.clone());
    assert!(session.select(selected("AAPL")).await);
    assert!(session.coordinator().volatility().error().is_some());

    // The backend recovers before the user clicks retry.
    http.set_ok("/api/volatility/AAPL", VOLATILITY_BODY);

    session.retry(LoadKind::Volatility).await;
    assert!(session.coordinator().volatility().is_loaded());

    // Only the volatility leg went back out.
    let urls = http.request_urls();
    assert_eq!(urls.len(), 4);
    assert!(urls[3].contains("/api/volatility/AAPL"));
}

// =============================================================================
// Debounced search through the session
// =============================================================================

#[tokio::test]
async fn pump_search_waits_out_the_debounce_and_fills_results() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/search?query=apple",
        r#"[{"symbol": "AAPL", "company": "Apple Inc."}]"#,
    ));
    let session = session_over(http.clone());
    let mut dispatcher = SearchDispatcher::default();

    dispatcher.on_query_changed("apple", Instant::now());
    session.pump_search(&mut dispatcher).await;

    assert_eq!(dispatcher.results().len(), 1);
    assert_eq!(dispatcher.results()[0].symbol.as_str(), "AAPL");
    assert!(!dispatcher.is_loading());
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn pump_search_is_a_no_op_without_a_pending_query() {
    let http = Arc::new(ScriptedHttpClient::new());
    let session = session_over(http.clone());
    let mut dispatcher = SearchDispatcher::default();

    session.pump_search(&mut dispatcher).await;

    assert!(http.requests().is_empty());
    assert!(dispatcher.results().is_empty());
}
