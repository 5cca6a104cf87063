//! Behavioral tests for the dashboard client over a scripted transport.
//!
//! Every test pins the exact JSON a backend revision is known to emit and
//! asserts the canonical domain values that come out the other side.

use std::sync::Arc;

use quotedeck_core::{
    BackendConfig, DashboardClient, FetchError, ForecastStyle, Period, RiskLevel, Signal, Symbol,
    TimeRange, TimeSeriesPoint, UtcDateTime,
};
use quotedeck_tests::ScriptedHttpClient;

fn client_with(http: Arc<ScriptedHttpClient>) -> DashboardClient {
    DashboardClient::new(BackendConfig::default(), http)
}

fn query_style_client(http: Arc<ScriptedHttpClient>) -> DashboardClient {
    let mut config = BackendConfig::default();
    config.forecast_style = ForecastStyle::QuerySymbol;
    DashboardClient::new(config, http)
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

fn history_point(date: &str, close: f64) -> TimeSeriesPoint {
    TimeSeriesPoint {
        ts: UtcDateTime::parse(date).expect("valid date"),
        close,
        open: None,
        high: None,
        low: None,
        volume: None,
    }
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn search_preserves_backend_order_and_skips_invalid_rows() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/search?query=app",
        r#"[
            {"symbol": "AAPL", "company": "Apple Inc."},
            {"symbol": "123BAD", "company": "Not a ticker"},
            {"symbol": "APLE", "company_name": "Apple Hospitality REIT"}
        ]"#,
    ));
    let client = client_with(http.clone());

    let hits = client.search("app", 10).await.expect("search succeeds");

    // The unparseable row is skipped, the rest keep backend order, and
    // both company key spellings are accepted.
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].symbol.as_str(), "AAPL");
    assert_eq!(hits[1].symbol.as_str(), "APLE");
    assert_eq!(hits[1].company_name, "Apple Hospitality REIT");
}

#[tokio::test]
async fn search_url_encodes_the_query() {
    let http = Arc::new(ScriptedHttpClient::new().ok("/search", "[]"));
    let client = client_with(http.clone());

    client
        .search("apple inc", 10)
        .await
        .expect("search succeeds");

    let urls = http.request_urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].ends_with("/search?query=apple%20inc"));
}

// =============================================================================
// Stock and chart
// =============================================================================

#[tokio::test]
async fn stock_tolerates_string_numbers_and_sorts_the_chart() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/stock/AAPL",
        r#"{
            "stock_data": {
                "company_name": "Apple Inc.",
                "current_price": "189.50",
                "change": -1.25,
                "change_percent": "-0.65",
                "volume": "53200000",
                "market_cap": 2.95e12
            },
            "chart_data": [
                {"date": "2024-05-02", "close": 189.50},
                {"date": "2024-05-01", "close": "190.75"},
                {"date": "bogus", "close": 1.0}
            ]
        }"#,
    ));
    let client = client_with(http);

    let view = client
        .stock(&symbol("AAPL"), Some(Period::ThreeMonths))
        .await
        .expect("stock succeeds");

    let quote = view.quote.expect("quote present");
    // The missing wire symbol falls back to the requested one.
    assert_eq!(quote.symbol.as_str(), "AAPL");
    assert_eq!(quote.current_price, 189.50);
    assert_eq!(quote.change_percent, -0.65);
    assert_eq!(quote.volume, Some(53_200_000));

    // Chronological output regardless of backend order; the bogus date
    // is dropped and counted.
    assert_eq!(view.series.points.len(), 2);
    assert_eq!(view.series.points[0].close, 190.75);
    assert_eq!(view.series.points[1].close, 189.50);
    assert_eq!(view.series.dropped, 1);
}

#[tokio::test]
async fn stock_without_period_omits_the_query_parameter() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/stock/MSFT",
        r#"{
            "stock_data": {
                "company_name": "Microsoft",
                "current_price": 400.0,
                "change": 2.0,
                "change_percent": 0.5
            },
            "chart_data": []
        }"#,
    ));
    let client = client_with(http.clone());

    client
        .stock(&symbol("MSFT"), None)
        .await
        .expect("stock succeeds");

    let urls = http.request_urls();
    assert!(urls[0].ends_with("/stock/MSFT"));
}

#[tokio::test]
async fn chart_requests_the_period_refresh_endpoint() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/chart/AAPL",
        r#"{"chart_data": [{"date": "2024-05-01", "close": 190.0}]}"#,
    ));
    let client = client_with(http.clone());

    let series = client
        .chart(&symbol("AAPL"), Period::OneYear)
        .await
        .expect("chart succeeds");

    assert_eq!(series.points.len(), 1);
    assert!(http.request_urls()[0].ends_with("/chart/AAPL?period=1Y"));
}

// =============================================================================
// Volatility service
// =============================================================================

#[tokio::test]
async fn volatility_parses_the_report_and_rolling_series() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/api/volatility/AAPL",
        r#"{
            "symbol": "AAPL",
            "company_name": "Apple Inc.",
            "current_price": 189.5,
            "historical_volatility": "24.7",
            "avg_volatility": 21.0,
            "max_volatility": 38.2,
            "min_volatility": 12.4,
            "risk_level": "Medium",
            "data_points": [
                {"date": "2024-04-30", "volatility": 23.9},
                {"date": "2024-05-01", "value": "24.7"}
            ]
        }"#,
    ));
    let client = client_with(http.clone());

    let report = client
        .volatility(&symbol("AAPL"), TimeRange::OneMonth)
        .await
        .expect("volatility succeeds");

    assert_eq!(report.historical_volatility, 24.7);
    assert_eq!(report.risk_level, RiskLevel::Medium);
    assert_eq!(report.points.len(), 2);
    assert_eq!(report.points[1].close, 24.7);
    assert!(http.request_urls()[0].ends_with("/api/volatility/AAPL?time_range=1M"));
}

#[tokio::test]
async fn missing_risk_level_is_recomputed_from_the_volatility_figure() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/api/volatility/GME",
        r#"{
            "symbol": "GME",
            "company_name": "GameStop",
            "current_price": 25.0,
            "historical_volatility": 61.0,
            "avg_volatility": 55.0,
            "max_volatility": 90.0,
            "min_volatility": 30.0,
            "data_points": []
        }"#,
    ));
    let client = client_with(http);

    let report = client
        .volatility(&symbol("GME"), TimeRange::OneMonth)
        .await
        .expect("volatility succeeds");

    assert_eq!(report.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn ranking_converts_both_listings() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/api/volatility-ranking",
        r#"{
            "most_volatile": [
                {"symbol": "GME", "company_name": "GameStop", "volatility": 61.0, "risk_level": "High", "current_price": 25.0}
            ],
            "least_volatile": [
                {"symbol": "KO", "company_name": "Coca-Cola", "volatility": "11.2", "current_price": 62.0}
            ]
        }"#,
    ));
    let client = client_with(http.clone());

    let ranking = client
        .volatility_ranking(TimeRange::ThreeMonths, 5)
        .await
        .expect("ranking succeeds");

    assert_eq!(ranking.most_volatile.len(), 1);
    assert_eq!(ranking.most_volatile[0].risk_level, RiskLevel::High);
    // Absent risk level falls back to the threshold classification.
    assert_eq!(ranking.least_volatile[0].risk_level, RiskLevel::Low);
    assert!(http.request_urls()[0].ends_with("/api/volatility-ranking?time_range=3M&limit=5"));
}

#[tokio::test]
async fn movers_accept_rows_without_company_names() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/api/top-gainers",
        r#"[
            {"symbol": "NVDA", "company_name": "NVIDIA", "current_price": 950.0, "price_change": 45.0, "percent_change": 4.97, "volume": 41000000},
            {"symbol": "AMD", "current_price": 160.0, "price_change": 6.1, "percent_change": 3.96}
        ]"#,
    ));
    let client = client_with(http);

    let movers = client.top_gainers().await.expect("movers succeed");

    assert_eq!(movers.len(), 2);
    assert_eq!(movers[0].company_name.as_deref(), Some("NVIDIA"));
    assert!(movers[1].company_name.is_none());
    assert!(movers[1].volume.is_none());
}

// =============================================================================
// Forecast, both wire styles
// =============================================================================

#[tokio::test]
async fn post_style_forecast_sends_history_and_anchors_predictions() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/predict",
        r#"{
            "explanation": "upward drift with widening bands",
            "predictions": [
                {"day": 1, "price": 191.2},
                {"day": 2, "price": "192.1"}
            ]
        }"#,
    ));
    let client = client_with(http.clone());

    let history = vec![
        history_point("2024-04-30", 188.0),
        history_point("2024-05-01", 190.0),
    ];
    let forecast = client
        .forecast(&symbol("AAPL"), &history, 2)
        .await
        .expect("forecast succeeds");

    // Day offsets are resolved against the last historical date.
    assert_eq!(forecast.points.len(), 2);
    assert_eq!(forecast.points[0].ts.format_date(), "2024-05-02");
    assert_eq!(forecast.points[1].ts.format_date(), "2024-05-03");
    assert_eq!(forecast.points[1].close, 192.1);
    assert_eq!(
        forecast.explanation.as_deref(),
        Some("upward drift with widening bands")
    );
    assert!(forecast.signal.is_none());

    // The request body carried the historical closes.
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let body = requests[0].body.as_deref().expect("post body");
    assert!(body.contains("\"2024-05-01\""));
    assert!(body.contains("\"horizon\":2"));
}

#[tokio::test]
async fn query_style_forecast_parses_signal_and_analysis() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/api/predict",
        r#"{
            "signal": "buy",
            "confidence": 0.82,
            "predictions": [
                {"date": "2024-05-02", "price": 191.2}
            ],
            "analysis": ["momentum positive", "volume supportive"]
        }"#,
    ));
    let client = query_style_client(http.clone());

    let forecast = client
        .forecast(&symbol("AAPL"), &[history_point("2024-05-01", 190.0)], 30)
        .await
        .expect("forecast succeeds");

    assert_eq!(forecast.signal, Some(Signal::Buy));
    assert_eq!(forecast.confidence, Some(0.82));
    assert_eq!(
        forecast.explanation.as_deref(),
        Some("momentum positive volume supportive")
    );
    assert!(http.request_urls()[0].ends_with("/api/predict?symbol=AAPL&days=30"));
}

#[tokio::test]
async fn an_empty_prediction_list_is_a_valid_empty_forecast() {
    let http = Arc::new(ScriptedHttpClient::new().ok("/predict", r#"{"predictions": []}"#));
    let client = client_with(http);

    let forecast = client
        .forecast(&symbol("AAPL"), &[], 30)
        .await
        .expect("forecast succeeds");

    assert!(forecast.is_empty());
    assert_eq!(forecast.dropped_points, 0);
}

#[tokio::test]
async fn day_offset_predictions_without_history_are_dropped_not_invented() {
    let http = Arc::new(ScriptedHttpClient::new().ok(
        "/predict",
        r#"{"predictions": [{"day": 1, "price": 10.0}]}"#,
    ));
    let client = client_with(http);

    // No history means no anchor for horizon offsets.
    let forecast = client
        .forecast(&symbol("AAPL"), &[], 30)
        .await
        .expect("forecast succeeds");

    assert!(forecast.points.is_empty());
    assert_eq!(forecast.dropped_points, 1);
}

// =============================================================================
// Failure classification
// =============================================================================

#[tokio::test]
async fn non_2xx_responses_surface_as_retryable_status_errors() {
    let http = Arc::new(ScriptedHttpClient::new().status("/stock/AAPL", 503));
    let client = client_with(http);

    let error = client
        .stock(&symbol("AAPL"), None)
        .await
        .expect_err("status should fail");

    assert_eq!(error, FetchError::status(503));
    assert_eq!(error.code(), "fetch.status");
    assert!(error.retryable());
}

#[tokio::test]
async fn transport_failures_surface_as_network_errors() {
    let http = Arc::new(ScriptedHttpClient::new().fail("/search", "connection refused"));
    let client = client_with(http);

    let error = client
        .search("apple", 10)
        .await
        .expect_err("network should fail");

    assert_eq!(error.code(), "fetch.network");
    assert!(error.retryable());
    assert!(error.to_string().contains("connection refused"));
}

#[tokio::test]
async fn malformed_json_surfaces_as_a_parse_error() {
    let http = Arc::new(ScriptedHttpClient::new().ok("/stock/AAPL", "<html>gateway</html>"));
    let client = client_with(http);

    let error = client
        .stock(&symbol("AAPL"), None)
        .await
        .expect_err("parse should fail");

    assert_eq!(error.code(), "fetch.parse");
    assert!(!error.retryable());
}
