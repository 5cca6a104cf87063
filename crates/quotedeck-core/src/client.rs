//! HTTP client for the three dashboard backends.
//!
//! One logical client fronts the quote/search service, the volatility
//! service and the forecast service. Wire shapes vary across backend
//! revisions; every response funnels through the canonical domain types
//! and the series normalizer before callers see it.

use std::sync::Arc;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{BackendConfig, ForecastStyle};
use crate::http::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::series::{coerce_f64, coerce_u64, normalize, Normalized, SeriesKind, TimeSeriesPoint};
use crate::{
    FetchError, Forecast, Mover, Period, RiskLevel, SearchHit, Signal, StockQuote, Symbol,
    TimeRange, VolatilityRank, VolatilityRanking, VolatilityReport,
};

/// Quote card plus chart series as loaded for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceView {
    /// Absent after a period-only refresh applied over a cleared state.
    pub quote: Option<StockQuote>,
    pub series: Normalized,
}

/// Client over the dashboard's collaborator services.
pub struct DashboardClient {
    config: BackendConfig,
    http: Arc<dyn HttpClient>,
}

impl DashboardClient {
    pub fn new(config: BackendConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    /// Production client: env-configured endpoints over reqwest.
    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env(), Arc::new(ReqwestHttpClient::new()))
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// `GET /search?query=` on the quote service.
    ///
    /// Backend order is preserved; rows with unparseable symbols are
    /// skipped rather than failing the whole list.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, FetchError> {
        let url = format!(
            "{}/search?query={}",
            self.config.quote_base,
            urlencoding::encode(query)
        );
        let body = self.get_json(&url).await?;

        let rows: Vec<SearchRow> = serde_json::from_value(body)
            .map_err(|error| FetchError::parse(format!("search response: {error}")))?;

        let hits = rows
            .into_iter()
            .filter_map(|row| {
                let symbol = Symbol::parse(&row.symbol).ok()?;
                SearchHit::new(symbol, row.company).ok()
            })
            .take(limit)
            .collect();

        Ok(hits)
    }

    /// `GET /stock/{symbol}[?period=]`: quote snapshot plus chart series.
    pub async fn stock(
        &self,
        symbol: &Symbol,
        period: Option<Period>,
    ) -> Result<PriceView, FetchError> {
        let mut url = format!("{}/stock/{}", self.config.quote_base, symbol);
        if let Some(period) = period {
            url.push_str("?period=");
            url.push_str(period.as_str());
        }
        let body = self.get_json(&url).await?;

        let envelope: StockEnvelope = serde_json::from_value(body)
            .map_err(|error| FetchError::parse(format!("stock response: {error}")))?;

        let quote = envelope.stock_data.into_quote(symbol);
        let series = normalize(&envelope.chart_data, SeriesKind::Price, None);

        Ok(PriceView {
            quote: Some(quote),
            series,
        })
    }

    /// `GET /chart/{symbol}?period=`: period refresh without re-quoting.
    pub async fn chart(&self, symbol: &Symbol, period: Period) -> Result<Normalized, FetchError> {
        let url = format!(
            "{}/chart/{}?period={}",
            self.config.quote_base,
            symbol,
            period.as_str()
        );
        let body = self.get_json(&url).await?;

        let envelope: ChartEnvelope = serde_json::from_value(body)
            .map_err(|error| FetchError::parse(format!("chart response: {error}")))?;

        Ok(normalize(&envelope.chart_data, SeriesKind::Price, None))
    }

    /// `GET /api/volatility/{symbol}?time_range=` on the volatility service.
    pub async fn volatility(
        &self,
        symbol: &Symbol,
        range: TimeRange,
    ) -> Result<VolatilityReport, FetchError> {
        let url = format!(
            "{}/api/volatility/{}?time_range={}",
            self.config.volatility_base,
            symbol,
            range.as_str()
        );
        let body = self.get_json(&url).await?;

        let wire: VolatilityWire = serde_json::from_value(body)
            .map_err(|error| FetchError::parse(format!("volatility response: {error}")))?;

        let rolling = normalize(&wire.data_points, SeriesKind::Volatility, None);
        let risk_level = wire
            .risk_level
            .as_deref()
            .and_then(parse_risk_level)
            .unwrap_or_else(|| RiskLevel::from_volatility(wire.historical_volatility));

        Ok(VolatilityReport {
            symbol: Symbol::parse(&wire.symbol)?,
            company_name: wire.company_name,
            current_price: wire.current_price,
            historical_volatility: wire.historical_volatility,
            avg_volatility: wire.avg_volatility,
            max_volatility: wire.max_volatility,
            min_volatility: wire.min_volatility,
            risk_level,
            points: rolling.points,
            dropped_points: rolling.dropped,
        })
    }

    /// `GET /api/volatility-ranking?time_range=&limit=`.
    pub async fn volatility_ranking(
        &self,
        range: TimeRange,
        limit: usize,
    ) -> Result<VolatilityRanking, FetchError> {
        let url = format!(
            "{}/api/volatility-ranking?time_range={}&limit={}",
            self.config.volatility_base,
            range.as_str(),
            limit
        );
        let body = self.get_json(&url).await?;

        let wire: RankingWire = serde_json::from_value(body)
            .map_err(|error| FetchError::parse(format!("ranking response: {error}")))?;

        Ok(VolatilityRanking {
            most_volatile: convert_rank_rows(wire.most_volatile),
            least_volatile: convert_rank_rows(wire.least_volatile),
        })
    }

    /// `GET /api/top-gainers` on the quote service.
    pub async fn top_gainers(&self) -> Result<Vec<Mover>, FetchError> {
        self.movers("top-gainers").await
    }

    /// `GET /api/top-losers` on the quote service.
    pub async fn top_losers(&self) -> Result<Vec<Mover>, FetchError> {
        self.movers("top-losers").await
    }

    async fn movers(&self, listing: &str) -> Result<Vec<Mover>, FetchError> {
        let url = format!("{}/api/{}", self.config.quote_base, listing);
        let body = self.get_json(&url).await?;

        let rows: Vec<MoverWire> = serde_json::from_value(body)
            .map_err(|error| FetchError::parse(format!("{listing} response: {error}")))?;

        let movers = rows
            .into_iter()
            .filter_map(|row| {
                Some(Mover {
                    symbol: Symbol::parse(&row.symbol).ok()?,
                    company_name: row.company_name,
                    current_price: row.current_price,
                    price_change: row.price_change,
                    percent_change: row.percent_change,
                    volume: row.volume,
                })
            })
            .collect();

        Ok(movers)
    }

    /// Fetch a multi-day forecast through whichever wire shape the
    /// configured forecast service speaks.
    ///
    /// `history` is the freshly loaded price series for the symbol; its
    /// last date anchors horizon-indexed predictions, and under
    /// [`ForecastStyle::PostHistory`] its closes form the request body.
    pub async fn forecast(
        &self,
        symbol: &Symbol,
        history: &[TimeSeriesPoint],
        horizon: usize,
    ) -> Result<Forecast, FetchError> {
        match self.config.forecast_style {
            ForecastStyle::PostHistory => self.forecast_post(symbol, history, horizon).await,
            ForecastStyle::QuerySymbol => self.forecast_query(symbol, history, horizon).await,
        }
    }

    async fn forecast_post(
        &self,
        symbol: &Symbol,
        history: &[TimeSeriesPoint],
        horizon: usize,
    ) -> Result<Forecast, FetchError> {
        let url = format!("{}/predict", self.config.forecast_base);
        let payload = json!({
            "history": history
                .iter()
                .map(|point| json!({
                    "date": point.ts.format_date(),
                    "close": point.close,
                }))
                .collect::<Vec<_>>(),
            "horizon": horizon,
        });

        let request = HttpRequest::post_json(&url, payload.to_string())
            .with_timeout_ms(self.config.timeout_ms);
        let body = self.execute_json(request).await?;

        let wire: ForecastPostWire = serde_json::from_value(body)
            .map_err(|error| FetchError::parse(format!("forecast response: {error}")))?;

        let anchor = history.last().map(|point| point.ts);
        let normalized = normalize(&wire.predictions, SeriesKind::Forecast, anchor);

        Ok(Forecast {
            symbol: Some(symbol.clone()),
            signal: None,
            confidence: None,
            explanation: wire.explanation,
            points: normalized.points,
            dropped_points: normalized.dropped,
        })
    }

    async fn forecast_query(
        &self,
        symbol: &Symbol,
        history: &[TimeSeriesPoint],
        horizon: usize,
    ) -> Result<Forecast, FetchError> {
        let url = format!(
            "{}/api/predict?symbol={}&days={}",
            self.config.forecast_base, symbol, horizon
        );
        let body = self.get_json(&url).await?;

        let wire: ForecastQueryWire = serde_json::from_value(body)
            .map_err(|error| FetchError::parse(format!("forecast response: {error}")))?;

        let anchor = history.last().map(|point| point.ts);
        let normalized = normalize(&wire.predictions, SeriesKind::Forecast, anchor);

        Ok(Forecast {
            symbol: Some(symbol.clone()),
            signal: wire.signal.as_deref().and_then(parse_signal),
            confidence: wire.confidence,
            explanation: explanation_from_analysis(wire.analysis),
            points: normalized.points,
            dropped_points: normalized.dropped,
        })
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.execute_json(HttpRequest::get(url).with_timeout_ms(self.config.timeout_ms))
            .await
    }

    async fn execute_json(&self, request: HttpRequest) -> Result<Value, FetchError> {
        debug!(url = %request.url, "issuing backend request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| FetchError::network(error.message()))?;

        if !response.is_success() {
            return Err(FetchError::status(response.status));
        }

        serde_json::from_str(&response.body)
            .map_err(|error| FetchError::parse(format!("malformed JSON body: {error}")))
    }
}

fn convert_rank_rows(rows: Vec<RankRowWire>) -> Vec<VolatilityRank> {
    rows.into_iter()
        .filter_map(|row| {
            let risk_level = row
                .risk_level
                .as_deref()
                .and_then(parse_risk_level)
                .unwrap_or_else(|| RiskLevel::from_volatility(row.volatility));
            Some(VolatilityRank {
                symbol: Symbol::parse(&row.symbol).ok()?,
                company_name: row.company_name,
                volatility: row.volatility,
                risk_level,
                current_price: row.current_price,
            })
        })
        .collect()
}

fn parse_risk_level(value: &str) -> Option<RiskLevel> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" => Some(RiskLevel::Low),
        "medium" => Some(RiskLevel::Medium),
        "high" => Some(RiskLevel::High),
        _ => None,
    }
}

fn parse_signal(value: &str) -> Option<Signal> {
    match value.trim().to_ascii_uppercase().as_str() {
        "BUY" => Some(Signal::Buy),
        "SELL" => Some(Signal::Sell),
        "HOLD" => Some(Signal::Hold),
        _ => None,
    }
}

fn explanation_from_analysis(analysis: Vec<String>) -> Option<String> {
    if analysis.is_empty() {
        None
    } else {
        Some(analysis.join(" "))
    }
}

// Wire-side response structures. Numeric fields arrive as either JSON
// numbers or quoted strings depending on the backend revision, hence the
// lenient deserializers.

#[derive(Debug, Clone, Deserialize)]
struct SearchRow {
    symbol: String,
    #[serde(alias = "company_name")]
    company: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StockEnvelope {
    stock_data: StockDataWire,
    #[serde(default)]
    chart_data: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    chart_data: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct StockDataWire {
    #[serde(default)]
    symbol: Option<String>,
    company_name: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    current_price: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    change: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    change_percent: f64,
    #[serde(default, deserialize_with = "de_lenient_opt_u64")]
    volume: Option<u64>,
    #[serde(default, deserialize_with = "de_lenient_opt_f64")]
    market_cap: Option<f64>,
}

impl StockDataWire {
    fn into_quote(self, requested: &Symbol) -> StockQuote {
        // Some revisions echo the symbol back, some do not; the requested
        // symbol is authoritative either way.
        let symbol = match self.symbol.as_deref() {
            Some(raw) => Symbol::parse(raw).unwrap_or_else(|_| requested.clone()),
            None => requested.clone(),
        };
        StockQuote {
            symbol,
            company_name: self.company_name,
            current_price: self.current_price,
            change: self.change,
            change_percent: self.change_percent,
            volume: self.volume,
            market_cap: self.market_cap,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct VolatilityWire {
    symbol: String,
    company_name: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    current_price: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    historical_volatility: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    avg_volatility: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    max_volatility: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    min_volatility: f64,
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(default)]
    data_points: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct RankingWire {
    #[serde(default)]
    most_volatile: Vec<RankRowWire>,
    #[serde(default)]
    least_volatile: Vec<RankRowWire>,
}

#[derive(Debug, Clone, Deserialize)]
struct RankRowWire {
    symbol: String,
    #[serde(default)]
    company_name: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    volatility: f64,
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(deserialize_with = "de_lenient_f64")]
    current_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct MoverWire {
    symbol: String,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(deserialize_with = "de_lenient_f64")]
    current_price: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    price_change: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    percent_change: f64,
    #[serde(default, deserialize_with = "de_lenient_opt_u64")]
    volume: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ForecastPostWire {
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    predictions: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ForecastQueryWire {
    #[serde(default)]
    signal: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_opt_f64")]
    confidence: Option<f64>,
    #[serde(default)]
    predictions: Vec<Value>,
    #[serde(default)]
    analysis: Vec<String>,
}

fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_f64(&value).ok_or_else(|| DeError::custom("expected a finite number"))
}

fn de_lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(coerce_f64(&value))
}

fn de_lenient_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(coerce_u64(&value))
}
