use serde::{Deserialize, Serialize};

use crate::series::TimeSeriesPoint;
use crate::{Symbol, ValidationError};

/// One ranked search match as shown in the autocomplete dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub symbol: Symbol,
    pub company_name: String,
}

impl SearchHit {
    pub fn new(symbol: Symbol, company_name: impl Into<String>) -> Result<Self, ValidationError> {
        let company_name = company_name.into();
        if company_name.trim().is_empty() {
            return Err(ValidationError::EmptyCompanyName);
        }
        Ok(Self {
            symbol,
            company_name,
        })
    }
}

/// The single process-wide selection.
///
/// Symbol and company name always change together; the only mutation path
/// is `SelectionCoordinator::select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selected {
    pub symbol: Symbol,
    pub company_name: String,
}

impl From<SearchHit> for Selected {
    fn from(hit: SearchHit) -> Self {
        Self {
            symbol: hit.symbol,
            company_name: hit.company_name,
        }
    }
}

/// Current quote snapshot from the stock endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: Symbol,
    pub company_name: String,
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: Option<u64>,
    pub market_cap: Option<f64>,
}

/// Client-side risk classification derived from annualized volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Thresholds match the volatility service: >= 30 High, >= 15 Medium.
    pub fn from_volatility(volatility: f64) -> Self {
        if volatility >= 30.0 {
            Self::High
        } else if volatility >= 15.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Volatility analysis for one symbol over one time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityReport {
    pub symbol: Symbol,
    pub company_name: String,
    pub current_price: f64,
    pub historical_volatility: f64,
    pub avg_volatility: f64,
    pub max_volatility: f64,
    pub min_volatility: f64,
    pub risk_level: RiskLevel,
    /// Rolling volatility series; metric value lives in `close`.
    pub points: Vec<TimeSeriesPoint>,
    /// Rolling-window records the backend sent that failed normalization.
    pub dropped_points: usize,
}

/// One row of the most/least volatile ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRank {
    pub symbol: Symbol,
    pub company_name: String,
    pub volatility: f64,
    pub risk_level: RiskLevel,
    pub current_price: f64,
}

/// Most/least volatile listings returned together by the ranking endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRanking {
    pub most_volatile: Vec<VolatilityRank>,
    pub least_volatile: Vec<VolatilityRank>,
}

/// One row of the top gainers/losers listing.
///
/// Older backend revisions omit the company name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub symbol: Symbol,
    pub company_name: Option<String>,
    pub current_price: f64,
    pub price_change: f64,
    pub percent_change: f64,
    pub volume: Option<u64>,
}

/// Trading signal attached to query-style forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// Normalized multi-day price forecast.
///
/// Both forecast wire shapes converge here. An empty `points` list is a
/// valid "no forecast available" outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub symbol: Option<Symbol>,
    pub signal: Option<Signal>,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub points: Vec<TimeSeriesPoint>,
    pub dropped_points: usize,
}

impl Forecast {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
