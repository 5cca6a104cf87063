use serde::{Deserialize, Serialize};

/// Which wire shape the forecast service speaks.
///
/// The deployed backends expose the same logical forecast through two
/// different surfaces; the client supports both and normalizes either
/// into [`crate::Forecast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStyle {
    /// `POST /predict` with the historical closes in the request body.
    PostHistory,
    /// `GET /api/predict?symbol=&days=` with server-side history.
    QuerySymbol,
}

/// Base URLs and transport budget for the three dashboard backends.
///
/// Defaults match the development deployment: quote/search on 8000,
/// volatility on 8001, forecast on 8002.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub quote_base: String,
    pub volatility_base: String,
    pub forecast_base: String,
    pub forecast_style: ForecastStyle,
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            quote_base: String::from("http://localhost:8000"),
            volatility_base: String::from("http://localhost:8001"),
            forecast_base: String::from("http://localhost:8002"),
            forecast_style: ForecastStyle::PostHistory,
            timeout_ms: 3_000,
        }
    }
}

impl BackendConfig {
    /// Default configuration with `QUOTEDECK_*` environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("QUOTEDECK_QUOTE_URL") {
            config.quote_base = value;
        }
        if let Ok(value) = std::env::var("QUOTEDECK_VOLATILITY_URL") {
            config.volatility_base = value;
        }
        if let Ok(value) = std::env::var("QUOTEDECK_FORECAST_URL") {
            config.forecast_base = value;
        }
        if let Ok(value) = std::env::var("QUOTEDECK_FORECAST_STYLE") {
            match value.trim().to_ascii_lowercase().as_str() {
                "post" | "post_history" => config.forecast_style = ForecastStyle::PostHistory,
                "query" | "query_symbol" => config.forecast_style = ForecastStyle::QuerySymbol,
                _ => {}
            }
        }
        config
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dev_deployment_ports() {
        let config = BackendConfig::default();
        assert_eq!(config.quote_base, "http://localhost:8000");
        assert_eq!(config.volatility_base, "http://localhost:8001");
        assert_eq!(config.forecast_base, "http://localhost:8002");
        assert_eq!(config.forecast_style, ForecastStyle::PostHistory);
    }
}
