//! CLI argument definitions for quotedeck.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Search symbols and company names |
//! | `stock` | Fetch quote snapshot plus chart series |
//! | `chart` | Refresh the chart series for a period |
//! | `volatility` | Volatility analysis for one symbol |
//! | `ranking` | Most/least volatile listings |
//! | `movers` | Top gainers or losers |
//! | `forecast` | Multi-day price forecast |
//! | `overview` | Select a symbol and load all three data kinds |

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Stock dashboard client over the quote, volatility and forecast services.
///
/// Backend endpoints default to the development deployment
/// (localhost:8000/8001/8002) and are overridable via `QUOTEDECK_*`
/// environment variables.
#[derive(Debug, Parser)]
#[command(name = "quotedeck", author, version, about = "Stock dashboard CLI")]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 3000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search symbols and company names by prefix or substring.
    Search(SearchArgs),
    /// Fetch the quote snapshot plus chart series for a symbol.
    Stock(StockArgs),
    /// Refresh only the chart series for a symbol and period.
    Chart(ChartArgs),
    /// Volatility analysis for one symbol over a time range.
    Volatility(VolatilityArgs),
    /// Most/least volatile ranking across the catalog.
    Ranking(RankingArgs),
    /// Top gainers or losers listing.
    Movers(MoversArgs),
    /// Multi-day price forecast for one symbol.
    Forecast(ForecastArgs),
    /// Select a symbol and load history, volatility and forecast together.
    Overview(OverviewArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Query text; inputs shorter than 2 characters return nothing.
    pub query: String,

    /// Maximum number of results.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct StockArgs {
    /// Ticker symbol, e.g. AAPL.
    pub symbol: String,

    /// Chart period (1D, 1W, 1M, 3M, 6M, 1Y).
    #[arg(long)]
    pub period: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Ticker symbol.
    pub symbol: String,

    /// Chart period (1D, 1W, 1M, 3M, 6M, 1Y).
    #[arg(long, default_value = "3M")]
    pub period: String,
}

#[derive(Debug, Args)]
pub struct VolatilityArgs {
    /// Ticker symbol.
    pub symbol: String,

    /// Lookback window (1W, 1M, 3M, 6M, 1Y).
    #[arg(long, default_value = "1M")]
    pub time_range: String,
}

#[derive(Debug, Args)]
pub struct RankingArgs {
    /// Lookback window (1W, 1M, 3M, 6M, 1Y).
    #[arg(long, default_value = "1M")]
    pub time_range: String,

    /// Rows per listing.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MoverDirection {
    Gainers,
    Losers,
}

#[derive(Debug, Args)]
pub struct MoversArgs {
    /// Which listing to fetch.
    #[arg(value_enum)]
    pub direction: MoverDirection,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Ticker symbol.
    pub symbol: String,

    /// Forecast horizon in days.
    #[arg(long, default_value_t = 30)]
    pub days: usize,
}

#[derive(Debug, Args)]
pub struct OverviewArgs {
    /// Ticker symbol.
    pub symbol: String,

    /// Chart period (1D, 1W, 1M, 3M, 6M, 1Y).
    #[arg(long, default_value = "3M")]
    pub period: String,

    /// Volatility lookback window (1W, 1M, 3M, 6M, 1Y).
    #[arg(long, default_value = "1M")]
    pub time_range: String,

    /// Forecast horizon in days.
    #[arg(long, default_value_t = 30)]
    pub days: usize,
}
