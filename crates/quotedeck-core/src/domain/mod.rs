mod models;
mod period;
mod symbol;
mod timestamp;

pub use models::{
    Forecast, Mover, RiskLevel, SearchHit, Selected, Signal, StockQuote, VolatilityRank,
    VolatilityRanking, VolatilityReport,
};
pub use period::{Period, TimeRange};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
