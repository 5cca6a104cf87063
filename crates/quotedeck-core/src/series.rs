//! Time-series normalization.
//!
//! Backend revisions disagree on field names (`close` vs `price`,
//! `volatility` vs `value`), date encodings, numeric types (numbers vs
//! quoted strings) and ordering. `normalize` reconciles all of them into
//! one ascending, chart-ready sequence. It is a pure function: no I/O, no
//! shared state, identical output for identical input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::UtcDateTime;

/// Which logical series a raw record list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Price,
    Volatility,
    Forecast,
}

impl SeriesKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Volatility => "volatility",
            Self::Forecast => "forecast",
        }
    }
}

/// Canonical chart point.
///
/// `close` is the required value slot; for volatility series it carries
/// the rolling metric. OHLC extras and volume survive when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub ts: UtcDateTime,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

/// Result of a normalization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    pub points: Vec<TimeSeriesPoint>,
    /// Records dropped for a missing or uncoercible required field.
    pub dropped: usize,
}

impl Normalized {
    pub const fn empty() -> Self {
        Self {
            points: Vec::new(),
            dropped: 0,
        }
    }

    pub fn last_timestamp(&self) -> Option<UtcDateTime> {
        self.points.last().map(|point| point.ts)
    }
}

/// Convert raw backend records into an ordered canonical series.
///
/// `anchor` is the last known historical date; it is required to resolve
/// forecast records that carry a `day` horizon offset instead of a date.
/// Records that cannot produce a timestamp and a finite value are dropped
/// and counted, never fabricated. Duplicate timestamps keep the last
/// record the backend sent.
pub fn normalize(records: &[Value], kind: SeriesKind, anchor: Option<UtcDateTime>) -> Normalized {
    let mut by_ts: BTreeMap<UtcDateTime, TimeSeriesPoint> = BTreeMap::new();
    let mut dropped = 0_usize;

    for record in records {
        match normalize_record(record, kind, anchor) {
            Some(point) => {
                by_ts.insert(point.ts, point);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(
            kind = kind.as_str(),
            dropped,
            total = records.len(),
            "dropped records during series normalization"
        );
    }

    Normalized {
        points: by_ts.into_values().collect(),
        dropped,
    }
}

fn normalize_record(
    record: &Value,
    kind: SeriesKind,
    anchor: Option<UtcDateTime>,
) -> Option<TimeSeriesPoint> {
    let record = record.as_object()?;

    let ts = record
        .get("date")
        .or_else(|| record.get("timestamp"))
        .and_then(parse_timestamp)
        .or_else(|| {
            // Query-style forecasts index points by horizon day offset.
            if kind == SeriesKind::Forecast {
                let day = record.get("day").and_then(Value::as_i64)?;
                anchor?.plus_days(day)
            } else {
                None
            }
        })?;

    let close = match kind {
        SeriesKind::Price | SeriesKind::Forecast => record
            .get("close")
            .or_else(|| record.get("price"))
            .and_then(coerce_f64)?,
        SeriesKind::Volatility => record
            .get("volatility")
            .or_else(|| record.get("value"))
            .and_then(coerce_f64)?,
    };

    Some(TimeSeriesPoint {
        ts,
        close,
        open: record.get("open").and_then(coerce_f64),
        high: record.get("high").and_then(coerce_f64),
        low: record.get("low").and_then(coerce_f64),
        volume: record.get("volume").and_then(coerce_u64),
    })
}

fn parse_timestamp(value: &Value) -> Option<UtcDateTime> {
    UtcDateTime::parse(value.as_str()?).ok()
}

/// Accept JSON numbers and numeric strings; reject non-finite values.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

pub(crate) fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}
