use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

const DATE_ONLY: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const NAIVE_DATETIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Timestamp guaranteed to be UTC.
///
/// Backend revisions emit dates in several shapes: bare `2024-01-01`
/// strings, RFC3339, and naive `2024-01-01 16:00:00` datetimes. All of
/// them parse into this one type; naive values are treated as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parse any of the accepted backend date formats.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self(parsed.to_offset(UtcOffset::UTC)));
        }
        if let Ok(date) = Date::parse(trimmed, DATE_ONLY) {
            return Ok(Self::from_date(date));
        }
        if let Ok(naive) = PrimitiveDateTime::parse(trimmed, NAIVE_DATETIME) {
            return Ok(Self(naive.assume_utc()));
        }

        Err(ValidationError::UnparseableTimestamp {
            value: input.to_owned(),
        })
    }

    pub fn from_date(date: Date) -> Self {
        Self(date.midnight().assume_utc())
    }

    pub fn date(self) -> Date {
        self.0.date()
    }

    /// Offset by whole days; used to anchor forecast horizon indexes.
    ///
    /// `None` when the result would leave the representable date range,
    /// so a nonsense offset from a backend record can be rejected
    /// instead of panicking.
    pub fn plus_days(self, days: i64) -> Option<Self> {
        let seconds = days.checked_mul(86_400)?;
        self.0.checked_add(Duration::seconds(seconds)).map(Self)
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UtcDateTime must be RFC3339 formattable")
    }

    /// `YYYY-MM-DD` rendering used by table output and forecast requests.
    pub fn format_date(self) -> String {
        self.0
            .date()
            .format(DATE_ONLY)
            .expect("UtcDateTime date must be formattable")
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_timestamp() {
        let parsed = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn parses_bare_date_as_utc_midnight() {
        let parsed = UtcDateTime::parse("2024-01-01").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        let parsed = UtcDateTime::parse("2024-01-14 16:00:00").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-14T16:00:00Z");
    }

    #[test]
    fn normalizes_offset_timestamps_to_utc() {
        let parsed = UtcDateTime::parse("2024-01-01T01:00:00+01:00").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn rejects_garbage() {
        let err = UtcDateTime::parse("not-a-date").expect_err("must fail");
        assert!(matches!(err, ValidationError::UnparseableTimestamp { .. }));
    }

    #[test]
    fn plus_days_advances_the_date() {
        let base = UtcDateTime::parse("2024-02-28").expect("must parse");
        let advanced = base.plus_days(2).expect("within range");
        assert_eq!(advanced.format_date(), "2024-03-01");
    }

    #[test]
    fn plus_days_refuses_offsets_outside_the_date_range() {
        let base = UtcDateTime::parse("2024-02-28").expect("must parse");
        assert!(base.plus_days(4_000_000_000).is_none());
        assert!(base.plus_days(i64::MAX).is_none());
    }
}
