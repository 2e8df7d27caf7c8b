//! Parsing of raw column values into epoch milliseconds.

use chrono::{
    DateTime, NaiveDate, NaiveDateTime, NaiveTime,
    format::{Item, StrftimeItems},
};
use chronomap_common::{Result, error::Error};

use crate::{NowCeiling, RawValue, TemporalValue};

/// The default date pattern, in strftime syntax: `2015/03/21 10:25:00.000 +0000`.
pub const DEFAULT_PATTERN: &str = "%Y/%m/%d %H:%M:%S%.3f %z";

/// Parses raw column values into epoch milliseconds.
///
/// Accepted inputs:
/// - integers, taken as epoch milliseconds
/// - finite floating point numbers, truncated toward zero
/// - native timestamps
/// - text matching the pattern, either with an offset, as a naive date-time
///   (taken as UTC), or as a bare date (UTC midnight)
/// - text holding an integer literal
///
/// The parser does not apply the "now" ceiling; see [`parse_temporal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParser {
    pattern: String,
}

impl DateParser {
    /// Creates a parser for the given pattern.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pattern is empty or contains an
    /// unknown specifier.
    pub fn new(pattern: impl Into<String>) -> Result<DateParser> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(Error::invalid_arg("pattern", "date pattern is empty"));
        }
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(Error::invalid_arg(
                "pattern",
                format!("invalid date pattern '{pattern}'"),
            ));
        }
        Ok(DateParser { pattern })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parses a raw value into epoch milliseconds.
    ///
    /// Returns `Ok(None)` for [`RawValue::Null`].
    pub fn parse(&self, value: &RawValue) -> Result<Option<i64>> {
        match value {
            RawValue::Null => Ok(None),
            RawValue::Int(millis) => Ok(Some(*millis)),
            RawValue::Float(f) => {
                if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Ok(Some(f.trunc() as i64))
                } else {
                    Err(Error::unparsable(f.to_string(), &self.pattern))
                }
            }
            RawValue::Timestamp(t) => Ok(Some(t.timestamp_millis())),
            RawValue::Text(s) => self.parse_str(s).map(Some),
        }
    }

    /// Parses text into epoch milliseconds.
    pub fn parse_str(&self, s: &str) -> Result<i64> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_str(s, &self.pattern) {
            return Ok(dt.timestamp_millis());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, &self.pattern) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, &self.pattern) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
        s.parse::<i64>()
            .map_err(|_| Error::unparsable(s, &self.pattern))
    }

    /// Formats a temporal value with the pattern.
    ///
    /// Instants outside the calendar range (the OPEN sentinel among them) are
    /// rendered as their raw milliseconds.
    pub fn format(&self, value: TemporalValue) -> String {
        match value.to_datetime() {
            Some(dt) if !value.is_open() => dt.format(&self.pattern).to_string(),
            _ => value.to_string(),
        }
    }
}

impl Default for DateParser {
    fn default() -> Self {
        DateParser {
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

/// Parses a raw value and validates it against the ceiling.
///
/// Returns `Ok(None)` for absent values. A parsed instant equal to the ceiling
/// becomes [`TemporalValue::MAX`]; an instant above it fails with
/// `TemporalValueOutOfRange`.
pub fn parse_temporal(
    value: &RawValue,
    parser: &DateParser,
    ceiling: NowCeiling,
) -> Result<Option<TemporalValue>> {
    match parser.parse(value)? {
        Some(millis) => ceiling.normalize(millis).map(Some),
        None => Ok(None),
    }
}
