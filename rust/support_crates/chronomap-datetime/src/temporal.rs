use std::fmt;

use chrono::{DateTime, Utc};
use chronomap_common::{Result, error::Error};
use serde::{Deserialize, Serialize};

/// An immutable instant in time, expressed as milliseconds since the Unix epoch.
///
/// The value is never negative. [`TemporalValue::MAX`] is reserved as the OPEN
/// sentinel ("unbounded future", colloquially "now"): any raw instant equal to the
/// configured [`NowCeiling`] is normalized to it, so OPEN compares greater than
/// every bounded instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
#[repr(transparent)]
pub struct TemporalValue {
    millis: i64,
}

impl TemporalValue {
    /// The Unix epoch.
    pub const MIN: TemporalValue = TemporalValue { millis: 0 };

    /// The OPEN sentinel.
    pub const MAX: TemporalValue = TemporalValue { millis: i64::MAX };

    /// Creates a temporal value from epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTemporalValue` if `millis` is negative.
    ///
    /// # Examples
    /// ```rust
    /// # use chronomap_datetime::TemporalValue;
    /// let t = TemporalValue::try_from_millis(1000).unwrap();
    /// assert_eq!(t.millis(), 1000);
    /// assert!(TemporalValue::try_from_millis(-1).is_err());
    /// ```
    pub fn try_from_millis(millis: i64) -> Result<TemporalValue> {
        if millis < 0 {
            Err(Error::invalid_temporal(millis))
        } else {
            Ok(TemporalValue { millis })
        }
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// Returns `true` if this is the OPEN sentinel.
    pub fn is_open(&self) -> bool {
        self.millis == Self::MAX.millis
    }

    pub fn is_max(&self) -> bool {
        self.is_open()
    }

    pub fn is_min(&self) -> bool {
        self.millis == 0
    }

    /// Converts to a UTC date-time, or `None` for instants beyond chrono's range
    /// (which includes the OPEN sentinel).
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.millis)
    }
}

impl Default for TemporalValue {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for TemporalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.millis)
    }
}

impl TryFrom<i64> for TemporalValue {
    type Error = Error;

    fn try_from(millis: i64) -> Result<Self> {
        TemporalValue::try_from_millis(millis)
    }
}

impl From<TemporalValue> for i64 {
    fn from(value: TemporalValue) -> Self {
        value.millis
    }
}

/// The configured "now" ceiling of a mapper.
///
/// This is plain configuration: it is fixed when a mapper is built and passed
/// explicitly into every parse call. Changing it means building a new mapper.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct NowCeiling(i64);

impl NowCeiling {
    /// The default ceiling: the maximum representable instant.
    pub const UNBOUNDED: NowCeiling = NowCeiling(i64::MAX);

    pub fn new(millis: i64) -> Result<NowCeiling> {
        if millis < 0 {
            return Err(Error::invalid_temporal(millis));
        }
        Ok(NowCeiling(millis))
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Validates a raw instant against the ceiling.
    ///
    /// - above the ceiling: `TemporalValueOutOfRange`
    /// - equal to the ceiling: [`TemporalValue::MAX`] (OPEN)
    /// - below the ceiling: the instant itself, which must be non-negative
    pub fn normalize(&self, millis: i64) -> Result<TemporalValue> {
        if millis > self.0 {
            Err(Error::out_of_range(millis, self.0))
        } else if millis == self.0 {
            Ok(TemporalValue::MAX)
        } else {
            TemporalValue::try_from_millis(millis)
        }
    }
}

impl TryFrom<i64> for NowCeiling {
    type Error = Error;

    fn try_from(millis: i64) -> Result<Self> {
        NowCeiling::new(millis)
    }
}

impl From<NowCeiling> for i64 {
    fn from(value: NowCeiling) -> Self {
        value.0
    }
}

impl Default for NowCeiling {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronomap_common::error::ErrorKind;

    #[test]
    fn test_ordering() {
        let a = TemporalValue::try_from_millis(1).unwrap();
        let b = TemporalValue::try_from_millis(i64::MAX - 1).unwrap();
        assert!(TemporalValue::MIN < a);
        assert!(a < b);
        assert!(b < TemporalValue::MAX);
        assert_eq!(std::cmp::max(a, TemporalValue::MAX), TemporalValue::MAX);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_predicates() {
        assert!(TemporalValue::MIN.is_min());
        assert!(!TemporalValue::MIN.is_open());
        assert!(TemporalValue::MAX.is_open());
        assert!(TemporalValue::MAX.is_max());
        assert!(TemporalValue::MAX.to_datetime().is_none());
        assert_eq!(
            TemporalValue::MIN.to_datetime().unwrap().to_rfc3339(),
            "1970-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_negative_rejected() {
        let err = TemporalValue::try_from_millis(-5).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidTemporalValue { value: -5 }
        ));
    }

    #[test]
    fn test_ceiling_normalization() {
        let ceiling = NowCeiling::new(5000).unwrap();
        assert_eq!(ceiling.normalize(4999).unwrap().millis(), 4999);
        assert!(ceiling.normalize(5000).unwrap().is_open());
        assert!(matches!(
            ceiling.normalize(5001).unwrap_err().kind(),
            ErrorKind::TemporalValueOutOfRange {
                value: 5001,
                ceiling: 5000
            }
        ));

        let unbounded = NowCeiling::default();
        assert!(unbounded.normalize(i64::MAX).unwrap().is_open());
        assert_eq!(unbounded.normalize(0).unwrap(), TemporalValue::MIN);
    }
}
