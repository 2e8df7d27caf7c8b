use chronomap_datetime::TemporalValue;

/// The parsed temporal columns of one record.
///
/// Only exists for the duration of one indexing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitemporalRecord {
    pub valid_from: TemporalValue,
    pub valid_to: TemporalValue,
    pub transaction_from: TemporalValue,
    pub transaction_to: TemporalValue,
}

impl BitemporalRecord {
    pub fn new(
        valid_from: TemporalValue,
        valid_to: TemporalValue,
        transaction_from: TemporalValue,
        transaction_to: TemporalValue,
    ) -> BitemporalRecord {
        BitemporalRecord {
            valid_from,
            valid_to,
            transaction_from,
            transaction_to,
        }
    }

    /// Builds a record from four optional values, as read from the columns.
    ///
    /// Returns `Ok(None)` when all four are absent. When only some are absent,
    /// returns the index (0..4, in `valid_from`, `valid_to`, `transaction_from`,
    /// `transaction_to` order) of the first missing one.
    pub fn from_parts(
        parts: [Option<TemporalValue>; 4],
    ) -> std::result::Result<Option<BitemporalRecord>, usize> {
        match parts {
            [None, None, None, None] => Ok(None),
            [Some(vf), Some(vt), Some(tf), Some(tt)] => {
                Ok(Some(BitemporalRecord::new(vf, vt, tf, tt)))
            }
            _ => Err(parts.iter().position(Option::is_none).unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let t = TemporalValue::try_from_millis(1000).unwrap();
        assert_eq!(BitemporalRecord::from_parts([None; 4]), Ok(None));
        assert_eq!(
            BitemporalRecord::from_parts([Some(t); 4]),
            Ok(Some(BitemporalRecord::new(t, t, t, t)))
        );
        assert_eq!(
            BitemporalRecord::from_parts([Some(t), None, Some(t), None]),
            Err(1)
        );
        assert_eq!(
            BitemporalRecord::from_parts([Some(t), Some(t), Some(t), None]),
            Err(3)
        );
    }
}
