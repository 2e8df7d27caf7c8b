//! Mapper configuration.
//!
//! The configuration is usually read from the JSON index schema:
//!
//! ```json
//! {
//!     "vt_from": "vt_from",
//!     "vt_to": "vt_to",
//!     "tt_from": "tt_from",
//!     "tt_to": "tt_to",
//!     "pattern": "%Y/%m/%d",
//!     "now_value": "3000/01/01"
//! }
//! ```
//!
//! The camel-case spellings (`validFrom`, `nowValue`, ...) are accepted too.

use chronomap_common::Result;
use chronomap_datetime::RawValue;
use chronomap_index_core::RangeIndexKind;
use chronomap_range_index::RangeIndexOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BitemporalMapperConfig {
    /// Column holding the valid time start.
    #[serde(default, alias = "validFrom")]
    pub vt_from: String,

    /// Column holding the valid time stop.
    #[serde(default, alias = "validTo")]
    pub vt_to: String,

    /// Column holding the transaction time start.
    #[serde(default, alias = "transactionFrom")]
    pub tt_from: String,

    /// Column holding the transaction time stop.
    #[serde(default, alias = "transactionTo")]
    pub tt_to: String,

    /// Date pattern in strftime syntax; [`DEFAULT_PATTERN`](chronomap_datetime::DEFAULT_PATTERN)
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// The value standing for "now"; the maximum instant when absent.
    #[serde(default, alias = "nowValue", skip_serializing_if = "Option::is_none")]
    pub now_value: Option<NowValue>,

    /// `"prefix-tree"` (default) or `"min-max"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_strategy: Option<String>,

    /// Bits per prefix-tree level (1, 2, 4 or 8).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision_step: Option<u8>,
}

/// A raw "now" value: epoch milliseconds or a date formatted with the pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NowValue {
    Millis(i64),
    Text(String),
}

impl From<&NowValue> for RawValue {
    fn from(value: &NowValue) -> Self {
        match value {
            NowValue::Millis(millis) => RawValue::Int(*millis),
            NowValue::Text(text) => RawValue::Text(text.clone()),
        }
    }
}

impl BitemporalMapperConfig {
    /// Creates a configuration binding the four temporal columns.
    pub fn new(
        vt_from: impl Into<String>,
        vt_to: impl Into<String>,
        tt_from: impl Into<String>,
        tt_to: impl Into<String>,
    ) -> BitemporalMapperConfig {
        BitemporalMapperConfig {
            vt_from: vt_from.into(),
            vt_to: vt_to.into(),
            tt_from: tt_from.into(),
            tt_to: tt_to.into(),
            ..Default::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_now_value(mut self, now_value: NowValue) -> Self {
        self.now_value = Some(now_value);
        self
    }

    pub fn with_range_strategy(mut self, kind: RangeIndexKind) -> Self {
        self.range_strategy = Some(kind.name().to_string());
        self
    }

    pub fn with_precision_step(mut self, precision_step: u8) -> Self {
        self.precision_step = Some(precision_step);
        self
    }

    pub fn from_json(json: &str) -> Result<BitemporalMapperConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<BitemporalMapperConfig> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn range_index_kind(&self) -> Result<RangeIndexKind> {
        match self.range_strategy.as_deref() {
            Some(name) => RangeIndexKind::try_from(name),
            None => Ok(RangeIndexKind::PrefixTree),
        }
    }

    pub fn range_index_options(&self) -> RangeIndexOptions {
        let mut options = RangeIndexOptions::default();
        if let Some(step) = self.precision_step {
            options.precision_step = step;
        }
        options
    }
}
