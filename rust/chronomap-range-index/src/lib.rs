//! Range index strategies.
//!
//! - **Prefix tree** (`"prefix-tree"`): hierarchical cell cover, see [`PrefixTreeRangeIndex`]
//! - **Min/max** (`"min-max"`): a `(min, max)` pair per document, see [`MinMaxRangeIndex`]
//!
//! ```rust
//! use chronomap_datetime::TemporalValue;
//! use chronomap_index_core::{Document, RangeIndexKind};
//! use chronomap_range_index::{RangeIndexOptions, create_range_index};
//!
//! let index = create_range_index(
//!     RangeIndexKind::PrefixTree,
//!     "when.t4_v",
//!     &RangeIndexOptions::default(),
//! )
//! .unwrap();
//!
//! let from = TemporalValue::try_from_millis(1000).unwrap();
//! let to = TemporalValue::try_from_millis(2000).unwrap();
//! let mut doc = Document::new();
//! doc.extend(index.indexable_fields(&index.encode(from, to).unwrap()).unwrap());
//!
//! let at = TemporalValue::try_from_millis(1500).unwrap();
//! assert!(index.build_predicate(at, at).unwrap().matches(&doc));
//! ```

use std::sync::Arc;

use chronomap_common::Result;
use chronomap_index_core::{RangeIndex, RangeIndexKind};

pub mod min_max;
pub mod prefix_tree;

pub use min_max::MinMaxRangeIndex;
pub use prefix_tree::{DEFAULT_PRECISION_STEP, PrefixTreeRangeIndex};

/// Strategy parameters shared by the indexes a mapper builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeIndexOptions {
    /// Bits consumed per prefix-tree level. Ignored by other strategies.
    pub precision_step: u8,
}

impl Default for RangeIndexOptions {
    fn default() -> Self {
        RangeIndexOptions {
            precision_step: DEFAULT_PRECISION_STEP,
        }
    }
}

/// Creates a range index of the given kind writing under `field_name`.
///
/// # Errors
///
/// Returns an [`InvalidArgument`](chronomap_common::error::ErrorKind::InvalidArgument)
/// error if the options are invalid for the strategy.
pub fn create_range_index(
    kind: RangeIndexKind,
    field_name: impl Into<Arc<str>>,
    options: &RangeIndexOptions,
) -> Result<Arc<dyn RangeIndex>> {
    match kind {
        RangeIndexKind::PrefixTree => Ok(Arc::new(PrefixTreeRangeIndex::new(
            field_name,
            options.precision_step,
        )?)),
        RangeIndexKind::MinMax => Ok(Arc::new(MinMaxRangeIndex::new(field_name))),
    }
}
