//! Core range-indexing infrastructure for chronomap.
//!
//! This crate defines the seam between the bitemporal field mapper and the
//! strategies that turn a time interval into indexable data.
//!
//! # Overview
//!
//! The system is built around the [`RangeIndex`] trait, a capability with two
//! dual operations:
//!
//! - [`RangeIndex::encode`] turns an interval into a [`Shape`], which
//!   [`RangeIndex::indexable_fields`] lowers into [`IndexableField`]s added to a
//!   [`Document`].
//! - [`RangeIndex::build_predicate`] turns a requested interval into a
//!   [`RangePredicate`] that matches every document whose encoded interval
//!   intersects it, and no other.
//!
//! A `RangeIndex` holds configuration only (a field name and strategy
//! parameters). It is built once and shared read-only across threads.

use std::fmt;

use chronomap_common::{Result, error::Error};
use chronomap_datetime::TemporalValue;

pub mod document;
pub mod predicate;
pub mod shape;

pub use document::{Document, FieldValue, IndexableField, Term};
pub use predicate::RangePredicate;
pub use shape::{Cell, Shape, Span};

/// An encoder and predicate builder for one interval-valued dimension.
///
/// # Thread Safety
///
/// Range indexes are shared across indexing threads via `Arc`, hence the
/// `Send + Sync + 'static` bound. Implementations must not keep per-document
/// state.
pub trait RangeIndex: Send + Sync + 'static {
    /// Returns the base name of the index fields produced by this instance.
    ///
    /// The name is part of the on-disk field layout and must be stable.
    fn field_name(&self) -> &str;

    /// Returns the encoding strategy of this instance.
    fn kind(&self) -> RangeIndexKind;

    /// Encodes the closed interval `[from, to]`.
    ///
    /// An OPEN `to` encodes as unbounded on the right. A point interval
    /// (`from == to`) encodes as a zero-width range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInterval` if `from > to`.
    fn encode(&self, from: TemporalValue, to: TemporalValue) -> Result<Shape>;

    /// Builds the predicate matching every shape previously encoded by this
    /// index whose interval intersects `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInterval` if `from > to`.
    fn build_predicate(&self, from: TemporalValue, to: TemporalValue) -> Result<RangePredicate>;

    /// Lowers a shape produced by [`encode`](Self::encode) into index fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the shape was produced by a different
    /// strategy.
    fn indexable_fields(&self, shape: &Shape) -> Result<Vec<IndexableField>>;
}

/// The available range encoding strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeIndexKind {
    /// Hierarchical prefix tree: an interval is indexed as the minimal set of
    /// tree cells covering it, so queries prune by cell.
    PrefixTree,
    /// A `(min, max)` pair per document, tested linearly at query time.
    MinMax,
}

impl RangeIndexKind {
    pub const fn name(&self) -> &'static str {
        match self {
            RangeIndexKind::PrefixTree => "prefix-tree",
            RangeIndexKind::MinMax => "min-max",
        }
    }
}

impl TryFrom<&str> for RangeIndexKind {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "prefix-tree" => Ok(RangeIndexKind::PrefixTree),
            "min-max" => Ok(RangeIndexKind::MinMax),
            _ => Err(Error::invalid_arg(
                "range_strategy",
                format!("Unrecognized range strategy: {name}"),
            )),
        }
    }
}

impl fmt::Display for RangeIndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
