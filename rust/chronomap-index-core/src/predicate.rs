//! Query-time predicates produced by [`RangeIndex::build_predicate`](crate::RangeIndex::build_predicate).

use std::sync::Arc;

use ahash::AHashSet;

use crate::document::{Document, Term};

/// A predicate over one index dimension, evaluated against documents.
///
/// The search engine evaluating it is outside this crate; [`matches`](Self::matches)
/// gives the reference semantics over a single [`Document`].
#[derive(Debug, Clone)]
pub enum RangePredicate {
    /// Matches documents holding at least one of `terms` under `field`.
    AnyTerm {
        field: Arc<str>,
        terms: AHashSet<Term>,
    },
    /// Matches documents whose stored `[min, max]` pair intersects
    /// `[lower, upper]`.
    Overlap {
        min_field: Arc<str>,
        max_field: Arc<str>,
        lower: u64,
        upper: u64,
    },
}

impl RangePredicate {
    /// Returns the field (or `min` field) the predicate reads.
    pub fn field(&self) -> &str {
        match self {
            RangePredicate::AnyTerm { field, .. } => field,
            RangePredicate::Overlap { min_field, .. } => min_field,
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            RangePredicate::AnyTerm { field, terms } => {
                document.terms(field).any(|term| terms.contains(term))
            }
            RangePredicate::Overlap {
                min_field,
                max_field,
                lower,
                upper,
            } => match (document.long_value(min_field), document.long_value(max_field)) {
                (Some(min), Some(max)) => min <= *upper && max >= *lower,
                _ => false,
            },
        }
    }
}
