//! Query-side range building.
//!
//! A bitemporal query asks for the records whose valid time intersects one
//! window and whose transaction time intersects another. Since each case
//! writes into its own indexes, the query is the union of one [`CasePredicate`]
//! per case.
//!
//! OPEN dimensions are handled by [`BitemporalMapper::within_range`], which
//! widens the window of a case whose dimension is OPEN to `[MIN, b]`.

use std::sync::Arc;

use chronomap_common::Result;
use chronomap_datetime::TemporalValue;
use chronomap_index_core::{Document, RangePredicate, Span};

use crate::{
    case::{Case, Dimension},
    mapper::BitemporalMapper,
};

/// The predicate over the two indexes of one case.
#[derive(Debug, Clone)]
pub struct CasePredicate {
    pub case: Case,
    pub valid: RangePredicate,
    pub transaction: RangePredicate,
}

impl CasePredicate {
    pub fn matches(&self, document: &Document) -> bool {
        self.valid.matches(document) && self.transaction.matches(document)
    }
}

/// Builder of a [`BitemporalPredicate`].
///
/// ```rust
/// use chronomap_bitemporal::{BitemporalMapper, BitemporalMapperConfig, BitemporalQuery};
/// use chronomap_datetime::TemporalValue;
///
/// let config = BitemporalMapperConfig::new("vt_from", "vt_to", "tt_from", "tt_to");
/// let mapper = BitemporalMapper::new("when", &config).unwrap();
///
/// let at = TemporalValue::try_from_millis(1_000).unwrap();
/// let predicate = BitemporalQuery::new()
///     .valid_within(at, at)
///     .unwrap()
///     .currently_recorded(true)
///     .build(&mapper)
///     .unwrap();
/// assert_eq!(predicate.cases().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BitemporalQuery {
    valid: Span,
    transaction: Span,
    cases: Vec<Case>,
    currently_recorded: Option<bool>,
}

impl Default for BitemporalQuery {
    fn default() -> Self {
        BitemporalQuery {
            valid: Span::unbounded(),
            transaction: Span::unbounded(),
            cases: Case::ALL.to_vec(),
            currently_recorded: None,
        }
    }
}

impl BitemporalQuery {
    pub fn new() -> BitemporalQuery {
        BitemporalQuery::default()
    }

    /// Restricts the valid time to records intersecting `[from, to]`.
    pub fn valid_within(mut self, from: TemporalValue, to: TemporalValue) -> Result<Self> {
        self.valid = Span::new(from, to)?;
        Ok(self)
    }

    /// Restricts the transaction time to records intersecting `[from, to]`.
    pub fn transaction_within(mut self, from: TemporalValue, to: TemporalValue) -> Result<Self> {
        self.transaction = Span::new(from, to)?;
        Ok(self)
    }

    /// Restricts the query to the given cases.
    pub fn cases(mut self, cases: impl IntoIterator<Item = Case>) -> Self {
        let mut cases = cases.into_iter().collect::<Vec<_>>();
        cases.sort();
        cases.dedup();
        self.cases = cases;
        self
    }

    /// Restricts the query to records whose transaction time is (or is not)
    /// OPEN, as recorded by the discriminator field.
    pub fn currently_recorded(mut self, recorded: bool) -> Self {
        self.currently_recorded = Some(recorded);
        self
    }

    pub fn build(&self, mapper: &BitemporalMapper) -> Result<BitemporalPredicate> {
        let cases = self
            .cases
            .iter()
            .copied()
            .filter(|case| {
                self.currently_recorded
                    .is_none_or(|recorded| case.is_transaction_open() == recorded)
            })
            .map(|case| -> Result<CasePredicate> {
                Ok(CasePredicate {
                    case,
                    valid: mapper.within_range(
                        case,
                        Dimension::Valid,
                        self.valid.from(),
                        self.valid.to(),
                    )?,
                    transaction: mapper.within_range(
                        case,
                        Dimension::Transaction,
                        self.transaction.from(),
                        self.transaction.to(),
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::trace!(
            "{}: bitemporal query over {} case(s)",
            mapper.discriminator_field_name(),
            cases.len()
        );

        Ok(BitemporalPredicate {
            discriminator: Arc::from(mapper.discriminator_field_name()),
            discriminator_value: self.currently_recorded.map(i32::from),
            cases,
        })
    }
}

/// The union of per-case predicates of a bitemporal query.
#[derive(Debug, Clone)]
pub struct BitemporalPredicate {
    discriminator: Arc<str>,
    discriminator_value: Option<i32>,
    cases: Vec<CasePredicate>,
}

impl BitemporalPredicate {
    pub fn cases(&self) -> &[CasePredicate] {
        &self.cases
    }

    pub fn matches(&self, document: &Document) -> bool {
        let recorded = self
            .discriminator_value
            .is_none_or(|expected| document.int_value(&self.discriminator) == Some(expected));
        recorded && self.cases.iter().any(|case| case.matches(document))
    }
}
