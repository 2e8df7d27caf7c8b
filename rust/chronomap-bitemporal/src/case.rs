//! Topological classification of bitemporal records.
//!
//! A record falls into exactly one of four cases depending on which of its
//! upper bounds are OPEN:
//!
//! | Case | `transaction_to` OPEN | `valid_to` OPEN | valid time indexed as | transaction time indexed as |
//! |------|-----|-----|-----------------------|-----------------------------|
//! | T1   | yes | yes | point `valid_from`    | point `transaction_from`    |
//! | T2   | yes | no  | `[valid_from, valid_to]` | point `transaction_from` |
//! | T3   | no  | yes | point `valid_from`    | `[transaction_from, transaction_to]` |
//! | T4   | no  | no  | `[valid_from, valid_to]` | `[transaction_from, transaction_to]` |
//!
//! Each case writes into its own pair of range indexes, so open and closed
//! encodings never share a term space.

use std::{fmt, sync::Arc};

use chronomap_common::{Result, error::Error};
use chronomap_index_core::{RangeIndex, Span};

use crate::record::BitemporalRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Case {
    /// Currently valid and currently recorded.
    T1,
    /// Currently recorded, validity already closed.
    T2,
    /// Historical transaction, validity still open.
    T3,
    /// Fully closed historical fact.
    T4,
}

impl Case {
    pub const ALL: [Case; 4] = [Case::T1, Case::T2, Case::T3, Case::T4];

    /// Classifies from the two OPEN flags. Total over all four combinations.
    pub const fn from_open_flags(transaction_open: bool, valid_open: bool) -> Case {
        match (transaction_open, valid_open) {
            (true, true) => Case::T1,
            (true, false) => Case::T2,
            (false, true) => Case::T3,
            (false, false) => Case::T4,
        }
    }

    pub const fn ordinal(&self) -> usize {
        match self {
            Case::T1 => 0,
            Case::T2 => 1,
            Case::T3 => 2,
            Case::T4 => 3,
        }
    }

    pub fn from_ordinal(ordinal: usize) -> Result<Case> {
        Case::ALL.get(ordinal).copied().ok_or_else(|| {
            Error::invalid_arg("case", format!("no bitemporal case with ordinal {ordinal}"))
        })
    }

    /// Stable identifier used in field names.
    pub const fn id(&self) -> &'static str {
        match self {
            Case::T1 => "t1",
            Case::T2 => "t2",
            Case::T3 => "t3",
            Case::T4 => "t4",
        }
    }

    pub const fn is_transaction_open(&self) -> bool {
        matches!(self, Case::T1 | Case::T2)
    }

    pub const fn is_valid_open(&self) -> bool {
        matches!(self, Case::T1 | Case::T3)
    }

    pub const fn is_open(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Valid => self.is_valid_open(),
            Dimension::Transaction => self.is_transaction_open(),
        }
    }

    /// Value of the discriminator field: 1 when transaction time is OPEN.
    pub const fn discriminator(&self) -> i32 {
        if self.is_transaction_open() { 1 } else { 0 }
    }

    /// The span indexed for `dimension`: a point at the lower bound when that
    /// dimension is OPEN in this case, the closed range otherwise.
    pub fn indexed_span(&self, record: &BitemporalRecord, dimension: Dimension) -> Result<Span> {
        let (from, to) = match dimension {
            Dimension::Valid => (record.valid_from, record.valid_to),
            Dimension::Transaction => (record.transaction_from, record.transaction_to),
        };
        if self.is_open(dimension) {
            Ok(Span::point(from))
        } else {
            Span::new(from, to)
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Classifies a record into its case.
pub fn classify(record: &BitemporalRecord) -> Case {
    Case::from_open_flags(record.transaction_to.is_open(), record.valid_to.is_open())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Valid,
    Transaction,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::Valid, Dimension::Transaction];

    pub const fn tag(&self) -> &'static str {
        match self {
            Dimension::Valid => "v",
            Dimension::Transaction => "t",
        }
    }
}

/// The two range indexes owned by one case.
#[derive(Clone)]
pub struct CaseIndexes {
    pub valid: Arc<dyn RangeIndex>,
    pub transaction: Arc<dyn RangeIndex>,
}

impl CaseIndexes {
    pub fn get(&self, dimension: Dimension) -> &Arc<dyn RangeIndex> {
        match dimension {
            Dimension::Valid => &self.valid,
            Dimension::Transaction => &self.transaction,
        }
    }
}

/// The eight range indexes of a mapper, one [`CaseIndexes`] per case.
///
/// Built once at mapper construction, read-only afterwards.
#[derive(Clone)]
pub struct CaseTable {
    t1: CaseIndexes,
    t2: CaseIndexes,
    t3: CaseIndexes,
    t4: CaseIndexes,
}

impl CaseTable {
    /// Builds the table, calling `make` once per case and dimension.
    pub fn build<F>(mut make: F) -> Result<CaseTable>
    where
        F: FnMut(Case, Dimension) -> Result<Arc<dyn RangeIndex>>,
    {
        let mut indexes = |case| -> Result<CaseIndexes> {
            Ok(CaseIndexes {
                valid: make(case, Dimension::Valid)?,
                transaction: make(case, Dimension::Transaction)?,
            })
        };
        Ok(CaseTable {
            t1: indexes(Case::T1)?,
            t2: indexes(Case::T2)?,
            t3: indexes(Case::T3)?,
            t4: indexes(Case::T4)?,
        })
    }

    pub fn get(&self, case: Case) -> &CaseIndexes {
        match case {
            Case::T1 => &self.t1,
            Case::T2 => &self.t2,
            Case::T3 => &self.t3,
            Case::T4 => &self.t4,
        }
    }
}
