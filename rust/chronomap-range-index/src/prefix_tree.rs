//! Hierarchical prefix-tree range encoding.
//!
//! The tree spans the unsigned 64-bit domain. Every level consumes
//! `precision_step` bits of the position, so a cell at level `l` covers
//! `2^(64 - l * precision_step)` consecutive positions; level 0 is the root,
//! the deepest level holds single milliseconds.
//!
//! An interval is indexed as its *cover*: the minimal set of cells fully
//! inside it. For each cover cell the document receives a *leaf* term, and for
//! each strict ancestor of a cover cell a *prefix* term. A query interval is
//! turned into its own cover; a document matches when it holds
//!
//! - a leaf term for some query cell or one of its ancestors (a document cell
//!   contains a query cell), or
//! - a prefix term for some query cell (a query cell strictly contains a
//!   document cell).
//!
//! Tree cells are either nested or disjoint, so these two cases are exactly
//! the ways two covers can intersect.

use std::sync::Arc;

use ahash::AHashSet;
use chronomap_common::{Result, error::Error, verify_arg};
use chronomap_datetime::TemporalValue;
use chronomap_index_core::{
    Cell, FieldValue, IndexableField, RangeIndex, RangeIndexKind, RangePredicate, Shape, Span,
    Term,
};

/// Tag byte of a term marking a cover cell.
const LEAF_TAG: u8 = 0x01;

/// Tag byte of a term marking a strict ancestor of a cover cell.
const PREFIX_TAG: u8 = 0x02;

/// Default number of bits consumed per tree level.
pub const DEFAULT_PRECISION_STEP: u8 = 4;

pub struct PrefixTreeRangeIndex {
    field_name: Arc<str>,
    precision_step: u8,
    max_level: u8,
}

impl PrefixTreeRangeIndex {
    /// Creates a prefix-tree index writing terms under `field_name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `precision_step` is 1, 2, 4 or 8.
    pub fn new(
        field_name: impl Into<Arc<str>>,
        precision_step: u8,
    ) -> Result<PrefixTreeRangeIndex> {
        verify_arg!(precision_step, matches!(precision_step, 1 | 2 | 4 | 8));
        Ok(PrefixTreeRangeIndex {
            field_name: field_name.into(),
            precision_step,
            max_level: 64 / precision_step,
        })
    }

    pub fn precision_step(&self) -> u8 {
        self.precision_step
    }

    /// Number of levels below the root.
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Returns the cell at `level` containing `position`.
    pub fn cell_at(&self, level: u8, position: u64) -> Cell {
        let mask = self.mask(level);
        let start = position & !mask;
        Cell::new(level, start, start | mask)
    }

    /// Computes the minimal sorted set of cells covering `span`.
    pub fn cover(&self, span: &Span) -> Vec<Cell> {
        let mut cells = Vec::new();
        self.cover_cell(self.cell_at(0, 0), span.lower(), span.upper(), &mut cells);
        cells
    }

    /// Low-bit mask of positions inside a cell at `level`.
    fn mask(&self, level: u8) -> u64 {
        let shift = 64 - level as u32 * self.precision_step as u32;
        if shift >= 64 {
            u64::MAX
        } else {
            (1u64 << shift) - 1
        }
    }

    fn cover_cell(&self, cell: Cell, lo: u64, hi: u64, out: &mut Vec<Cell>) {
        if lo <= cell.start() && cell.end() <= hi {
            out.push(cell);
            return;
        }
        // A deepest-level cell holds one position and is either inside or outside.
        debug_assert!(cell.level() < self.max_level);

        let child_level = cell.level() + 1;
        let first = lo.max(cell.start());
        let last = hi.min(cell.end());
        let mut child = self.cell_at(child_level, first);
        loop {
            self.cover_cell(child, lo, hi, out);
            if child.end() >= last {
                break;
            }
            child = self.cell_at(child_level, child.end() + 1);
        }
    }

    fn ancestors(&self, cell: &Cell) -> impl Iterator<Item = Cell> + '_ {
        let start = cell.start();
        (0..cell.level()).map(move |level| self.cell_at(level, start))
    }

    fn term(tag: u8, cell: &Cell) -> Term {
        let mut bytes = [0u8; 10];
        bytes[0] = tag;
        bytes[1] = cell.level();
        bytes[2..].copy_from_slice(&cell.start().to_be_bytes());
        Term::new(bytes.to_vec())
    }

    /// Returns the terms indexed for a cover: leaf terms first, then prefix
    /// terms, each group sorted by cell.
    pub fn cover_terms(&self, cells: &[Cell]) -> Vec<Term> {
        let mut prefixes: Vec<Cell> = cells
            .iter()
            .flat_map(|cell| self.ancestors(cell))
            .collect::<AHashSet<_>>()
            .into_iter()
            .collect();
        prefixes.sort_unstable();

        cells
            .iter()
            .map(|cell| Self::term(LEAF_TAG, cell))
            .chain(prefixes.iter().map(|cell| Self::term(PREFIX_TAG, cell)))
            .collect()
    }
}

impl RangeIndex for PrefixTreeRangeIndex {
    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn kind(&self) -> RangeIndexKind {
        RangeIndexKind::PrefixTree
    }

    fn encode(&self, from: TemporalValue, to: TemporalValue) -> Result<Shape> {
        let span = Span::new(from, to)?;
        let cells = self.cover(&span);
        log::trace!(
            "{}: encoded [{from}, {to}] as {} cells",
            self.field_name,
            cells.len()
        );
        Ok(Shape::Cover { span, cells })
    }

    fn build_predicate(&self, from: TemporalValue, to: TemporalValue) -> Result<RangePredicate> {
        let span = Span::new(from, to)?;
        let mut terms = AHashSet::new();
        for cell in self.cover(&span) {
            terms.insert(Self::term(LEAF_TAG, &cell));
            terms.insert(Self::term(PREFIX_TAG, &cell));
            for ancestor in self.ancestors(&cell) {
                terms.insert(Self::term(LEAF_TAG, &ancestor));
            }
        }
        log::trace!(
            "{}: predicate for [{from}, {to}] has {} terms",
            self.field_name,
            terms.len()
        );
        Ok(RangePredicate::AnyTerm {
            field: self.field_name.clone(),
            terms,
        })
    }

    fn indexable_fields(&self, shape: &Shape) -> Result<Vec<IndexableField>> {
        match shape {
            Shape::Cover { cells, .. } => Ok(self
                .cover_terms(cells)
                .into_iter()
                .map(|term| IndexableField::indexed(self.field_name.clone(), FieldValue::Term(term)))
                .collect()),
            Shape::Bounds(_) => Err(Error::invalid_operation(format!(
                "{}: prefix tree cannot index a bounds shape",
                self.field_name
            ))),
        }
    }
}
