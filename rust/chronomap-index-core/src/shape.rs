//! Encoded interval shapes.

use chronomap_common::{Result, error::Error};
use chronomap_datetime::TemporalValue;

/// A closed interval `[from, to]` of temporal values.
///
/// An OPEN `to` makes the span unbounded on the right: on the index domain it
/// extends to the last representable position rather than to a fixed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    from: TemporalValue,
    to: TemporalValue,
}

impl Span {
    pub fn new(from: TemporalValue, to: TemporalValue) -> Result<Span> {
        if from > to {
            return Err(Error::invalid_interval(from.millis(), to.millis()));
        }
        Ok(Span { from, to })
    }

    pub fn point(at: TemporalValue) -> Span {
        Span { from: at, to: at }
    }

    /// The whole domain, `[MIN, OPEN]`.
    pub fn unbounded() -> Span {
        Span {
            from: TemporalValue::MIN,
            to: TemporalValue::MAX,
        }
    }

    pub fn from(&self) -> TemporalValue {
        self.from
    }

    pub fn to(&self) -> TemporalValue {
        self.to
    }

    pub fn is_point(&self) -> bool {
        self.from == self.to
    }

    pub fn is_unbounded(&self) -> bool {
        self.to.is_open()
    }

    /// Lower bound on the unsigned index domain.
    pub fn lower(&self) -> u64 {
        domain_position(self.from)
    }

    /// Upper bound (inclusive) on the unsigned index domain. OPEN maps to
    /// `u64::MAX`, above every bounded instant.
    pub fn upper(&self) -> u64 {
        domain_position(self.to)
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.lower() <= other.upper() && other.lower() <= self.upper()
    }
}

/// Maps a temporal value onto the unsigned index domain.
pub fn domain_position(value: TemporalValue) -> u64 {
    if value.is_open() {
        u64::MAX
    } else {
        value.millis() as u64
    }
}

/// A cell of a hierarchical range tree: the inclusive domain range
/// `[start, end]` at the given depth.
///
/// Cells of one tree are either nested or disjoint, so two cells intersect
/// exactly when one contains the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    start: u64,
    end: u64,
    level: u8,
}

impl Cell {
    pub fn new(level: u8, start: u64, end: u64) -> Cell {
        debug_assert!(start <= end);
        Cell { start, end, level }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn contains(&self, other: &Cell) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn intersects(&self, other: &Cell) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// The encoded representation of an interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// A minimal, sorted, disjoint set of tree cells covering the span.
    Cover { span: Span, cells: Vec<Cell> },
    /// The span itself, stored as a `(min, max)` pair.
    Bounds(Span),
}

impl Shape {
    pub fn span(&self) -> Span {
        match self {
            Shape::Cover { span, .. } => *span,
            Shape::Bounds(span) => *span,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        match self {
            Shape::Cover { cells, .. } => cells,
            Shape::Bounds(_) => &[],
        }
    }

    /// Tests whether two shapes share at least one instant.
    ///
    /// Two covers are compared cell by cell; any other combination falls back
    /// to the spans.
    pub fn intersects(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Cover { cells: a, .. }, Shape::Cover { cells: b, .. }) => {
                sorted_cells_intersect(a, b)
            }
            _ => self.span().overlaps(&other.span()),
        }
    }
}

/// Two-pointer scan over two sorted, disjoint cell lists.
fn sorted_cells_intersect(a: &[Cell], b: &[Cell]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].intersects(&b[j]) {
            return true;
        }
        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(millis: i64) -> TemporalValue {
        TemporalValue::try_from_millis(millis).unwrap()
    }

    #[test]
    fn test_span() {
        let span = Span::new(t(10), t(20)).unwrap();
        assert_eq!((span.lower(), span.upper()), (10, 20));
        assert!(!span.is_point());
        assert!(Span::point(t(5)).is_point());
        assert!(Span::new(t(20), t(10)).is_err());

        let open = Span::new(t(30), TemporalValue::MAX).unwrap();
        assert!(open.is_unbounded());
        assert_eq!(open.upper(), u64::MAX);
        assert!(open.overlaps(&Span::point(t(i64::MAX - 1))));
        assert!(!open.overlaps(&span));
        assert!(span.overlaps(&Span::point(t(20))));
    }

    #[test]
    fn test_cell_relations() {
        let parent = Cell::new(1, 0, 15);
        let child = Cell::new(2, 4, 7);
        let sibling = Cell::new(1, 16, 31);
        assert!(parent.contains(&child));
        assert!(!child.contains(&parent));
        assert!(parent.intersects(&child));
        assert!(!parent.intersects(&sibling));
    }

    #[test]
    fn test_cover_intersection() {
        let span = Span::new(t(0), t(100)).unwrap();
        let a = Shape::Cover {
            span,
            cells: vec![Cell::new(2, 0, 15), Cell::new(2, 32, 47)],
        };
        let b = Shape::Cover {
            span,
            cells: vec![Cell::new(2, 16, 31), Cell::new(3, 48, 51)],
        };
        let c = Shape::Cover {
            span,
            cells: vec![Cell::new(3, 36, 39)],
        };
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
        assert!(Shape::Bounds(span).intersects(&b));
    }
}
