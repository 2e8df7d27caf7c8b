//! Flat `(min, max)` range encoding.
//!
//! Each interval is stored as two point fields, `<name>.min` and `<name>.max`,
//! and queries test `min <= upper && max >= lower` document by document. There
//! is no pruning structure; this strategy trades query cost for two fields per
//! document.

use std::sync::Arc;

use chronomap_common::{Result, error::Error};
use chronomap_datetime::TemporalValue;
use chronomap_index_core::{
    FieldValue, IndexableField, RangeIndex, RangeIndexKind, RangePredicate, Shape, Span,
};

pub struct MinMaxRangeIndex {
    field_name: Arc<str>,
    min_field: Arc<str>,
    max_field: Arc<str>,
}

impl MinMaxRangeIndex {
    pub fn new(field_name: impl Into<Arc<str>>) -> MinMaxRangeIndex {
        let field_name = field_name.into();
        MinMaxRangeIndex {
            min_field: Arc::from(format!("{field_name}.min")),
            max_field: Arc::from(format!("{field_name}.max")),
            field_name,
        }
    }

    pub fn min_field(&self) -> &str {
        &self.min_field
    }

    pub fn max_field(&self) -> &str {
        &self.max_field
    }
}

impl RangeIndex for MinMaxRangeIndex {
    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn kind(&self) -> RangeIndexKind {
        RangeIndexKind::MinMax
    }

    fn encode(&self, from: TemporalValue, to: TemporalValue) -> Result<Shape> {
        Ok(Shape::Bounds(Span::new(from, to)?))
    }

    fn build_predicate(&self, from: TemporalValue, to: TemporalValue) -> Result<RangePredicate> {
        let span = Span::new(from, to)?;
        Ok(RangePredicate::Overlap {
            min_field: self.min_field.clone(),
            max_field: self.max_field.clone(),
            lower: span.lower(),
            upper: span.upper(),
        })
    }

    fn indexable_fields(&self, shape: &Shape) -> Result<Vec<IndexableField>> {
        let Shape::Bounds(span) = shape else {
            return Err(Error::invalid_operation(format!(
                "{}: min-max index cannot index a cell cover",
                self.field_name
            )));
        };
        Ok(vec![
            IndexableField::indexed(self.min_field.clone(), FieldValue::Long(span.lower())),
            IndexableField::indexed(self.max_field.clone(), FieldValue::Long(span.upper())),
        ])
    }
}
