//! The bitemporal field mapper.

use std::{fmt, sync::Arc};

use chronomap_common::{Result, error::Error};
use chronomap_datetime::{DateParser, NowCeiling, RawValue, TemporalValue, parse_temporal};
use chronomap_index_core::{
    Document, FieldValue, IndexableField, RangeIndex, RangeIndexKind, RangePredicate, Shape, Span,
};
use chronomap_range_index::create_range_index;

use crate::{
    case::{Case, CaseTable, Dimension, classify},
    columns::ColumnSource,
    config::{BitemporalMapperConfig, NowValue},
    record::BitemporalRecord,
};

/// Suffix of the stored field telling currently recorded documents apart.
pub const DISCRIMINATOR_SUFFIX: &str = "T1UT2";

/// The contract a field mapper fulfils towards the generic field-mapping
/// framework.
pub trait Mapper: Send + Sync {
    /// The name of the mapped field.
    fn field(&self) -> &str;

    /// The record columns this mapper reads.
    fn mapped_columns(&self) -> Vec<&str>;

    /// Adds the index fields of one record to `document`.
    ///
    /// Either every field is added or, on error, none is.
    fn add_fields(&self, document: &mut Document, columns: &dyn ColumnSource) -> Result<()>;

    /// Returns the sort key for this field.
    fn sort_field(&self, name: &str, reverse: bool) -> Result<SortField>;
}

/// A sort key on a mapped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub reverse: bool,
}

/// The encoded shapes of one record.
#[derive(Debug, Clone)]
pub struct RecordShapes {
    pub case: Case,
    pub valid: Shape,
    pub transaction: Shape,
}

/// Maps the four temporal columns of a record onto index fields.
///
/// The mapper holds configuration only: the column names, the date parser, the
/// "now" ceiling and eight range indexes (one per case and dimension), all
/// fixed at construction. It is shared read-only across indexing threads.
pub struct BitemporalMapper {
    field: String,
    vt_from: String,
    vt_to: String,
    tt_from: String,
    tt_to: String,
    parser: DateParser,
    ceiling: NowCeiling,
    kind: RangeIndexKind,
    cases: CaseTable,
    discriminator: Arc<str>,
}

impl BitemporalMapper {
    /// Creates a mapper for `field`.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredColumn` if a column name is blank, checked in the
    ///   order `vt_from`, `vt_to`, `tt_from`, `tt_to`
    /// - `InvalidArgument` for an invalid pattern, range strategy or precision
    ///   step
    /// - `UnparsableTemporalValue` or `InvalidTemporalValue` if the "now"
    ///   value cannot be turned into a ceiling
    pub fn new(
        field: impl Into<String>,
        config: &BitemporalMapperConfig,
    ) -> Result<BitemporalMapper> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(Error::invalid_arg("field", "field name is empty"));
        }

        for (column, value) in [
            ("vt_from", &config.vt_from),
            ("vt_to", &config.vt_to),
            ("tt_from", &config.tt_from),
            ("tt_to", &config.tt_to),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_column(column));
            }
        }

        let parser = match &config.pattern {
            Some(pattern) => DateParser::new(pattern.as_str())?,
            None => DateParser::default(),
        };
        let ceiling = match &config.now_value {
            Some(now) => Self::parse_ceiling(&parser, now)?,
            None => NowCeiling::UNBOUNDED,
        };

        let kind = config.range_index_kind()?;
        let options = config.range_index_options();
        let cases = CaseTable::build(|case, dimension| {
            create_range_index(kind, Self::index_field_name(&field, case, dimension), &options)
        })?;
        let discriminator: Arc<str> = Arc::from(format!("{field}.{DISCRIMINATOR_SUFFIX}"));

        log::debug!(
            "bitemporal mapper '{field}': columns [{}, {}, {}, {}], pattern '{}', now {}, strategy {kind}",
            config.vt_from,
            config.vt_to,
            config.tt_from,
            config.tt_to,
            parser.pattern(),
            ceiling.millis(),
        );

        Ok(BitemporalMapper {
            vt_from: config.vt_from.clone(),
            vt_to: config.vt_to.clone(),
            tt_from: config.tt_from.clone(),
            tt_to: config.tt_to.clone(),
            field,
            parser,
            ceiling,
            kind,
            cases,
            discriminator,
        })
    }

    fn parse_ceiling(parser: &DateParser, now: &NowValue) -> Result<NowCeiling> {
        let millis = match now {
            NowValue::Millis(millis) => *millis,
            NowValue::Text(text) => parser.parse_str(text)?,
        };
        NowCeiling::new(millis)
    }

    fn index_field_name(field: &str, case: Case, dimension: Dimension) -> String {
        format!("{field}.{}_{}", case.id(), dimension.tag())
    }

    pub fn parser(&self) -> &DateParser {
        &self.parser
    }

    pub fn ceiling(&self) -> NowCeiling {
        self.ceiling
    }

    pub fn range_index_kind(&self) -> RangeIndexKind {
        self.kind
    }

    /// The configured column names in `vt_from`, `vt_to`, `tt_from`, `tt_to`
    /// order.
    pub fn columns(&self) -> [&str; 4] {
        [&self.vt_from, &self.vt_to, &self.tt_from, &self.tt_to]
    }

    pub fn range_index_for(&self, case: Case, dimension: Dimension) -> &Arc<dyn RangeIndex> {
        self.cases.get(case).get(dimension)
    }

    /// Returns the range index of the case with the given ordinal (0 to 3).
    pub fn range_index_at(
        &self,
        ordinal: usize,
        dimension: Dimension,
    ) -> Result<&Arc<dyn RangeIndex>> {
        Ok(self.range_index_for(Case::from_ordinal(ordinal)?, dimension))
    }

    pub fn field_name_for(&self, case: Case, dimension: Dimension) -> &str {
        self.range_index_for(case, dimension).field_name()
    }

    pub fn discriminator_field_name(&self) -> &str {
        &self.discriminator
    }

    /// Reads and parses the four temporal columns.
    ///
    /// Returns `Ok(None)` when all four are absent.
    pub fn read_record(&self, columns: &dyn ColumnSource) -> Result<Option<BitemporalRecord>> {
        let names = self.columns();
        let mut parts = [None; 4];
        for (part, name) in parts.iter_mut().zip(names) {
            *part = self.read_column(columns, name)?;
        }
        BitemporalRecord::from_parts(parts)
            .map_err(|missing| Error::incomplete_record(names[missing]))
    }

    fn read_column(
        &self,
        columns: &dyn ColumnSource,
        name: &str,
    ) -> Result<Option<TemporalValue>> {
        match columns.column_value(name) {
            Some(value) => self.parse_value(value),
            None => Ok(None),
        }
    }

    /// Parses a single raw value the way column values are parsed.
    pub fn parse_value(&self, value: &RawValue) -> Result<Option<TemporalValue>> {
        parse_temporal(value, &self.parser, self.ceiling)
    }

    /// Classifies a record and encodes both of its dimensions.
    pub fn shapes(&self, record: &BitemporalRecord) -> Result<RecordShapes> {
        let case = classify(record);
        let encode = |dimension| -> Result<Shape> {
            let span = case.indexed_span(record, dimension)?;
            self.range_index_for(case, dimension)
                .encode(span.from(), span.to())
        };
        let shapes = RecordShapes {
            case,
            valid: encode(Dimension::Valid)?,
            transaction: encode(Dimension::Transaction)?,
        };
        log::trace!(
            "{}: {case} valid [{}, {}] in {} cells, transaction [{}, {}] in {} cells",
            self.field,
            self.parser.format(record.valid_from),
            self.parser.format(record.valid_to),
            shapes.valid.cells().len(),
            self.parser.format(record.transaction_from),
            self.parser.format(record.transaction_to),
            shapes.transaction.cells().len(),
        );
        Ok(shapes)
    }

    /// Computes every index field of one record without touching a document.
    pub fn index_fields(&self, columns: &dyn ColumnSource) -> Result<Vec<IndexableField>> {
        let Some(record) = self.read_record(columns)? else {
            return Ok(Vec::new());
        };
        let shapes = self.shapes(&record)?;
        let indexes = self.cases.get(shapes.case);

        let mut fields = indexes.valid.indexable_fields(&shapes.valid)?;
        fields.push(IndexableField::stored(
            self.discriminator.clone(),
            FieldValue::Int(shapes.case.discriminator()),
        ));
        fields.extend(indexes.transaction.indexable_fields(&shapes.transaction)?);
        Ok(fields)
    }

    /// Builds the predicate over the `case` index of `dimension` matching
    /// every record of that case whose interval intersects `[from, to]`.
    ///
    /// A dimension OPEN in `case` was indexed as a point at its lower bound,
    /// standing for `[lower, OPEN]`; that point intersects `[from, to]` exactly
    /// when it lies in `[MIN, to]`.
    pub fn within_range(
        &self,
        case: Case,
        dimension: Dimension,
        from: TemporalValue,
        to: TemporalValue,
    ) -> Result<RangePredicate> {
        let window = Span::new(from, to)?;
        let from = if case.is_open(dimension) {
            TemporalValue::MIN
        } else {
            window.from()
        };
        self.range_index_for(case, dimension)
            .build_predicate(from, window.to())
    }
}

impl Mapper for BitemporalMapper {
    fn field(&self) -> &str {
        &self.field
    }

    fn mapped_columns(&self) -> Vec<&str> {
        self.columns().to_vec()
    }

    fn add_fields(&self, document: &mut Document, columns: &dyn ColumnSource) -> Result<()> {
        let fields = self.index_fields(columns)?;
        document.extend(fields);
        Ok(())
    }

    fn sort_field(&self, _name: &str, _reverse: bool) -> Result<SortField> {
        Err(Error::unsupported_sort(&self.field))
    }
}

impl fmt::Debug for BitemporalMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitemporalMapper")
            .field("field", &self.field)
            .field("vt_from", &self.vt_from)
            .field("vt_to", &self.vt_to)
            .field("tt_from", &self.tt_from)
            .field("tt_to", &self.tt_to)
            .field("pattern", &self.parser.pattern())
            .field("now", &self.ceiling.millis())
            .field("kind", &self.kind)
            .finish()
    }
}
