use std::{collections::HashMap, sync::Arc};

use chrono::{TimeZone, Utc};
use chronomap_bitemporal::{
    BitemporalMapper, BitemporalMapperConfig, BitemporalQuery, BitemporalRecord, Case, Columns,
    Dimension, Mapper, NowValue,
};
use chronomap_common::error::ErrorKind;
use chronomap_datetime::{RawValue, TemporalValue};
use chronomap_index_core::{Document, FieldValue, RangeIndexKind, Span};
use rayon::prelude::*;

const OPEN: i64 = i64::MAX;

fn t(millis: i64) -> TemporalValue {
    TemporalValue::try_from_millis(millis).unwrap()
}

fn config() -> BitemporalMapperConfig {
    BitemporalMapperConfig::new("vt_from", "vt_to", "tt_from", "tt_to")
}

fn mapper_with(config: BitemporalMapperConfig) -> BitemporalMapper {
    BitemporalMapper::new("when", &config).unwrap()
}

fn record_columns(vf: i64, vt: i64, tf: i64, tt: i64) -> Columns {
    Columns::new()
        .add("vt_from", vf)
        .add("vt_to", vt)
        .add("tt_from", tf)
        .add("tt_to", tt)
}

fn index(mapper: &BitemporalMapper, columns: &Columns) -> Document {
    let mut doc = Document::new();
    mapper.add_fields(&mut doc, columns).unwrap();
    doc
}

#[test]
fn test_currently_valid_and_recorded() {
    let mapper = mapper_with(config().with_now_value(NowValue::Millis(10_000)));
    let columns = record_columns(1000, 10_000, 1000, 10_000);

    let record = mapper.read_record(&columns).unwrap().unwrap();
    assert!(record.valid_to.is_open());
    assert!(record.transaction_to.is_open());

    let shapes = mapper.shapes(&record).unwrap();
    assert_eq!(shapes.case, Case::T1);
    assert_eq!(shapes.valid.span(), Span::point(t(1000)));
    assert_eq!(shapes.transaction.span(), Span::point(t(1000)));
    assert_eq!(shapes.valid.cells().len(), 1);

    let doc = index(&mapper, &columns);
    assert_eq!(
        doc.field_names(),
        vec!["when.t1_v", "when.T1UT2", "when.t1_t"]
    );
    assert_eq!(doc.int_value("when.T1UT2"), Some(1));
    let discriminator = doc.fields_named("when.T1UT2").next().unwrap();
    assert!(discriminator.is_stored());
}

#[test]
fn test_closed_record() {
    let mapper = mapper_with(config());
    let doc = index(&mapper, &record_columns(1000, 2000, 1500, 2500));

    assert_eq!(
        doc.field_names(),
        vec!["when.t4_v", "when.T1UT2", "when.t4_t"]
    );
    assert_eq!(doc.int_value("when.T1UT2"), Some(0));

    let hit = BitemporalQuery::new()
        .valid_within(t(1500), t(1500))
        .unwrap()
        .transaction_within(t(2000), t(2000))
        .unwrap()
        .build(&mapper)
        .unwrap();
    assert!(hit.matches(&doc));

    let miss = BitemporalQuery::new()
        .valid_within(t(2100), t(3000))
        .unwrap()
        .build(&mapper)
        .unwrap();
    assert!(!miss.matches(&doc));

    let edge = mapper
        .within_range(Case::T4, Dimension::Transaction, t(2500), t(2500))
        .unwrap();
    assert!(edge.matches(&doc));
}

#[test]
fn test_partial_columns_leave_document_untouched() {
    let mapper = mapper_with(config());
    let columns = Columns::new()
        .add("vt_from", 1000i64)
        .add("tt_from", 1000i64)
        .add("tt_to", RawValue::Null);

    let mut doc = Document::new();
    mapper
        .add_fields(&mut doc, &record_columns(0, 10, 0, 10))
        .unwrap();
    let before = doc.fields().to_vec();

    let err = mapper.add_fields(&mut doc, &columns).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::IncompleteBitemporalRecord { column } if column == "vt_to"
    ));
    assert_eq!(err.to_string(), "vt_to column required");
    assert_eq!(doc.fields(), before.as_slice());
}

#[test]
fn test_value_above_now_is_rejected() {
    let mapper = mapper_with(config().with_now_value(NowValue::Millis(10_000)));
    let mut doc = Document::new();
    let err = mapper
        .add_fields(&mut doc, &record_columns(1000, 10_001, 1000, 2000))
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::TemporalValueOutOfRange {
            value: 10_001,
            ceiling: 10_000
        }
    ));
    assert!(doc.is_empty());
}

#[test]
fn test_inverted_interval_is_rejected() {
    let mapper = mapper_with(config());
    let mut doc = Document::new();
    let err = mapper
        .add_fields(&mut doc, &record_columns(3000, 2000, 1000, 2000))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidInterval { .. }));
    assert!(doc.is_empty());

    let err = mapper
        .add_fields(&mut doc, &record_columns(-5, 2000, 1000, 2000))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidTemporalValue { .. }));
    assert!(doc.is_empty());
}

#[test]
fn test_absent_record_emits_nothing() {
    let mapper = mapper_with(config());
    let mut doc = Document::new();
    mapper.add_fields(&mut doc, &Columns::new()).unwrap();
    assert!(doc.is_empty());

    let nulls = Columns::new()
        .add("vt_from", RawValue::Null)
        .add("vt_to", RawValue::Null)
        .add("tt_from", RawValue::Null)
        .add("tt_to", RawValue::Null);
    mapper.add_fields(&mut doc, &nulls).unwrap();
    assert!(doc.is_empty());
}

#[test]
fn test_field_layout_is_stable() {
    let mapper = mapper_with(config());
    let mut names = Vec::new();
    for case in Case::ALL {
        for dimension in Dimension::ALL {
            names.push(mapper.field_name_for(case, dimension).to_string());
        }
    }
    assert_eq!(
        names,
        vec![
            "when.t1_v",
            "when.t1_t",
            "when.t2_v",
            "when.t2_t",
            "when.t3_v",
            "when.t3_t",
            "when.t4_v",
            "when.t4_t"
        ]
    );
}

#[test]
fn test_column_value_types() {
    let mapper = mapper_with(config());
    let from = Utc.with_ymd_and_hms(2015, 3, 21, 10, 25, 0).unwrap();
    let mut columns = HashMap::new();
    columns.insert("vt_from".to_string(), RawValue::from(from));
    columns.insert(
        "vt_to".to_string(),
        RawValue::from("2015/03/21 11:25:00.000 +0100"),
    );
    columns.insert("tt_from".to_string(), RawValue::from(1_426_933_500_000.9f64));
    columns.insert("tt_to".to_string(), RawValue::from(OPEN.to_string()));

    let record = mapper.read_record(&columns).unwrap().unwrap();
    assert_eq!(
        record,
        BitemporalRecord::new(
            t(1_426_933_500_000),
            t(1_426_933_500_000),
            t(1_426_933_500_000),
            TemporalValue::MAX
        )
    );

    let mut doc = Document::new();
    mapper.add_fields(&mut doc, &columns).unwrap();
    assert_eq!(doc.int_value("when.T1UT2"), Some(1));
    assert!(doc.fields_named("when.t2_v").next().is_some());
}

#[test]
fn test_json_configuration() {
    let config = BitemporalMapperConfig::from_json(
        r#"{
            "validFrom": "vf",
            "validTo": "vt",
            "transactionFrom": "tf",
            "transactionTo": "tt",
            "pattern": "%Y/%m/%d",
            "nowValue": "2200/01/01",
            "range_strategy": "min-max"
        }"#,
    )
    .unwrap();
    let mapper = BitemporalMapper::new("history", &config).unwrap();
    assert_eq!(mapper.range_index_kind(), RangeIndexKind::MinMax);
    assert_eq!(mapper.mapped_columns(), vec!["vf", "vt", "tf", "tt"]);

    let columns = Columns::new()
        .add("vf", "2015/01/01")
        .add("vt", "2200/01/01")
        .add("tf", "2015/02/01")
        .add("tt", "2016/01/01");
    let mut doc = Document::new();
    mapper.add_fields(&mut doc, &columns).unwrap();
    assert_eq!(
        doc.field_names(),
        vec![
            "history.t3_v.min",
            "history.t3_v.max",
            "history.T1UT2",
            "history.t3_t.min",
            "history.t3_t.max"
        ]
    );
    assert_eq!(doc.long_value("history.t3_v.max"), doc.long_value("history.t3_v.min"));

    let err = BitemporalMapper::new(
        "history",
        &BitemporalMapperConfig::from_json(r#"{"vt_from": "vf", "vt_to": "vt"}"#).unwrap(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "tt_from column name is required");
}

#[test]
fn test_invalid_strategy_configuration() {
    let mut unknown = config();
    unknown.range_strategy = Some("r-tree".to_string());
    assert!(matches!(
        BitemporalMapper::new("when", &unknown).unwrap_err().kind(),
        ErrorKind::InvalidArgument { .. }
    ));

    let err = BitemporalMapper::new("when", &config().with_pattern("%Y-%m-%")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

    let err = BitemporalMapper::new("when", &config().with_precision_step(3)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
}

fn random_bound(from: i64) -> i64 {
    if fastrand::u8(0..3) == 0 {
        OPEN
    } else {
        from + fastrand::i64(0..200)
    }
}

fn overlaps(from: i64, to: i64, a: i64, b: i64) -> bool {
    from <= b && a <= to
}

fn check_queries_against_brute_force(kind: RangeIndexKind, precision_step: u8) {
    let mapper = mapper_with(
        config()
            .with_range_strategy(kind)
            .with_precision_step(precision_step),
    );

    let records = (0..200)
        .map(|_| {
            let vf = fastrand::i64(0..1000);
            let tf = fastrand::i64(0..1000);
            (vf, random_bound(vf), tf, random_bound(tf))
        })
        .collect::<Vec<_>>();
    let docs = records
        .iter()
        .map(|&(vf, vt, tf, tt)| index(&mapper, &record_columns(vf, vt, tf, tt)))
        .collect::<Vec<_>>();

    for _ in 0..100 {
        let (a, b) = {
            let a = fastrand::i64(0..1200);
            (a, a + fastrand::i64(0..200))
        };
        let (c, d) = {
            let c = fastrand::i64(0..1200);
            (c, c + fastrand::i64(0..200))
        };
        let recorded = match fastrand::u8(0..3) {
            0 => Some(true),
            1 => Some(false),
            _ => None,
        };

        let mut query = BitemporalQuery::new()
            .valid_within(t(a), t(b))
            .unwrap()
            .transaction_within(t(c), t(d))
            .unwrap();
        if let Some(recorded) = recorded {
            query = query.currently_recorded(recorded);
        }
        let predicate = query.build(&mapper).unwrap();

        for (&(vf, vt, tf, tt), doc) in records.iter().zip(&docs) {
            let expected = overlaps(vf, vt, a, b)
                && overlaps(tf, tt, c, d)
                && recorded.is_none_or(|recorded| (tt == OPEN) == recorded);
            assert_eq!(
                predicate.matches(doc),
                expected,
                "{kind}: record ({vf}, {vt}, {tf}, {tt}), query [{a}, {b}] x [{c}, {d}], recorded {recorded:?}"
            );
        }
    }
}

#[test]
fn test_prefix_tree_queries_match_brute_force() {
    fastrand::seed(2985745485);
    check_queries_against_brute_force(RangeIndexKind::PrefixTree, 4);
    check_queries_against_brute_force(RangeIndexKind::PrefixTree, 1);
    check_queries_against_brute_force(RangeIndexKind::PrefixTree, 8);
}

#[test]
fn test_min_max_queries_match_brute_force() {
    fastrand::seed(1_234_567);
    check_queries_against_brute_force(RangeIndexKind::MinMax, 4);
}

#[test]
fn test_parallel_indexing_with_shared_mapper() {
    let mapper = Arc::new(mapper_with(config()));
    fastrand::seed(42);
    let records = (0..1000)
        .map(|_| {
            let vf = fastrand::i64(0..1_000_000);
            let tf = fastrand::i64(0..1_000_000);
            record_columns(vf, random_bound(vf), tf, random_bound(tf))
        })
        .collect::<Vec<_>>();

    let sequential = records
        .iter()
        .map(|columns| index(&mapper, columns))
        .collect::<Vec<_>>();
    let parallel = records
        .par_iter()
        .map(|columns| {
            let mapper = Arc::clone(&mapper);
            index(&mapper, columns)
        })
        .collect::<Vec<_>>();

    assert_eq!(sequential.len(), parallel.len());
    for (a, b) in sequential.iter().zip(&parallel) {
        assert_eq!(a.fields(), b.fields());
        assert!(matches!(
            a.fields_named(mapper.discriminator_field_name())
                .next()
                .map(|f| f.value()),
            Some(FieldValue::Int(0 | 1))
        ));
    }
}

#[test]
fn test_mapper_behind_trait_object() {
    let mapper: Arc<dyn Mapper> = Arc::new(mapper_with(config()));
    assert_eq!(mapper.field(), "when");
    let err = mapper.sort_field("when", true).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::UnsupportedSortOperation { field } if field == "when"
    ));
}
