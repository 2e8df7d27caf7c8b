//! Bitemporal field mapping.
//!
//! A bitemporal record carries two intervals: the *valid time*, when a fact was
//! true in the modeled world, and the *transaction time*, when it was recorded
//! in the database. Either upper bound may be OPEN ("until further notice").
//!
//! [`BitemporalMapper`] reads the four temporal columns of a record, classifies
//! it into one of four [`Case`]s by its OPEN bounds, and encodes both intervals
//! with the range indexes of that case:
//!
//! - `<field>.t1_v`, `<field>.t1_t`, ... `<field>.t4_v`, `<field>.t4_t`: the
//!   range-encoded fields
//! - `<field>.T1UT2`: a stored discriminator, `1` when transaction time is OPEN
//!
//! [`BitemporalQuery`] builds the matching predicate over those fields.
//!
//! ```rust
//! use chronomap_bitemporal::{BitemporalMapper, BitemporalMapperConfig, Columns, Mapper};
//! use chronomap_index_core::Document;
//!
//! let config = BitemporalMapperConfig::from_json(
//!     r#"{"vt_from": "vf", "vt_to": "vt", "tt_from": "tf", "tt_to": "tt"}"#,
//! )
//! .unwrap();
//! let mapper = BitemporalMapper::new("when", &config).unwrap();
//!
//! let columns = Columns::new()
//!     .add("vf", 1000i64)
//!     .add("vt", 2000i64)
//!     .add("tf", 1500i64)
//!     .add("tt", 2500i64);
//! let mut doc = Document::new();
//! mapper.add_fields(&mut doc, &columns).unwrap();
//! assert_eq!(doc.int_value("when.T1UT2"), Some(0));
//! ```

pub mod case;
pub mod columns;
pub mod config;
pub mod mapper;
pub mod query;
pub mod record;

pub use case::{Case, CaseIndexes, CaseTable, Dimension, classify};
pub use columns::{ColumnSource, Columns};
pub use config::{BitemporalMapperConfig, NowValue};
pub use mapper::{BitemporalMapper, DISCRIMINATOR_SUFFIX, Mapper, RecordShapes, SortField};
pub use query::{BitemporalPredicate, BitemporalQuery, CasePredicate};
pub use record::BitemporalRecord;
