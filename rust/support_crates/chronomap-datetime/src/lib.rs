//! Temporal values for bitemporal indexing.
//!
//! - [`TemporalValue`]: a non-negative epoch-millisecond instant with a reserved
//!   OPEN sentinel ([`TemporalValue::MAX`]) meaning "unbounded future / now".
//! - [`NowCeiling`]: the configured "now" value; raw instants equal to it are
//!   normalized to OPEN and instants above it are rejected.
//! - [`RawValue`]: a raw column value as handed over by the column store.
//! - [`DateParser`]: turns raw values into epoch milliseconds using a
//!   strftime-style pattern.

pub mod parser;
pub mod raw;
pub mod temporal;


pub use parser::{DEFAULT_PATTERN, DateParser, parse_temporal};
pub use raw::RawValue;
pub use temporal::{NowCeiling, TemporalValue};
