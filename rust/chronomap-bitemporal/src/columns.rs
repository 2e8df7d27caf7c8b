//! Access to the raw column values of the record being indexed.

use std::{collections::HashMap, hash::BuildHasher};

use chronomap_datetime::RawValue;

/// Lookup of raw column values by column name, provided by the column store.
pub trait ColumnSource {
    /// Returns the value of the named column, or `None` if absent.
    fn column_value(&self, column: &str) -> Option<&RawValue>;
}

/// An ordered list of named column values.
///
/// A name may appear more than once; lookups return the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct Columns(Vec<(String, RawValue)>);

impl Columns {
    pub fn new() -> Columns {
        Columns::default()
    }

    /// Appends a column value, builder style.
    pub fn add(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Columns {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ColumnSource for Columns {
    fn column_value(&self, column: &str) -> Option<&RawValue> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl<S: BuildHasher> ColumnSource for HashMap<String, RawValue, S> {
    fn column_value(&self, column: &str) -> Option<&RawValue> {
        self.get(column)
    }
}
