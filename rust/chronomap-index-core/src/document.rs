//! The per-record index document that field emitters write into.
//!
//! A [`Document`] is owned by the single indexing call that populates it; it is
//! a flat list of named [`IndexableField`]s, in insertion order.

use std::{fmt, sync::Arc};

/// An opaque indexed term. Terms are compared bytewise.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term(Arc<[u8]>);

impl Term {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Term {
        Term(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term(")?;
        for b in self.0.iter() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// The value carried by an index field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// An inverted-index term.
    Term(Term),
    /// An unsigned 64-bit point value.
    Long(u64),
    /// A 32-bit integer value.
    Int(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexableField {
    name: Arc<str>,
    value: FieldValue,
    stored: bool,
}

impl IndexableField {
    pub fn indexed(name: Arc<str>, value: FieldValue) -> IndexableField {
        IndexableField {
            name,
            value,
            stored: false,
        }
    }

    /// Creates a field that is both indexed and stored.
    pub fn stored(name: Arc<str>, value: FieldValue) -> IndexableField {
        IndexableField {
            name,
            value,
            stored: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_stored(&self) -> bool {
        self.stored
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    fields: Vec<IndexableField>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    pub fn add(&mut self, field: IndexableField) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[IndexableField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the fields with the given name, in insertion order.
    pub fn fields_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a IndexableField> {
        self.fields.iter().filter(move |f| f.name() == name)
    }

    pub fn terms<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Term> {
        self.fields_named(name).filter_map(|f| match f.value() {
            FieldValue::Term(term) => Some(term),
            _ => None,
        })
    }

    /// Returns the first `Long` value of the named field.
    pub fn long_value(&self, name: &str) -> Option<u64> {
        self.fields_named(name).find_map(|f| match f.value() {
            FieldValue::Long(v) => Some(*v),
            _ => None,
        })
    }

    /// Returns the first `Int` value of the named field.
    pub fn int_value(&self, name: &str) -> Option<i32> {
        self.fields_named(name).find_map(|f| match f.value() {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        })
    }

    /// Returns the distinct field names, in first-insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !names.contains(&field.name()) {
                names.push(field.name());
            }
        }
        names
    }
}

impl Extend<IndexableField> for Document {
    fn extend<I: IntoIterator<Item = IndexableField>>(&mut self, iter: I) {
        self.fields.extend(iter);
    }
}
