use thiserror::Error;

/// Error raised by the bitemporal indexing engine.
///
/// The kind is boxed so that `Result<T>` stays a single pointer wide on the
/// hot indexing path.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        ErrorKind::InvalidOperation { name: name.into() }.into()
    }

    pub fn missing_column(column: impl Into<String>) -> Error {
        ErrorKind::MissingRequiredColumn {
            column: column.into(),
        }
        .into()
    }

    pub fn unparsable(value: impl Into<String>, pattern: impl Into<String>) -> Error {
        ErrorKind::UnparsableTemporalValue {
            value: value.into(),
            pattern: pattern.into(),
        }
        .into()
    }

    pub fn out_of_range(value: i64, ceiling: i64) -> Error {
        ErrorKind::TemporalValueOutOfRange { value, ceiling }.into()
    }

    pub fn invalid_temporal(value: i64) -> Error {
        ErrorKind::InvalidTemporalValue { value }.into()
    }

    pub fn incomplete_record(column: impl Into<String>) -> Error {
        ErrorKind::IncompleteBitemporalRecord {
            column: column.into(),
        }
        .into()
    }

    pub fn unsupported_sort(field: impl Into<String>) -> Error {
        ErrorKind::UnsupportedSortOperation {
            field: field.into(),
        }
        .into()
    }

    pub fn invalid_interval(from: i64, to: i64) -> Error {
        ErrorKind::InvalidInterval { from, to }.into()
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("{column} column name is required")]
    MissingRequiredColumn { column: String },

    #[error("unparsable temporal value '{value}' (pattern '{pattern}')")]
    UnparsableTemporalValue { value: String, pattern: String },

    #[error("temporal value '{value}' exceeds max value '{ceiling}'")]
    TemporalValueOutOfRange { value: i64, ceiling: i64 },

    #[error("cannot build a temporal value with a negative unix time: {value}")]
    InvalidTemporalValue { value: i64 },

    #[error("{column} column required")]
    IncompleteBitemporalRecord { column: String },

    #[error("bitemporal mapper '{field}' does not support sorting")]
    UnsupportedSortOperation { field: String },

    #[error("invalid interval [{from}, {to}]: lower bound exceeds upper bound")]
    InvalidInterval { from: i64, to: i64 },

    #[error("invalid mapper configuration: {source}")]
    Config { source: serde_json::Error },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        ErrorKind::Config { source: e }.into()
    }
}
