use std::{fmt, io, path::PathBuf};

use fofgroups_core::{CatalogError, CatalogErrorCode};
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CsvProviderError {
    #[error("required column `{column}` not found in CSV header")]
    MissingColumn { column: &'static str },
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
    #[error(transparent)]
    Catalog {
        #[from]
        error: CatalogError,
    },
    #[error("i/o error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Stable codes describing [`CsvProviderError`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CsvProviderErrorCode {
    MissingColumn,
    MalformedRecord,
    CatalogFailure,
    Io,
    Csv,
}

impl CsvProviderErrorCode {
    /// Returns the stable machine-readable identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingColumn => "CSV_MISSING_COLUMN",
            Self::MalformedRecord => "CSV_MALFORMED_RECORD",
            Self::CatalogFailure => "CSV_CATALOG_FAILURE",
            Self::Io => "CSV_IO",
            Self::Csv => "CSV_FORMAT",
        }
    }
}

impl fmt::Display for CsvProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CsvProviderError {
    /// Returns the stable code for this error.
    #[must_use]
    pub const fn code(&self) -> CsvProviderErrorCode {
        match self {
            Self::MissingColumn { .. } => CsvProviderErrorCode::MissingColumn,
            Self::MalformedRecord { .. } => CsvProviderErrorCode::MalformedRecord,
            Self::Catalog { .. } => CsvProviderErrorCode::CatalogFailure,
            Self::Io { .. } => CsvProviderErrorCode::Io,
            Self::Csv(_) => CsvProviderErrorCode::Csv,
        }
    }

    /// Retrieve the inner [`CatalogErrorCode`] when catalog validation
    /// rejected the rows.
    #[must_use]
    pub const fn catalog_code(&self) -> Option<CatalogErrorCode> {
        match self {
            Self::Catalog { error } => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Splits deserialisation failures, which carry a record position, from
    /// lower-level reader errors.
    pub(crate) fn from_record(error: csv::Error) -> Self {
        match (error.position(), error.kind()) {
            (Some(position), csv::ErrorKind::Deserialize { err, .. }) => Self::MalformedRecord {
                line: position.line(),
                reason: err.to_string(),
            },
            _ => Self::Csv(error),
        }
    }
}
