//! In-memory table store and its JSON persistence.
//!
//! # Responsibility
//! - Own one ordered, append-only sequence per created table.
//! - Mediate every read, insert and file round-trip of those sequences.
//!
//! # Invariants
//! - A table exists only after `create_table`; every other operation on a
//!   missing table fails with `StoreError::TableNotFound`.
//! - Rows keep insertion order; there is no update or delete path.
//! - Persistence is whole-file: serialize truncates and rewrites, deserialize
//!   replaces the entire table.

use crate::model::entity::TableKind;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

mod database;
pub mod snapshot;

pub use database::{Database, StoredEntity, TableReader};

pub type StoreResult<T> = Result<T, StoreError>;

/// Table store error for lookups and file persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Operation referenced a table that was never created.
    TableNotFound(TableKind),
    /// File content could not be decoded into (or encoded from) table rows.
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Underlying file read or write failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A query total left the `i64` range.
    Overflow { query: &'static str },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Splits serde_json failures into transport and format errors.
    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        if source.is_io() {
            return Self::io(path, source.into());
        }
        Self::Format {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Short stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TableNotFound(_) => "table_not_found",
            Self::Format { .. } => "format_error",
            Self::Io { .. } => "io_error",
            Self::Overflow { .. } => "arithmetic_overflow",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TableNotFound(kind) => write!(f, "table `{kind}` doesn't exist"),
            Self::Format { path, source } => {
                write!(f, "malformed table data in `{}`: {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "table file i/o failed for `{}`: {source}", path.display())
            }
            Self::Overflow { query } => write!(f, "arithmetic overflow in query `{query}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TableNotFound(_) => None,
            Self::Format { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Overflow { .. } => None,
        }
    }
}
