//! Entity contract and table identifiers.
//!
//! # Responsibility
//! - Name every table the store knows about.
//! - Bind record types to their table and their identifier.
//!
//! # Invariants
//! - `TableKind::name()` is unique per kind and stable across releases;
//!   persisted file names depend on it.
//! - Id uniqueness inside a table is a caller convention, not enforced here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Integer key used for record identity and foreign keys.
pub type EntityId = i64;

/// Closed set of tables the store can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    Buyer,
    Shop,
    Good,
    Sale,
}

impl TableKind {
    /// All kinds in declaration order.
    pub const ALL: [TableKind; 4] = [
        TableKind::Buyer,
        TableKind::Shop,
        TableKind::Good,
        TableKind::Sale,
    ];

    /// Stable table key, also used as the snapshot file stem.
    pub fn name(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Shop => "shop",
            Self::Good => "good",
            Self::Sale => "sale",
        }
    }

    /// Resolves a table key back to its kind.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized.as_str())
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Contract for any record kept in a table.
///
/// The serde bounds let the store persist the record as one JSON object
/// whose fields are named after the struct fields.
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Table this record shape lives in.
    const KIND: TableKind;

    /// Stable identifier of this record.
    fn id(&self) -> EntityId;
}
