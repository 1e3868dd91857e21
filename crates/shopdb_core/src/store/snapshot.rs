//! Directory snapshots: one JSON file per created table.
//!
//! # Responsibility
//! - Map table kinds to stable file paths inside a data directory.
//! - Save or load every created table in one call.
//!
//! # Invariants
//! - Only tables already created in the `Database` are written or loaded.
//! - A missing table file on load is reported, not treated as an error; any
//!   other stat or read failure on that path propagates as `StoreError::Io`.

use super::{Database, StoreError, StoreResult};
use crate::model::entity::TableKind;
use crate::model::retail::{Buyer, Good, Sale, Shop};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Outcome of [`load_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Tables replaced from their files.
    pub loaded: Vec<TableKind>,
    /// Created tables without a file in the directory; left untouched.
    pub missing: Vec<TableKind>,
}

/// File path for `kind` inside `dir`, e.g. `<dir>/sale.json`.
pub fn table_path(dir: impl AsRef<Path>, kind: TableKind) -> PathBuf {
    dir.as_ref().join(format!("{}.json", kind.name()))
}

/// Serializes every created table into `dir`, creating it when needed.
///
/// Returns the kinds that were written.
pub fn save_all(db: &Database, dir: impl AsRef<Path>) -> StoreResult<Vec<TableKind>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|err| StoreError::io(dir, err))?;

    let kinds = db.created_tables();
    for kind in &kinds {
        let path = table_path(dir, *kind);
        match kind {
            TableKind::Buyer => db.serialize::<Buyer>(&path)?,
            TableKind::Shop => db.serialize::<Shop>(&path)?,
            TableKind::Good => db.serialize::<Good>(&path)?,
            TableKind::Sale => db.serialize::<Sale>(&path)?,
        }
    }

    info!(
        "event=snapshot_save module=store status=ok tables={}",
        kinds.len()
    );
    Ok(kinds)
}

/// Deserializes every created table that has a file in `dir`.
///
/// # Errors
/// - Propagates the first `Io` or `Format` failure; tables loaded before it
///   keep their new contents.
pub fn load_all(db: &mut Database, dir: impl AsRef<Path>) -> StoreResult<LoadSummary> {
    let dir = dir.as_ref();
    let mut summary = LoadSummary::default();

    for kind in db.created_tables() {
        let path = table_path(dir, kind);
        let exists = path.try_exists().map_err(|err| StoreError::io(&path, err))?;
        if !exists {
            warn!(
                "event=snapshot_load module=store status=skipped reason=missing_file table={}",
                kind
            );
            summary.missing.push(kind);
            continue;
        }
        match kind {
            TableKind::Buyer => db.deserialize::<Buyer>(&path)?,
            TableKind::Shop => db.deserialize::<Shop>(&path)?,
            TableKind::Good => db.deserialize::<Good>(&path)?,
            TableKind::Sale => db.deserialize::<Sale>(&path)?,
        }
        summary.loaded.push(kind);
    }

    info!(
        "event=snapshot_load module=store status=ok loaded={} missing={}",
        summary.loaded.len(),
        summary.missing.len()
    );
    Ok(summary)
}
