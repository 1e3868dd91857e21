//! Typed table registry with one slot per record shape.
//!
//! # Responsibility
//! - Route each `StoredEntity` type to its own strongly-typed sequence.
//! - Encode/decode whole tables as indented JSON arrays.
//!
//! # Invariants
//! - `create_table` never resets an existing table.
//! - `deserialize` decodes the full file before touching the table, so a
//!   failed load leaves the previous rows in place.

use super::{StoreError, StoreResult};
use crate::model::entity::{Entity, EntityId, TableKind};
use crate::model::retail::{Buyer, Good, Sale, Shop};
use log::{debug, error, info};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// In-memory store holding every created table.
///
/// `None` means the table was never created.
#[derive(Debug, Default)]
pub struct Database {
    buyers: Option<Vec<Buyer>>,
    shops: Option<Vec<Shop>>,
    goods: Option<Vec<Good>>,
    sales: Option<Vec<Sale>>,
}

/// Entity type with a dedicated slot inside [`Database`].
pub trait StoredEntity: Entity {
    #[doc(hidden)]
    fn slot(db: &Database) -> &Option<Vec<Self>>;
    #[doc(hidden)]
    fn slot_mut(db: &mut Database) -> &mut Option<Vec<Self>>;
}

macro_rules! stored_entity {
    ($entity:ty, $field:ident) => {
        impl StoredEntity for $entity {
            fn slot(db: &Database) -> &Option<Vec<Self>> {
                &db.$field
            }

            fn slot_mut(db: &mut Database) -> &mut Option<Vec<Self>> {
                &mut db.$field
            }
        }
    };
}

stored_entity!(Buyer, buyers);
stored_entity!(Shop, shops);
stored_entity!(Good, goods);
stored_entity!(Sale, sales);

/// Read-only view over created tables.
///
/// Query code depends on this trait instead of the concrete store.
pub trait TableReader {
    /// Returns all rows of `T` in insertion order.
    ///
    /// # Errors
    /// - `StoreError::TableNotFound` when the table was never created.
    fn get_table<T: StoredEntity>(&self) -> StoreResult<&[T]>;
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty table for `T` unless one already exists.
    pub fn create_table<T: StoredEntity>(&mut self) {
        let slot = T::slot_mut(self);
        if slot.is_some() {
            debug!(
                "event=table_create module=store status=skipped reason=exists table={}",
                T::KIND
            );
            return;
        }
        *slot = Some(Vec::new());
        debug!("event=table_create module=store status=ok table={}", T::KIND);
    }

    /// Builds one record with `factory` and appends it to the table of `T`.
    ///
    /// The factory is not called when the table is missing.
    /// Returns the id of the appended record.
    pub fn insert_into<T, F>(&mut self, factory: F) -> StoreResult<EntityId>
    where
        T: StoredEntity,
        F: FnOnce() -> T,
    {
        let rows = T::slot_mut(self)
            .as_mut()
            .ok_or(StoreError::TableNotFound(T::KIND))?;
        let record = factory();
        let id = record.id();
        rows.push(record);
        debug!(
            "event=table_insert module=store status=ok table={} id={} rows={}",
            T::KIND,
            id,
            rows.len()
        );
        Ok(id)
    }

    /// Returns all rows of `T` in insertion order.
    pub fn get_table<T: StoredEntity>(&self) -> StoreResult<&[T]> {
        T::slot(self)
            .as_deref()
            .ok_or(StoreError::TableNotFound(T::KIND))
    }

    pub fn has_table<T: StoredEntity>(&self) -> bool {
        T::slot(self).is_some()
    }

    /// Number of rows in the table of `T`.
    pub fn row_count<T: StoredEntity>(&self) -> StoreResult<usize> {
        self.get_table::<T>().map(<[T]>::len)
    }

    /// Kinds of all created tables, in `TableKind::ALL` order.
    pub fn created_tables(&self) -> Vec<TableKind> {
        TableKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                TableKind::Buyer => self.buyers.is_some(),
                TableKind::Shop => self.shops.is_some(),
                TableKind::Good => self.goods.is_some(),
                TableKind::Sale => self.sales.is_some(),
            })
            .collect()
    }

    /// Writes the table of `T` to `path` as an indented JSON array.
    ///
    /// Any existing file content is overwritten.
    ///
    /// # Errors
    /// - `StoreError::TableNotFound` when the table was never created.
    /// - `StoreError::Io` when the file cannot be created or written.
    pub fn serialize<T: StoredEntity>(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let rows = self.get_table::<T>()?;
        let started_at = Instant::now();

        match write_json(path, rows) {
            Ok(()) => {
                info!(
                    "event=table_serialize module=store status=ok table={} rows={} duration_ms={}",
                    T::KIND,
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=table_serialize module=store status=error table={} duration_ms={} error_code={} error={}",
                    T::KIND,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Replaces the table of `T` with the rows decoded from `path`.
    ///
    /// A JSON `null` document loads as an empty table.
    ///
    /// # Errors
    /// - `StoreError::TableNotFound` when the table was never created.
    /// - `StoreError::Io` when the file cannot be read.
    /// - `StoreError::Format` when the content is not an array of `T`.
    pub fn deserialize<T: StoredEntity>(&mut self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        if !self.has_table::<T>() {
            return Err(StoreError::TableNotFound(T::KIND));
        }
        let started_at = Instant::now();

        match read_json::<T>(path) {
            Ok(rows) => {
                info!(
                    "event=table_deserialize module=store status=ok table={} rows={} duration_ms={}",
                    T::KIND,
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                *T::slot_mut(self) = Some(rows);
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=table_deserialize module=store status=error table={} duration_ms={} error_code={} error={}",
                    T::KIND,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl TableReader for Database {
    fn get_table<T: StoredEntity>(&self) -> StoreResult<&[T]> {
        Database::get_table(self)
    }
}

fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> StoreResult<()> {
    let file = File::create(path).map_err(|err| StoreError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows).map_err(|err| StoreError::json(path, err))?;
    writer.flush().map_err(|err| StoreError::io(path, err))?;
    Ok(())
}

fn read_json<T: StoredEntity>(path: &Path) -> StoreResult<Vec<T>> {
    let text = std::fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
    let rows = serde_json::from_str::<Option<Vec<T>>>(&text)
        .map_err(|err| StoreError::json(path, err))?;
    Ok(rows.unwrap_or_default())
}
