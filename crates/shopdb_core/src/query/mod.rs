//! Read-only analytical queries over the table store.
//!
//! # Responsibility
//! - Compute aggregates from tables read through `TableReader`.
//! - Keep join and grouping logic out of the store itself.
//!
//! # Invariants
//! - A missing input table surfaces as `StoreError::TableNotFound`.
//! - Empty inputs produce documented empty results, never errors.

pub mod report;
pub mod retail;
