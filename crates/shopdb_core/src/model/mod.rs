//! Record shapes held by the table store.
//!
//! # Responsibility
//! - Define the entity contract every stored record satisfies.
//! - Define the retail records the query layer reads.
//!
//! # Invariants
//! - Every record exposes a stable integer `EntityId`.
//! - Each record shape maps to exactly one `TableKind`.

pub mod entity;
pub mod retail;
