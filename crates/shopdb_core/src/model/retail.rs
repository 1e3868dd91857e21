//! Retail records: buyers, shops, goods and the sales linking them.
//!
//! # Invariants
//! - `Sale` foreign keys may reference ids absent from the target table;
//!   readers treat them as non-matching join rows.

use super::entity::{Entity, EntityId, TableKind};
use serde::{Deserialize, Serialize};

/// Person who purchases goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub id: EntityId,
    pub name: String,
}

impl Buyer {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Entity for Buyer {
    const KIND: TableKind = TableKind::Buyer;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Physical shop location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: EntityId,
    pub city: String,
    pub country: String,
}

impl Shop {
    pub fn new(id: EntityId, city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id,
            city: city.into(),
            country: country.into(),
        }
    }
}

impl Entity for Shop {
    const KIND: TableKind = TableKind::Shop;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Catalog item with a unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Good {
    pub id: EntityId,
    pub category: String,
    /// Unit price in the smallest currency unit.
    pub price: i64,
}

impl Good {
    pub fn new(id: EntityId, category: impl Into<String>, price: i64) -> Self {
        Self {
            id,
            category: category.into(),
            price,
        }
    }
}

impl Entity for Good {
    const KIND: TableKind = TableKind::Good;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// One purchase of `good_count` units of a good by a buyer at a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: EntityId,
    pub buyer_id: EntityId,
    pub shop_id: EntityId,
    pub good_id: EntityId,
    pub good_count: i64,
}

impl Sale {
    pub fn new(
        id: EntityId,
        buyer_id: EntityId,
        shop_id: EntityId,
        good_id: EntityId,
        good_count: i64,
    ) -> Self {
        Self {
            id,
            buyer_id,
            shop_id,
            good_id,
            good_count,
        }
    }
}

impl Entity for Sale {
    const KIND: TableKind = TableKind::Sale;

    fn id(&self) -> EntityId {
        self.id
    }
}
