//! Core of shopdb: an in-memory typed table store with JSON persistence
//! and a fixed set of retail analytics queries.

pub mod logging;
pub mod model;
pub mod query;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{Entity, EntityId, TableKind};
pub use model::retail::{Buyer, Good, Sale, Shop};
pub use query::report::{build_report, SalesReport};
pub use query::retail::{
    cross_city_filtered_sales, longest_name_buyer_goods, minimum_sales_city,
    minimum_shops_per_country, most_expensive_good_category, top_popular_buyers,
    total_sales_value, RankedBuyer, TOP_BUYERS_LIMIT,
};
pub use store::snapshot::{load_all, save_all, table_path, LoadSummary};
pub use store::{Database, StoreError, StoreResult, StoredEntity, TableReader};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
