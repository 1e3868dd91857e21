//! One-shot report combining every retail query.

use super::retail::{
    cross_city_filtered_sales, longest_name_buyer_goods, minimum_sales_city,
    minimum_shops_per_country, most_expensive_good_category, top_popular_buyers,
    total_sales_value, RankedBuyer,
};
use crate::model::retail::{Good, Sale};
use crate::store::{StoreResult, TableReader};
use log::info;
use serde::Serialize;
use std::time::Instant;

/// Results of all retail queries evaluated against one store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    pub longest_name_buyer_goods: Vec<Good>,
    pub most_expensive_good_category: Option<String>,
    pub minimum_sales_city: Option<String>,
    pub top_popular_buyers: Vec<RankedBuyer>,
    pub minimum_shops_per_country: usize,
    pub cross_city_filtered_sales: Vec<Sale>,
    pub total_sales_value: i64,
}

/// Runs every retail query and collects the results.
///
/// Fails on the first missing table.
pub fn build_report<R: TableReader>(db: &R) -> StoreResult<SalesReport> {
    let started_at = Instant::now();
    let report = SalesReport {
        longest_name_buyer_goods: longest_name_buyer_goods(db)?,
        most_expensive_good_category: most_expensive_good_category(db)?,
        minimum_sales_city: minimum_sales_city(db)?,
        top_popular_buyers: top_popular_buyers(db)?,
        minimum_shops_per_country: minimum_shops_per_country(db)?,
        cross_city_filtered_sales: cross_city_filtered_sales(db)?,
        total_sales_value: total_sales_value(db)?,
    };
    info!(
        "event=report_build module=query status=ok duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(report)
}
