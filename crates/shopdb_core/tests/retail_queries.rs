use shopdb_core::{
    build_report, cross_city_filtered_sales, longest_name_buyer_goods, minimum_sales_city,
    minimum_shops_per_country, most_expensive_good_category, top_popular_buyers,
    total_sales_value, Buyer, Database, Good, Sale, Shop, StoreError, TableKind,
    TOP_BUYERS_LIMIT,
};

fn empty_retail_db() -> Database {
    let mut db = Database::new();
    db.create_table::<Buyer>();
    db.create_table::<Shop>();
    db.create_table::<Good>();
    db.create_table::<Sale>();
    db
}

fn insert_buyers(db: &mut Database, rows: &[(i64, &str)]) {
    for &(id, name) in rows {
        db.insert_into(|| Buyer::new(id, name)).unwrap();
    }
}

fn insert_shops(db: &mut Database, rows: &[(i64, &str, &str)]) {
    for &(id, city, country) in rows {
        db.insert_into(|| Shop::new(id, city, country)).unwrap();
    }
}

fn insert_goods(db: &mut Database, rows: &[(i64, &str, i64)]) {
    for &(id, category, price) in rows {
        db.insert_into(|| Good::new(id, category, price)).unwrap();
    }
}

// (buyer_id, shop_id, good_id, good_count); sale ids are assigned sequentially.
fn insert_sales(db: &mut Database, rows: &[(i64, i64, i64, i64)]) {
    let start = db.row_count::<Sale>().unwrap() as i64;
    for (offset, &(buyer_id, shop_id, good_id, good_count)) in rows.iter().enumerate() {
        let id = start + offset as i64 + 1;
        db.insert_into(|| Sale::new(id, buyer_id, shop_id, good_id, good_count))
            .unwrap();
    }
}

#[test]
fn longest_name_buyer_goods_and_total_for_basic_scenario() {
    let mut db = empty_retail_db();
    insert_buyers(&mut db, &[(1, "Al"), (2, "Alexandra")]);
    insert_sales(&mut db, &[(2, 1, 10, 1)]);
    insert_goods(&mut db, &[(10, "X", 5)]);

    let goods = longest_name_buyer_goods(&db).unwrap();
    assert_eq!(goods, vec![Good::new(10, "X", 5)]);
    assert_eq!(total_sales_value(&db).unwrap(), 5);
}

#[test]
fn longest_name_buyer_goods_dedupes_goods_and_uses_first_longest_buyer() {
    let mut db = empty_retail_db();
    insert_buyers(&mut db, &[(1, "Anna"), (2, "Bert"), (3, "Al")]);
    insert_goods(&mut db, &[(10, "A", 1), (11, "B", 2), (12, "C", 3)]);
    insert_sales(
        &mut db,
        &[(1, 1, 11, 1), (1, 1, 11, 5), (2, 1, 12, 1), (1, 1, 10, 1)],
    );

    let ids = longest_name_buyer_goods(&db)
        .unwrap()
        .iter()
        .map(|good| good.id)
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![10, 11]);
}

#[test]
fn longest_name_buyer_goods_counts_characters_not_bytes() {
    let mut db = empty_retail_db();
    insert_buyers(&mut db, &[(1, "Žoë"), (2, "Abcd")]);
    insert_goods(&mut db, &[(10, "A", 1), (20, "B", 1)]);
    insert_sales(&mut db, &[(1, 1, 10, 1), (2, 1, 20, 1)]);

    let goods = longest_name_buyer_goods(&db).unwrap();

    assert_eq!(goods, vec![Good::new(20, "B", 1)]);
}

#[test]
fn longest_name_buyer_goods_empty_buyers_returns_empty() {
    let db = empty_retail_db();
    assert!(longest_name_buyer_goods(&db).unwrap().is_empty());
}

#[test]
fn most_expensive_good_category_sums_price_times_count() {
    let mut db = empty_retail_db();
    insert_goods(&mut db, &[(1, "Books", 10), (2, "Games", 50), (3, "Books", 15)]);
    insert_sales(&mut db, &[(1, 1, 1, 3), (1, 1, 2, 1), (1, 1, 3, 2)]);

    // Books = 30 + 30 = 60, Games = 50.
    assert_eq!(
        most_expensive_good_category(&db).unwrap().as_deref(),
        Some("Books")
    );
}

#[test]
fn most_expensive_good_category_tie_keeps_first_group() {
    let mut db = empty_retail_db();
    insert_goods(&mut db, &[(1, "Books", 10), (2, "Games", 10)]);
    insert_sales(&mut db, &[(1, 1, 2, 1), (1, 1, 1, 1)]);

    assert_eq!(
        most_expensive_good_category(&db).unwrap().as_deref(),
        Some("Games")
    );
}

#[test]
fn most_expensive_good_category_without_join_rows_is_none() {
    let mut db = empty_retail_db();
    insert_goods(&mut db, &[(1, "Books", 10)]);
    insert_sales(&mut db, &[(1, 1, 99, 4)]);

    assert_eq!(most_expensive_good_category(&db).unwrap(), None);
}

#[test]
fn minimum_sales_city_picks_lowest_total() {
    let mut db = empty_retail_db();
    insert_shops(
        &mut db,
        &[(1, "Berlin", "DE"), (2, "Paris", "FR"), (3, "Berlin", "DE")],
    );
    insert_sales(&mut db, &[(1, 1, 1, 2), (1, 3, 1, 2), (1, 2, 1, 3)]);

    // Berlin = 4, Paris = 3.
    assert_eq!(minimum_sales_city(&db).unwrap().as_deref(), Some("Paris"));
}

#[test]
fn minimum_sales_city_tie_keeps_first_group_and_ignores_dangling_shop() {
    let mut db = empty_retail_db();
    insert_shops(&mut db, &[(1, "Berlin", "DE"), (2, "Paris", "FR")]);
    insert_sales(&mut db, &[(1, 42, 1, 1), (1, 2, 1, 2), (1, 1, 1, 2)]);

    assert_eq!(minimum_sales_city(&db).unwrap().as_deref(), Some("Paris"));
}

#[test]
fn minimum_sales_city_without_sales_is_none() {
    let mut db = empty_retail_db();
    insert_shops(&mut db, &[(1, "Berlin", "DE")]);

    assert_eq!(minimum_sales_city(&db).unwrap(), None);
}

#[test]
fn top_popular_buyers_ranks_by_total_count() {
    let mut db = empty_retail_db();
    insert_buyers(&mut db, &[(1, "Al"), (2, "Bo")]);
    insert_sales(&mut db, &[(1, 1, 1, 3), (1, 1, 1, 2), (2, 1, 1, 10)]);

    let ranked = top_popular_buyers(&db).unwrap();

    let summary = ranked
        .iter()
        .map(|entry| (entry.buyer.id, entry.total_count))
        .collect::<Vec<_>>();
    assert_eq!(summary, vec![(2, 10), (1, 5)]);
}

#[test]
fn top_popular_buyers_excludes_buyers_without_sales_and_keeps_tie_order() {
    let mut db = empty_retail_db();
    insert_buyers(&mut db, &[(1, "A"), (2, "B"), (3, "C")]);
    insert_sales(&mut db, &[(3, 1, 1, 4), (1, 1, 1, 4)]);

    let ids = top_popular_buyers(&db)
        .unwrap()
        .iter()
        .map(|entry| entry.buyer.id)
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![3, 1]);
}

#[test]
fn top_popular_buyers_is_capped() {
    let mut db = empty_retail_db();
    let buyers = (1..=15)
        .map(|id| (id, format!("buyer-{id}")))
        .collect::<Vec<_>>();
    for (id, name) in &buyers {
        db.insert_into(|| Buyer::new(*id, name.as_str())).unwrap();
    }
    let sales = (1..=15).map(|id| (id, 1, 1, id)).collect::<Vec<_>>();
    insert_sales(&mut db, &sales);

    let ranked = top_popular_buyers(&db).unwrap();

    assert_eq!(ranked.len(), TOP_BUYERS_LIMIT);
    assert_eq!(ranked[0].buyer.id, 15);
    assert_eq!(ranked[TOP_BUYERS_LIMIT - 1].buyer.id, 6);
}

#[test]
fn minimum_shops_per_country_counts_smallest_country() {
    let mut db = empty_retail_db();
    insert_shops(&mut db, &[(1, "X", "A"), (2, "Y", "A"), (3, "Z", "B")]);

    assert_eq!(minimum_shops_per_country(&db).unwrap(), 1);
}

#[test]
fn minimum_shops_per_country_empty_is_zero() {
    let db = empty_retail_db();
    assert_eq!(minimum_shops_per_country(&db).unwrap(), 0);
}

#[test]
fn cross_city_filtered_sales_compares_buyer_id_with_shop_id() {
    let mut db = empty_retail_db();
    insert_shops(&mut db, &[(1, "Berlin", "DE"), (2, "Paris", "FR")]);
    // Sale 1: buyer 1 at shop 1 (filtered out), sale 2: buyer 1 at shop 2,
    // sale 3: shop 9 has no match.
    insert_sales(&mut db, &[(1, 1, 1, 1), (1, 2, 1, 1), (2, 9, 1, 1)]);

    let ids = cross_city_filtered_sales(&db)
        .unwrap()
        .iter()
        .map(|sale| sale.id)
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![2]);
}

#[test]
fn total_sales_value_skips_unmatched_goods_and_is_zero_when_empty() {
    let mut db = empty_retail_db();
    assert_eq!(total_sales_value(&db).unwrap(), 0);

    insert_goods(&mut db, &[(1, "A", 7), (2, "B", 3)]);
    insert_sales(&mut db, &[(1, 1, 1, 2), (1, 1, 2, 5), (1, 1, 77, 100)]);

    assert_eq!(total_sales_value(&db).unwrap(), 29);
}

#[test]
fn queries_propagate_missing_tables() {
    let mut db = Database::new();
    db.create_table::<Sale>();

    let err = total_sales_value(&db).unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(TableKind::Good)));

    let err = minimum_shops_per_country(&db).unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(TableKind::Shop)));

    let err = build_report(&db).unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(TableKind::Buyer)));
}

#[test]
fn build_report_collects_every_query() {
    let mut db = empty_retail_db();
    insert_buyers(&mut db, &[(1, "Al"), (2, "Alexandra")]);
    insert_shops(&mut db, &[(1, "Oslo", "NO"), (2, "Bergen", "NO")]);
    insert_goods(&mut db, &[(10, "X", 5), (11, "Y", 2)]);
    insert_sales(&mut db, &[(2, 1, 10, 1), (1, 2, 11, 4)]);

    let report = build_report(&db).unwrap();

    assert_eq!(report.longest_name_buyer_goods, vec![Good::new(10, "X", 5)]);
    assert_eq!(report.most_expensive_good_category.as_deref(), Some("Y"));
    assert_eq!(report.minimum_sales_city.as_deref(), Some("Oslo"));
    assert_eq!(report.top_popular_buyers[0].buyer.id, 1);
    assert_eq!(report.minimum_shops_per_country, 2);
    assert_eq!(report.cross_city_filtered_sales.len(), 2);
    assert_eq!(report.total_sales_value, 13);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_sales_value"], 13);
    assert_eq!(json["top_popular_buyers"][0]["buyer"]["name"], "Al");
}

#[test]
fn duplicate_good_ids_join_once_per_matching_row() {
    let mut db = empty_retail_db();
    insert_goods(&mut db, &[(1, "Books", 5), (1, "Books", 5)]);
    insert_sales(&mut db, &[(1, 1, 1, 2)]);

    assert_eq!(total_sales_value(&db).unwrap(), 20);
    assert_eq!(
        most_expensive_good_category(&db).unwrap().as_deref(),
        Some("Books")
    );
}

#[test]
fn duplicate_shop_ids_repeat_cross_city_sale_per_matching_row() {
    let mut db = empty_retail_db();
    insert_shops(&mut db, &[(1, "Berlin", "DE"), (1, "Munich", "DE")]);
    insert_sales(&mut db, &[(2, 1, 1, 1)]);

    let ids = cross_city_filtered_sales(&db)
        .unwrap()
        .iter()
        .map(|sale| sale.id)
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![1, 1]);
}

#[test]
fn overflowing_line_value_returns_overflow_error() {
    let mut db = empty_retail_db();
    insert_goods(&mut db, &[(1, "A", i64::MAX / 2)]);
    insert_sales(&mut db, &[(1, 1, 1, 3)]);

    let err = most_expensive_good_category(&db).unwrap_err();
    assert!(
        matches!(err, StoreError::Overflow { query: "most_expensive_good_category" }),
        "unexpected error: {err}"
    );
    assert_eq!(err.code(), "arithmetic_overflow");

    let err = total_sales_value(&db).unwrap_err();
    assert!(
        matches!(err, StoreError::Overflow { query: "total_sales_value" }),
        "unexpected error: {err}"
    );
}

#[test]
fn overflowing_sum_returns_overflow_error() {
    let mut db = empty_retail_db();
    insert_buyers(&mut db, &[(1, "Al")]);
    insert_goods(&mut db, &[(1, "A", 1)]);
    insert_sales(&mut db, &[(1, 1, 1, i64::MAX), (1, 1, 1, 1)]);

    let err = total_sales_value(&db).unwrap_err();
    assert!(matches!(err, StoreError::Overflow { .. }), "unexpected error: {err}");

    let err = top_popular_buyers(&db).unwrap_err();
    assert!(
        matches!(err, StoreError::Overflow { query: "top_popular_buyers" }),
        "unexpected error: {err}"
    );
}
