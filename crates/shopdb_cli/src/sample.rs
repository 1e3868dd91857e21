//! Sample retail dataset used by `shopdb seed`.

use shopdb_core::{Buyer, Database, Good, Sale, Shop, StoreResult};

const BUYERS: &[(i64, &str)] = &[
    (1, "Alice"),
    (2, "Bob"),
    (3, "Alexandra"),
    (4, "Chen"),
];

const SHOPS: &[(i64, &str, &str)] = &[
    (1, "Berlin", "Germany"),
    (2, "Munich", "Germany"),
    (3, "Lyon", "France"),
];

const GOODS: &[(i64, &str, i64)] = &[
    (10, "Books", 12),
    (11, "Books", 30),
    (12, "Games", 60),
    (13, "Garden", 25),
];

// (id, buyer_id, shop_id, good_id, good_count)
const SALES: &[(i64, i64, i64, i64, i64)] = &[
    (100, 1, 1, 10, 2),
    (101, 3, 2, 12, 1),
    (102, 3, 3, 10, 4),
    (103, 2, 1, 13, 3),
    (104, 4, 3, 11, 1),
    (105, 1, 2, 12, 2),
];

/// Creates every retail table and appends the sample rows.
pub fn seed(db: &mut Database) -> StoreResult<usize> {
    db.create_table::<Buyer>();
    db.create_table::<Shop>();
    db.create_table::<Good>();
    db.create_table::<Sale>();

    for &(id, name) in BUYERS {
        db.insert_into(|| Buyer::new(id, name))?;
    }
    for &(id, city, country) in SHOPS {
        db.insert_into(|| Shop::new(id, city, country))?;
    }
    for &(id, category, price) in GOODS {
        db.insert_into(|| Good::new(id, category, price))?;
    }
    for &(id, buyer_id, shop_id, good_id, good_count) in SALES {
        db.insert_into(|| Sale::new(id, buyer_id, shop_id, good_id, good_count))?;
    }

    Ok(BUYERS.len() + SHOPS.len() + GOODS.len() + SALES.len())
}
