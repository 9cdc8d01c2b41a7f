use chrono::Utc;
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::carts;

use super::models::CartRow;

/// Carts stored as one JSONB document per cart id.
#[derive(Clone)]
pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn load_versioned(&self, id: Uuid) -> Result<Option<(Cart, i64)>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<(Value, i64)> = carts::table
            .filter(carts::id.eq(id))
            .select((carts::items, carts::version))
            .first(&mut conn)
            .optional()?;

        match row {
            Some((doc, version)) => Ok(Some((serde_json::from_value(doc)?, version))),
            None => Ok(None),
        }
    }

    fn save(&self, id: Uuid, cart: &Cart, expected: Option<i64>) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let items = serde_json::to_value(cart)?;
        let now = Utc::now();

        let written = match expected {
            None => diesel::insert_into(carts::table)
                .values(&CartRow {
                    id,
                    items,
                    version: 0,
                    updated_at: now,
                })
                .on_conflict_do_nothing()
                .execute(&mut conn)?,
            Some(version) => diesel::update(
                carts::table
                    .filter(carts::id.eq(id))
                    .filter(carts::version.eq(version)),
            )
            .set((
                carts::items.eq(items),
                carts::version.eq(version + 1),
                carts::updated_at.eq(now),
            ))
            .execute(&mut conn)?,
        };
        Ok(written == 1)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::delete(carts::table.filter(carts::id.eq(id))).execute(&mut conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::DieselCartRepository;
    use crate::domain::cart::{Cart, CartLineItem};
    use crate::domain::ports::CartRepository;
    use crate::infrastructure::test_support::setup_db;

    fn cart_with(quantity: i32) -> Cart {
        let mut cart = Cart::default();
        cart.add_item(CartLineItem {
            product_id: Uuid::new_v4(),
            vendor_id: Uuid::new_v4(),
            vendor_name: "Pizza Point".to_string(),
            title: "Large Pizza".to_string(),
            price: BigDecimal::from_str("1800").unwrap(),
            offer_price: Some(BigDecimal::from_str("1200").unwrap()),
            quantity,
            image: None,
        })
        .unwrap();
        cart
    }

    #[tokio::test]
    async fn save_is_versioned_and_delete_removes() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool);
        let id = Uuid::new_v4();

        assert!(repo.load(id).expect("load failed").is_none());

        assert!(repo.save(id, &cart_with(1), None).expect("save failed"));
        assert!(
            !repo.save(id, &cart_with(2), None).expect("save failed"),
            "second create must not overwrite"
        );

        let (_, version) = repo.load_versioned(id).expect("load failed").expect("cart exists");
        assert!(repo.save(id, &cart_with(3), Some(version)).expect("save failed"));
        assert!(
            !repo.save(id, &cart_with(5), Some(version)).expect("save failed"),
            "stale version must not apply"
        );

        let (loaded, current) = repo.load_versioned(id).expect("load failed").expect("cart exists");
        assert_eq!(current, version + 1);
        assert_eq!(loaded.item_count(), 3);
        assert_eq!(loaded.total(), BigDecimal::from(3600));

        repo.delete(id).expect("delete failed");
        assert!(repo.load(id).expect("load failed").is_none());
    }
}
