use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{Page, PageRequest};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    CustomerView, NewOrderInput, OrderItemView, OrderStatus, OrderView, PaymentMethod,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{customers, order_items, orders};

use super::models::{
    CustomerRow, NewCustomerRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow,
};

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view(
    order: OrderRow,
    customer: Option<CustomerRow>,
    items: Vec<OrderItemRow>,
) -> Result<OrderView, DomainError> {
    let status: OrderStatus = order.status.parse().map_err(|_| {
        DomainError::Internal(format!("order {} has unknown status '{}'", order.id, order.status))
    })?;
    let payment_method: PaymentMethod = order.payment_method.parse().map_err(|_| {
        DomainError::Internal(format!(
            "order {} has unknown payment method '{}'",
            order.id, order.payment_method
        ))
    })?;

    Ok(OrderView {
        id: order.id,
        reference: order.reference,
        status,
        payment_method,
        total_amount: order.total_amount,
        shipping_address: order.shipping_address,
        payment_transaction_id: order.payment_transaction_id,
        created_at: order.created_at,
        customer: customer.map(|c| CustomerView {
            id: c.id,
            full_name: c.full_name,
            email: c.email,
            phone: c.phone,
        }),
        items: items
            .into_iter()
            .map(|i| OrderItemView {
                id: i.id,
                offer_id: i.offer_id,
                vendor_id: i.vendor_id,
                title: i.title,
                quantity: i.quantity,
                price: i.price,
            })
            .collect(),
    })
}

fn load_full(conn: &mut PgConnection, order: OrderRow) -> Result<OrderView, DomainError> {
    let customer = customers::table
        .filter(customers::id.eq(order.customer_id))
        .select(CustomerRow::as_select())
        .first(conn)
        .optional()?;

    let items = order_items::table
        .filter(order_items::order_id.eq(order.id))
        .select(OrderItemRow::as_select())
        .order(order_items::position.asc())
        .load(conn)?;

    to_view(order, customer, items)
}

impl OrderRepository for DieselOrderRepository {
    fn place(&self, order: NewOrderInput) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Customer record from the shipping form
            let customer_id = Uuid::new_v4();
            let shipping = &order.shipping;
            diesel::insert_into(customers::table)
                .values(&NewCustomerRow {
                    id: customer_id,
                    profile_id: order.profile_id,
                    full_name: shipping.full_name.trim().to_string(),
                    email: shipping.email.trim().to_string(),
                    phone: shipping.phone.trim().to_string(),
                    address: shipping.address.trim().to_string(),
                    city: shipping.city.trim().to_string(),
                    postal_code: shipping.postal_code(),
                })
                .execute(conn)?;

            // 2. The order itself, always Pending at this point
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order.order_id,
                    reference: order.reference.clone(),
                    customer_id,
                    profile_id: order.profile_id,
                    status: OrderStatus::Pending.as_str().to_string(),
                    payment_method: order.payment_method.as_str().to_string(),
                    total_amount: order.total_amount.clone(),
                    shipping_address: shipping.formatted_address(),
                })
                .execute(conn)?;

            // 3. Order items
            let new_items: Vec<NewOrderItemRow> = order
                .items
                .iter()
                .zip(0..)
                .map(|(i, position)| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id: order.order_id,
                    offer_id: i.offer_id,
                    vendor_id: i.vendor_id,
                    title: i.title.clone(),
                    quantity: i.quantity,
                    price: i.price.clone(),
                    position,
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            let row = orders::table
                .filter(orders::id.eq(order.order_id))
                .select(OrderRow::as_select())
                .first(conn)?;
            load_full(conn, row)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        order.map(|o| load_full(&mut conn, o)).transpose()
    }

    fn find_by_reference(&self, reference: &str) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::reference.eq(reference))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        order.map(|o| load_full(&mut conn, o)).transpose()
    }

    fn list_for_profile(
        &self,
        profile_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table
                .filter(orders::profile_id.eq(profile_id))
                .count()
                .get_result(conn)?;

            let rows = orders::table
                .filter(orders::profile_id.eq(profile_id))
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.asc()))
                .limit(page.limit)
                .offset(page.offset())
                .load(conn)?;

            let items = OrderItemRow::belonging_to(&rows)
                .select(OrderItemRow::as_select())
                .order(order_items::position.asc())
                .load(conn)?
                .grouped_by(&rows);

            let views = rows
                .into_iter()
                .zip(items)
                .map(|(order, items)| to_view(order, None, items))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Page {
                items: views,
                total,
                page: page.page,
                limit: page.limit,
            })
        })
    }

    fn update_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
        transaction_id: Option<&str>,
    ) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let target = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::status.eq(expected.as_str()));
        let now = Utc::now();

        let updated = match transaction_id {
            Some(txn) => diesel::update(target)
                .set((
                    orders::status.eq(next.as_str()),
                    orders::payment_transaction_id.eq(txn),
                    orders::updated_at.eq(now),
                ))
                .execute(&mut conn)?,
            None => diesel::update(target)
                .set((orders::status.eq(next.as_str()), orders::updated_at.eq(now)))
                .execute(&mut conn)?,
        };

        Ok(updated == 1)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use uuid::Uuid;

    use super::DieselOrderRepository;
    use crate::domain::catalog::PageRequest;
    use crate::domain::order::{
        order_reference, NewOrderInput, OrderItemInput, OrderStatus, PaymentMethod,
        ShippingDetails,
    };
    use crate::domain::ports::OrderRepository;
    use crate::infrastructure::test_support::{insert_profile, setup_db};

    fn new_order(profile_id: Option<Uuid>) -> NewOrderInput {
        let order_id = Uuid::new_v4();
        NewOrderInput {
            order_id,
            reference: order_reference(order_id, Utc::now()),
            profile_id,
            shipping: ShippingDetails {
                full_name: "Hina Raza".to_string(),
                email: "hina@example.com".to_string(),
                phone: "03001234567".to_string(),
                address: "12 Mall Road".to_string(),
                city: "Lahore".to_string(),
                postal_code: None,
            },
            payment_method: PaymentMethod::Online,
            total_amount: BigDecimal::from_str("19.98").unwrap(),
            items: vec![OrderItemInput {
                offer_id: Uuid::new_v4(),
                vendor_id: Uuid::new_v4(),
                title: "Pizza deal".to_string(),
                quantity: 2,
                price: BigDecimal::from_str("9.99").unwrap(),
            }],
        }
    }

    #[tokio::test]
    async fn place_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let input = new_order(None);
        let placed = repo.place(input.clone()).expect("place failed");
        assert_eq!(placed.id, input.order_id);
        assert_eq!(placed.status, OrderStatus::Pending);
        assert_eq!(placed.shipping_address, "12 Mall Road, Lahore");

        let found = repo
            .find_by_id(input.order_id)
            .expect("find failed")
            .expect("order should exist");
        assert_eq!(found.reference, input.reference);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].quantity, 2);
        assert_eq!(found.customer.expect("customer").full_name, "Hina Raza");
    }

    #[tokio::test]
    async fn items_come_back_in_cart_order() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let mut input = new_order(None);
        let template = input.items[0].clone();
        input.items = ["Zinger", "Alfredo", "Margherita", "Brownie"]
            .into_iter()
            .map(|title| OrderItemInput {
                offer_id: Uuid::new_v4(),
                title: title.to_string(),
                ..template.clone()
            })
            .collect();
        repo.place(input.clone()).expect("place failed");

        let found = repo.find_by_id(input.order_id).unwrap().unwrap();
        let titles: Vec<&str> = found.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Zinger", "Alfredo", "Margherita", "Brownie"]);
    }

    #[tokio::test]
    async fn postal_code_is_stored_trimmed() {
        use crate::schema::customers;
        use diesel::prelude::*;

        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());

        let mut input = new_order(None);
        input.shipping.postal_code = Some("  54000  ".to_string());
        let placed = repo.place(input).expect("place failed");
        assert_eq!(placed.shipping_address, "12 Mall Road, Lahore, 54000");

        let mut conn = pool.get().expect("Failed to get connection");
        let stored: Option<String> = customers::table
            .filter(customers::id.eq(placed.customer.expect("customer").id))
            .select(customers::postal_code)
            .first(&mut conn)
            .expect("customer row");
        assert_eq!(stored.as_deref(), Some("54000"));
    }

    #[tokio::test]
    async fn find_by_reference_returns_none_for_unknown_reference() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let result = repo.find_by_reference("EZC-00000000-DEADBEEF").expect("find should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_status_is_compare_and_set() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let order = repo.place(new_order(None)).expect("place failed");

        let first = repo
            .update_status(order.id, OrderStatus::Pending, OrderStatus::Confirmed, Some("TXN-1"))
            .expect("update failed");
        let second = repo
            .update_status(order.id, OrderStatus::Pending, OrderStatus::Failed, None)
            .expect("update failed");

        assert!(first);
        assert!(!second, "stale expected status must not apply");
        let stored = repo.find_by_id(order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Confirmed);
        assert_eq!(stored.payment_transaction_id.as_deref(), Some("TXN-1"));
    }

    #[tokio::test]
    async fn list_for_profile_paginates_and_includes_items() {
        let (_container, pool) = setup_db().await;
        let profile_id = insert_profile(&pool, "owner@example.com");
        let repo = DieselOrderRepository::new(pool);

        for _ in 0..3 {
            repo.place(new_order(Some(profile_id))).expect("place failed");
        }
        repo.place(new_order(None)).expect("place failed");

        let page1 = repo
            .list_for_profile(profile_id, PageRequest::new(Some(1), Some(2)))
            .expect("list failed");
        assert_eq!(page1.total, 3);
        assert_eq!(page1.items.len(), 2);
        assert!(page1.items.iter().all(|o| o.items.len() == 1));

        let page2 = repo
            .list_for_profile(profile_id, PageRequest::new(Some(2), Some(2)))
            .expect("list failed");
        assert_eq!(page2.items.len(), 1);
    }
}
