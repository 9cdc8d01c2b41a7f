//! In-memory ports for service tests.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::catalog::{Category, OfferFilter, OfferView, Page, PageRequest, Vendor};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    order_reference, CustomerView, NewOrderInput, OrderItemView, OrderStatus, OrderView,
    PaymentMethod,
};
use crate::domain::ports::{CartRepository, CatalogRepository, OrderRepository};

pub(crate) fn sample_order(status: OrderStatus) -> OrderView {
    let id = Uuid::new_v4();
    OrderView {
        id,
        reference: order_reference(id, Utc::now()),
        status,
        payment_method: PaymentMethod::Online,
        total_amount: BigDecimal::from(1200),
        shipping_address: "1 Canal Road, Lahore".to_string(),
        payment_transaction_id: None,
        created_at: Utc::now(),
        customer: None,
        items: Vec::new(),
    }
}

pub(crate) fn sample_offer(price: &str, offer_price: Option<&str>) -> OfferView {
    OfferView {
        id: Uuid::new_v4(),
        vendor_id: Uuid::new_v4(),
        vendor_name: "Pizza Point".to_string(),
        category_id: Uuid::new_v4(),
        category_name: "Food".to_string(),
        title: "Large Pizza".to_string(),
        description: None,
        price: BigDecimal::from_str(price).unwrap(),
        offer_price: offer_price.map(|p| BigDecimal::from_str(p).unwrap()),
        image_url: Some("https://cdn.example.com/pizza.jpg".to_string()),
        is_active: true,
        created_at: Utc::now(),
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryOrders {
    orders: Arc<Mutex<HashMap<Uuid, OrderView>>>,
    fail_place: bool,
}

impl InMemoryOrders {
    pub(crate) fn failing() -> Self {
        Self {
            fail_place: true,
            ..Self::default()
        }
    }

    pub(crate) fn insert(&self, order: OrderView) -> OrderView {
        self.orders.lock().unwrap().insert(order.id, order.clone());
        order
    }

    pub(crate) fn count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

impl OrderRepository for InMemoryOrders {
    fn place(&self, order: NewOrderInput) -> Result<OrderView, DomainError> {
        if self.fail_place {
            return Err(DomainError::Internal("insert failed".to_string()));
        }
        let view = OrderView {
            id: order.order_id,
            reference: order.reference,
            status: OrderStatus::Pending,
            payment_method: order.payment_method,
            total_amount: order.total_amount,
            shipping_address: order.shipping.formatted_address(),
            payment_transaction_id: None,
            created_at: Utc::now(),
            customer: Some(CustomerView {
                id: Uuid::new_v4(),
                full_name: order.shipping.full_name,
                email: order.shipping.email,
                phone: order.shipping.phone,
            }),
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemView {
                    id: Uuid::new_v4(),
                    offer_id: i.offer_id,
                    vendor_id: i.vendor_id,
                    title: i.title,
                    quantity: i.quantity,
                    price: i.price,
                })
                .collect(),
        };
        Ok(self.insert(view))
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    fn find_by_reference(&self, reference: &str) -> Result<Option<OrderView>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .find(|o| o.reference == reference)
            .cloned())
    }

    fn list_for_profile(
        &self,
        _profile_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<OrderView>, DomainError> {
        let items: Vec<OrderView> = self.orders.lock().unwrap().values().cloned().collect();
        Ok(Page {
            total: items.len() as i64,
            items,
            page: page.page,
            limit: page.limit,
        })
    }

    fn update_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
        transaction_id: Option<&str>,
    ) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(&id) {
            Some(order) if order.status == expected => {
                order.status = next;
                if let Some(txn) = transaction_id {
                    order.payment_transaction_id = Some(txn.to_string());
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryCarts {
    carts: Arc<Mutex<HashMap<Uuid, (Cart, i64)>>>,
    racing_writes: Arc<Mutex<usize>>,
}

impl InMemoryCarts {
    pub(crate) fn get(&self, id: Uuid) -> Option<Cart> {
        self.carts.lock().unwrap().get(&id).map(|(cart, _)| cart.clone())
    }

    /// The next `n` saves lose to a simulated concurrent writer.
    pub(crate) fn race_next_saves(&self, n: usize) {
        *self.racing_writes.lock().unwrap() = n;
    }
}

impl CartRepository for InMemoryCarts {
    fn load_versioned(&self, id: Uuid) -> Result<Option<(Cart, i64)>, DomainError> {
        Ok(self.carts.lock().unwrap().get(&id).cloned())
    }

    fn save(&self, id: Uuid, cart: &Cart, expected: Option<i64>) -> Result<bool, DomainError> {
        let mut carts = self.carts.lock().unwrap();
        let mut racing = self.racing_writes.lock().unwrap();
        if *racing > 0 {
            *racing -= 1;
            let entry = carts.entry(id).or_insert_with(|| (Cart::default(), 0));
            entry.1 += 1;
            return Ok(false);
        }
        let current = carts.get(&id).map(|(_, v)| *v);
        if current != expected {
            return Ok(false);
        }
        carts.insert(id, (cart.clone(), expected.map_or(0, |v| v + 1)));
        Ok(true)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.carts.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryCatalog {
    offers: Arc<Mutex<Vec<OfferView>>>,
}

impl InMemoryCatalog {
    pub(crate) fn with_offers(offers: Vec<OfferView>) -> Self {
        Self {
            offers: Arc::new(Mutex::new(offers)),
        }
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(Vec::new())
    }

    fn list_vendors(&self, page: PageRequest) -> Result<Page<Vendor>, DomainError> {
        Ok(Page {
            items: Vec::new(),
            total: 0,
            page: page.page,
            limit: page.limit,
        })
    }

    fn find_vendor_by_slug(&self, _slug: &str) -> Result<Option<Vendor>, DomainError> {
        Ok(None)
    }

    fn list_offers(&self, filter: &OfferFilter) -> Result<Page<OfferView>, DomainError> {
        let items: Vec<OfferView> = self
            .offers
            .lock()
            .unwrap()
            .iter()
            .filter(|o| filter.vendor_id.map_or(true, |v| v == o.vendor_id))
            .cloned()
            .collect();
        Ok(Page {
            total: items.len() as i64,
            items,
            page: filter.page.page,
            limit: filter.page.limit,
        })
    }

    fn find_offer(&self, id: Uuid) -> Result<Option<OfferView>, DomainError> {
        Ok(self
            .offers
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }
}
