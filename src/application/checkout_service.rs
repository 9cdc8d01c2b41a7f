use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    order_reference, NewOrderInput, OrderItemInput, OrderStatus, OrderView, PaymentMethod,
    ShippingDetails,
};
use crate::domain::ports::{CartRepository, OrderRepository};
use crate::payment::{PaymentGateway, PaymentRequest};

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub cart_id: Uuid,
    pub profile_id: Option<Uuid>,
    pub shipping: ShippingDetails,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone)]
pub enum NextStep {
    /// Send the buyer to the hosted payment page.
    Redirect(Url),
    Completed,
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: OrderView,
    pub next: NextStep,
}

pub struct CheckoutService<C, O> {
    carts: C,
    orders: O,
    gateway: PaymentGateway,
}

impl<C: CartRepository, O: OrderRepository> CheckoutService<C, O> {
    pub fn new(carts: C, orders: O, gateway: PaymentGateway) -> Self {
        Self {
            carts,
            orders,
            gateway,
        }
    }

    pub fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome, DomainError> {
        request.shipping.validate()?;

        let cart = self
            .carts
            .load(request.cart_id)?
            .filter(|c| !c.is_empty())
            .ok_or_else(|| DomainError::invalid("cart is empty"))?;

        let order_id = Uuid::new_v4();
        let now = Utc::now();
        let items = cart
            .lines()
            .map(|line| OrderItemInput {
                offer_id: line.product_id,
                vendor_id: line.vendor_id,
                title: line.title.clone(),
                quantity: line.quantity,
                price: line.unit_price().clone(),
            })
            .collect();

        let mut order = self.orders.place(NewOrderInput {
            order_id,
            reference: order_reference(order_id, now),
            profile_id: request.profile_id,
            shipping: request.shipping.clone(),
            payment_method: request.payment_method,
            total_amount: cart.total(),
            items,
        })?;
        log::info!(
            "Placed order {} ({} items, total {})",
            order.reference,
            order.items.len(),
            order.total_amount
        );

        self.carts.delete(request.cart_id)?;

        let next = match request.payment_method {
            PaymentMethod::Online => {
                let url = self.gateway.checkout_redirect(
                    &PaymentRequest {
                        order_reference: order.reference.clone(),
                        amount: order.total_amount.clone(),
                        customer_email: request.shipping.email.trim().to_string(),
                        customer_phone: request.shipping.phone.trim().to_string(),
                        description: format!("EziChoice order {}", order.reference),
                    },
                    now.timestamp(),
                )?;
                NextStep::Redirect(url)
            }
            PaymentMethod::CashOnDelivery => {
                if self
                    .orders
                    .update_status(order.id, OrderStatus::Pending, OrderStatus::Confirmed, None)?
                {
                    order.status = OrderStatus::Confirmed;
                }
                NextStep::Completed
            }
        };

        Ok(CheckoutOutcome { order, next })
    }
}
