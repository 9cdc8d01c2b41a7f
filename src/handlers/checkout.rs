use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{blocking, money};
use crate::application::checkout_service::{CheckoutRequest, NextStep};
use crate::domain::order::{OrderStatus, PaymentMethod, ShippingDetails};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShippingForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutBody {
    pub cart_id: Uuid,
    pub profile_id: Option<Uuid>,
    pub shipping: ShippingForm,
    /// `online` or `cash_on_delivery`
    pub payment_method: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub reference: String,
    pub status: String,
    pub total_amount: String,
    /// Hosted payment page to send the buyer to; absent for cash on delivery.
    pub redirect_url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReturnParams {
    pub reference: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentReturnResponse {
    pub reference: String,
    pub status: String,
    pub message: String,
}

impl CheckoutBody {
    fn into_request(self) -> Result<CheckoutRequest, AppError> {
        let payment_method = self.payment_method.parse::<PaymentMethod>()?;
        let s = self.shipping;
        Ok(CheckoutRequest {
            cart_id: self.cart_id,
            profile_id: self.profile_id,
            shipping: ShippingDetails {
                full_name: s.full_name,
                email: s.email,
                phone: s.phone,
                address: s.address,
                city: s.city,
                postal_code: s.postal_code,
            },
            payment_method,
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Validates the shipping form, writes customer, order and order items in
/// one transaction and clears the cart. Online payments get a signed
/// redirect to the hosted payment page; cash on delivery is confirmed
/// immediately.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutBody,
    responses(
        (status = 201, description = "Order placed", body = CheckoutResponse),
        (status = 400, description = "Invalid form or empty cart"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    body: web::Json<CheckoutBody>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner().into_request()?;
    let outcome = blocking(move || state.checkout.checkout(request)).await?;

    let redirect_url = match outcome.next {
        NextStep::Redirect(url) => Some(url.to_string()),
        NextStep::Completed => None,
    };
    Ok(HttpResponse::Created().json(CheckoutResponse {
        order_id: outcome.order.id,
        reference: outcome.order.reference,
        status: outcome.order.status.to_string(),
        total_amount: money(&outcome.order.total_amount),
        redirect_url,
    }))
}

async fn payment_return(
    state: web::Data<AppState>,
    reference: String,
    fallback: &str,
) -> Result<HttpResponse, AppError> {
    let order = blocking(move || state.orders.get_order_by_reference(&reference)).await?;
    let message = match order.status {
        OrderStatus::Pending => fallback,
        OrderStatus::Failed | OrderStatus::Canceled => "Payment was not completed.",
        OrderStatus::Confirmed | OrderStatus::Shipped | OrderStatus::Delivered => {
            "Payment received. Your order is confirmed."
        }
    };
    Ok(HttpResponse::Ok().json(PaymentReturnResponse {
        reference: order.reference,
        status: order.status.to_string(),
        message: message.to_string(),
    }))
}

/// GET /checkout/success
///
/// Landing point after the hosted page; the webhook decides the status.
#[utoipa::path(
    get,
    path = "/checkout/success",
    params(ReturnParams),
    responses(
        (status = 200, description = "Current order status", body = PaymentReturnResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "checkout"
)]
pub async fn payment_success(
    state: web::Data<AppState>,
    query: web::Query<ReturnParams>,
) -> Result<HttpResponse, AppError> {
    payment_return(
        state,
        query.into_inner().reference,
        "Payment is being confirmed.",
    )
    .await
}

/// GET /checkout/failure
#[utoipa::path(
    get,
    path = "/checkout/failure",
    params(ReturnParams),
    responses(
        (status = 200, description = "Current order status", body = PaymentReturnResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "checkout"
)]
pub async fn payment_failure(
    state: web::Data<AppState>,
    query: web::Query<ReturnParams>,
) -> Result<HttpResponse, AppError> {
    payment_return(
        state,
        query.into_inner().reference,
        "Payment was not completed.",
    )
    .await
}
