use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::PageParams;
use super::{blocking, money};
use crate::domain::catalog::PageRequest;
use crate::domain::order::{OrderStatus, OrderView};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub reference: String,
    pub status: String,
    pub payment_method: String,
    pub total_amount: String,
    pub shipping_address: String,
    pub payment_transaction_id: Option<String>,
    pub created_at: String,
    pub customer: Option<CustomerResponse>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderPageResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of Pending, Confirmed, Shipped, Delivered, Canceled, Failed
    pub status: String,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            reference: o.reference,
            status: o.status.to_string(),
            payment_method: o.payment_method.as_str().to_string(),
            total_amount: money(&o.total_amount),
            shipping_address: o.shipping_address,
            payment_transaction_id: o.payment_transaction_id,
            created_at: o.created_at.to_rfc3339(),
            customer: o.customer.map(|c| CustomerResponse {
                id: c.id,
                full_name: c.full_name,
                email: c.email,
                phone: c.phone,
            }),
            items: o
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    offer_id: i.offer_id,
                    vendor_id: i.vendor_id,
                    title: i.title,
                    quantity: i.quantity,
                    price: money(&i.price),
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders/{id}
///
/// Returns the order together with its customer and items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = blocking(move || state.orders.get_order(order_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{id}/cancel
///
/// Buyer cancellation; only Pending and Confirmed orders can be canceled.
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order canceled", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order can no longer be canceled"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = blocking(move || state.orders.cancel_order(order_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PATCH /orders/{id}/status
///
/// Vendor fulfilment updates, e.g. Confirmed → Shipped → Delivered.
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status: OrderStatus = body.status.parse()?;
    let order = blocking(move || state.orders.update_status(order_id, status)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /profiles/{id}/orders
///
/// The profile's order history, newest first.
#[utoipa::path(
    get,
    path = "/profiles/{id}/orders",
    params(("id" = Uuid, Path, description = "Profile UUID"), PageParams),
    responses(
        (status = 200, description = "Paginated orders", body = OrderPageResponse),
    ),
    tag = "orders"
)]
pub async fn list_profile_orders(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let profile_id = path.into_inner();
    let page = PageRequest::new(query.page, query.limit);
    let orders = blocking(move || state.orders.list_orders_for_profile(profile_id, page)).await?;
    let orders = orders.map(OrderResponse::from);
    Ok(HttpResponse::Ok().json(OrderPageResponse {
        items: orders.items,
        total: orders.total,
        page: orders.page,
        limit: orders.limit,
    }))
}
