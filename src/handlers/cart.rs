use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{blocking, money};
use crate::domain::cart::{Cart, CartLineItem, VendorCart};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub offer_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// Zero removes the line.
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub offer_id: Uuid,
    pub title: String,
    pub price: String,
    pub offer_price: Option<String>,
    pub unit_price: String,
    pub quantity: i32,
    pub line_total: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorCartResponse {
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub items: Vec<CartLineResponse>,
    pub subtotal: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub cart_id: Uuid,
    pub vendors: Vec<VendorCartResponse>,
    pub item_count: i64,
    pub total: String,
}

impl From<&CartLineItem> for CartLineResponse {
    fn from(l: &CartLineItem) -> Self {
        Self {
            offer_id: l.product_id,
            title: l.title.clone(),
            price: money(&l.price),
            offer_price: l.offer_price.as_ref().map(money),
            unit_price: money(l.unit_price()),
            quantity: l.quantity,
            line_total: money(&l.line_total()),
            image: l.image.clone(),
        }
    }
}

impl From<&VendorCart> for VendorCartResponse {
    fn from(v: &VendorCart) -> Self {
        Self {
            vendor_id: v.vendor_id,
            vendor_name: v.vendor_name.clone(),
            items: v.items.iter().map(Into::into).collect(),
            subtotal: money(&v.subtotal()),
        }
    }
}

impl CartResponse {
    fn new(cart_id: Uuid, cart: &Cart) -> Self {
        Self {
            cart_id,
            vendors: cart.vendors.iter().map(Into::into).collect(),
            item_count: cart.item_count(),
            total: money(&cart.total()),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /carts/{id}
///
/// Unknown cart ids return an empty cart.
#[utoipa::path(
    get,
    path = "/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart UUID chosen by the client")),
    responses((status = 200, description = "Cart contents", body = CartResponse)),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let cart_id = path.into_inner();
    let cart = blocking(move || state.carts.get(cart_id)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::new(cart_id, &cart)))
}

/// POST /carts/{id}/items
#[utoipa::path(
    post,
    path = "/carts/{id}/items",
    params(("id" = Uuid, Path, description = "Cart UUID")),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Quantity out of range"),
        (status = 404, description = "Offer not found"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let cart_id = path.into_inner();
    let AddItemRequest { offer_id, quantity } = body.into_inner();
    let cart = blocking(move || state.carts.add_item(cart_id, offer_id, quantity)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::new(cart_id, &cart)))
}

/// PUT /carts/{id}/items/{offer_id}
#[utoipa::path(
    put,
    path = "/carts/{id}/items/{offer_id}",
    params(
        ("id" = Uuid, Path, description = "Cart UUID"),
        ("offer_id" = Uuid, Path, description = "Offer UUID"),
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Item not in cart"),
    ),
    tag = "cart"
)]
pub async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let (cart_id, offer_id) = path.into_inner();
    let quantity = body.quantity;
    let cart = blocking(move || state.carts.update_quantity(cart_id, offer_id, quantity)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::new(cart_id, &cart)))
}

/// DELETE /carts/{id}/items/{offer_id}
#[utoipa::path(
    delete,
    path = "/carts/{id}/items/{offer_id}",
    params(
        ("id" = Uuid, Path, description = "Cart UUID"),
        ("offer_id" = Uuid, Path, description = "Offer UUID"),
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Item not in cart"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (cart_id, offer_id) = path.into_inner();
    let cart = blocking(move || state.carts.remove_item(cart_id, offer_id)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::new(cart_id, &cart)))
}

/// DELETE /carts/{id}
#[utoipa::path(
    delete,
    path = "/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart UUID")),
    responses((status = 204, description = "Cart cleared")),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let cart_id = path.into_inner();
    blocking(move || state.carts.clear(cart_id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
