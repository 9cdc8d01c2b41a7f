use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "EziChoice marketplace API"),
    paths(
        handlers::catalog::list_categories,
        handlers::catalog::list_offers,
        handlers::catalog::get_offer,
        handlers::catalog::list_vendors,
        handlers::catalog::vendor_storefront,
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::update_item,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::checkout::checkout,
        handlers::checkout::payment_success,
        handlers::checkout::payment_failure,
        handlers::orders::get_order,
        handlers::orders::cancel_order,
        handlers::orders::update_order_status,
        handlers::orders::list_profile_orders,
        handlers::webhooks::payment_webhook,
        handlers::accounts::get_profile,
        handlers::accounts::upsert_profile,
        handlers::accounts::register_for_course,
    ),
    tags(
        (name = "catalog", description = "Categories, vendors and offers"),
        (name = "cart", description = "Vendor grouped shopping carts"),
        (name = "checkout", description = "Order placement and payment returns"),
        (name = "orders", description = "Order lookup and lifecycle"),
        (name = "payments", description = "Payment processor callbacks"),
        (name = "accounts", description = "Profiles and course registrations"),
    )
)]
pub struct ApiDoc;
