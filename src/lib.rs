pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod payment;
pub mod schema;
pub mod state;

use std::error::Error;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use state::AppState;

use crate::openapi::ApiDoc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .route("/categories", web::get().to(handlers::catalog::list_categories))
            .service(
                web::scope("/offers")
                    .route("", web::get().to(handlers::catalog::list_offers))
                    .route("/{id}", web::get().to(handlers::catalog::get_offer)),
            )
            .service(
                web::scope("/vendors")
                    .route("", web::get().to(handlers::catalog::list_vendors))
                    .route("/{slug}", web::get().to(handlers::catalog::vendor_storefront)),
            )
            .service(
                web::scope("/carts/{id}")
                    .route("", web::get().to(handlers::cart::get_cart))
                    .route("", web::delete().to(handlers::cart::clear_cart))
                    .route("/items", web::post().to(handlers::cart::add_item))
                    .route("/items/{offer_id}", web::put().to(handlers::cart::update_item))
                    .route("/items/{offer_id}", web::delete().to(handlers::cart::remove_item)),
            )
            .service(
                web::scope("/checkout")
                    .route("", web::post().to(handlers::checkout::checkout))
                    .route("/success", web::get().to(handlers::checkout::payment_success))
                    .route("/failure", web::get().to(handlers::checkout::payment_failure)),
            )
            .service(
                web::scope("/orders/{id}")
                    .route("", web::get().to(handlers::orders::get_order))
                    .route("/cancel", web::post().to(handlers::orders::cancel_order))
                    .route("/status", web::patch().to(handlers::orders::update_order_status)),
            )
            .service(
                web::scope("/profiles/{id}")
                    .route("", web::get().to(handlers::accounts::get_profile))
                    .route("", web::put().to(handlers::accounts::upsert_profile))
                    .route("/orders", web::get().to(handlers::orders::list_profile_orders)),
            )
            .route(
                "/courses/{slug}/registrations",
                web::post().to(handlers::accounts::register_for_course),
            )
            .route("/webhooks/payment", web::post().to(handlers::webhooks::payment_webhook))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
