use crate::application::account_service::AccountService;
use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::application::checkout_service::CheckoutService;
use crate::application::order_service::OrderService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::infrastructure::{
    DieselAccountRepository, DieselCartRepository, DieselCatalogRepository, DieselOrderRepository,
};
use crate::payment::PaymentGateway;

/// Services shared by every worker, wired to the Diesel repositories.
pub struct AppState {
    pub catalog: CatalogService<DieselCatalogRepository>,
    pub carts: CartService<DieselCartRepository, DieselCatalogRepository>,
    pub checkout: CheckoutService<DieselCartRepository, DieselOrderRepository>,
    pub orders: OrderService<DieselOrderRepository>,
    pub accounts: AccountService<DieselAccountRepository>,
    pub gateway: PaymentGateway,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        let catalog_repo = DieselCatalogRepository::new(pool.clone());
        let cart_repo = DieselCartRepository::new(pool.clone());
        let order_repo = DieselOrderRepository::new(pool.clone());
        let gateway = PaymentGateway::new(config.payment.clone(), config.base_url.clone());

        Self {
            catalog: CatalogService::new(catalog_repo.clone()),
            carts: CartService::new(cart_repo.clone(), catalog_repo),
            checkout: CheckoutService::new(cart_repo, order_repo.clone(), gateway.clone()),
            orders: OrderService::new(order_repo),
            accounts: AccountService::new(DieselAccountRepository::new(pool)),
            gateway,
        }
    }
}
