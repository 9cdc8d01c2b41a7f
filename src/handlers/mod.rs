pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod webhooks;

use actix_web::web;
use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Runs blocking repository work off the async workers.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f).await??)
}

pub(crate) fn money(amount: &BigDecimal) -> String {
    crate::payment::gateway::format_amount(amount)
}
