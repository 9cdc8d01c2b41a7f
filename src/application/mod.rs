pub mod account_service;
pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod order_service;

#[cfg(test)]
pub(crate) mod fakes;
