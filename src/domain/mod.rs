pub mod account;
pub mod cart;
pub mod catalog;
pub mod errors;
pub mod order;
pub mod ports;
pub mod validation;
