pub mod gateway;
pub mod notification;

pub use gateway::{PaymentGateway, PaymentRequest, SignedPaymentRequest};
pub use notification::{PaymentNotification, PaymentOutcome};
