use serde::Deserialize;

use crate::domain::errors::DomainError;
use crate::domain::order::OrderStatus;
use crate::domain::validation;

/// Width of `orders.payment_transaction_id`.
const TRANSACTION_ID_MAX: usize = 255;

/// Callback body posted by the payment processor.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotification {
    pub merchant_reference: String,
    pub status: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    Failed,
    Canceled,
    Unrecognized,
}

impl PaymentOutcome {
    pub fn from_gateway_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "success" | "paid" | "completed" | "captured" => PaymentOutcome::Paid,
            "failed" | "declined" | "error" => PaymentOutcome::Failed,
            "canceled" | "cancelled" => PaymentOutcome::Canceled,
            _ => PaymentOutcome::Unrecognized,
        }
    }

    pub fn target_status(&self) -> Option<OrderStatus> {
        match self {
            PaymentOutcome::Paid => Some(OrderStatus::Confirmed),
            PaymentOutcome::Failed => Some(OrderStatus::Failed),
            PaymentOutcome::Canceled => Some(OrderStatus::Canceled),
            PaymentOutcome::Unrecognized => None,
        }
    }
}

impl PaymentNotification {
    pub fn parse(body: &[u8]) -> Result<Self, DomainError> {
        let notification: Self = serde_json::from_slice(body)
            .map_err(|e| DomainError::invalid(format!("malformed payment notification: {e}")))?;
        if let Some(txn) = &notification.transaction_id {
            validation::max_len("transaction_id", txn, TRANSACTION_ID_MAX)?;
        }
        Ok(notification)
    }

    /// The order reference embedded after the `merchant_id:` prefix.
    pub fn order_reference(&self) -> Result<&str, DomainError> {
        let raw = self.merchant_reference.trim();
        let reference = raw.split_once(':').map_or(raw, |(_, r)| r).trim();
        if reference.is_empty() {
            return Err(DomainError::invalid("notification carries no order reference"));
        }
        Ok(reference)
    }

    pub fn outcome(&self) -> PaymentOutcome {
        PaymentOutcome::from_gateway_status(&self.status)
    }
}
