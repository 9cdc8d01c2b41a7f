use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;
use super::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Canceled,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Canceled => "Canceled",
            OrderStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Canceled | OrderStatus::Failed
        )
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Failed)
                | (Pending, Canceled)
                | (Confirmed, Shipped)
                | (Confirmed, Canceled)
                | (Shipped, Delivered)
        )
    }

    pub fn can_cancel(&self) -> bool {
        self.can_transition_to(OrderStatus::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "canceled" | "cancelled" => Ok(OrderStatus::Canceled),
            "failed" => Ok(OrderStatus::Failed),
            other => Err(DomainError::invalid(format!("unknown order status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
            PaymentMethod::Online => "online",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash_on_delivery" => Ok(PaymentMethod::CashOnDelivery),
            "online" => Ok(PaymentMethod::Online),
            other => Err(DomainError::invalid(format!("unknown payment method '{other}'"))),
        }
    }
}

/// Human-facing order reference, e.g. `EZC-20261019-1A2B3C4D`.
pub fn order_reference(order_id: Uuid, placed_at: DateTime<Utc>) -> String {
    let simple = order_id.simple().to_string().to_ascii_uppercase();
    format!("EZC-{}-{}", placed_at.format("%Y%m%d"), &simple[..8])
}

/// Shipping form collected at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
}

impl ShippingDetails {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::require("full_name", &self.full_name)?;
        validation::max_len("full_name", &self.full_name, validation::NAME_MAX)?;
        validation::email(&self.email)?;
        validation::max_len("email", &self.email, validation::EMAIL_MAX)?;
        validation::phone(&self.phone)?;
        validation::max_len("phone", &self.phone, validation::PHONE_MAX)?;
        validation::require("address", &self.address)?;
        validation::max_len("address", &self.address, validation::ADDRESS_MAX)?;
        validation::require("city", &self.city)?;
        validation::max_len("city", &self.city, validation::CITY_MAX)?;
        if let Some(code) = &self.postal_code {
            validation::max_len("postal_code", code, validation::POSTAL_CODE_MAX)?;
        }
        Ok(())
    }

    /// Postal code as stored: trimmed, blank treated as absent.
    pub fn postal_code(&self) -> Option<String> {
        self.postal_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }

    /// Single-line address stored on the order.
    pub fn formatted_address(&self) -> String {
        let mut parts = vec![self.address.trim().to_string(), self.city.trim().to_string()];
        parts.extend(self.postal_code());
        parts.join(", ")
    }
}

#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub offer_id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewOrderInput {
    pub order_id: Uuid,
    pub reference: String,
    pub profile_id: Option<Uuid>,
    pub shipping: ShippingDetails,
    pub payment_method: PaymentMethod,
    pub total_amount: BigDecimal,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone)]
pub struct CustomerView {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub reference: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub total_amount: BigDecimal,
    pub shipping_address: String,
    pub payment_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub customer: Option<CustomerView>,
    pub items: Vec<OrderItemView>,
}

/// Result of a status update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Applied { from: OrderStatus, to: OrderStatus },
    Unchanged(OrderStatus),
    Rejected { current: OrderStatus, requested: OrderStatus },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Ayesha Khan".to_string(),
            email: "ayesha@example.com".to_string(),
            phone: "+92 300 1234567".to_string(),
            address: "House 12, Street 4".to_string(),
            city: "Lahore".to_string(),
            postal_code: Some("54000".to_string()),
        }
    }

    #[test]
    fn status_round_trips_through_labels() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Canceled,
            OrderStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_parse_accepts_british_spelling() {
        assert_eq!("Cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Canceled);
    }

    #[test]
    fn status_parse_rejects_unknown_label() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn pending_order_can_be_confirmed_failed_or_canceled() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Failed));
        assert!(OrderStatus::Pending.can_cancel());
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn shipped_order_cannot_be_canceled() {
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn terminal_statuses_allow_no_transition() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Canceled, OrderStatus::Failed] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(OrderStatus::Confirmed));
            assert!(!terminal.can_transition_to(OrderStatus::Pending));
        }
    }

    #[test]
    fn reference_embeds_date_and_id_prefix() {
        let id = Uuid::parse_str("1a2b3c4d-0000-4000-8000-000000000000").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(order_reference(id, at), "EZC-20261019-1A2B3C4D");
    }

    #[test]
    fn payment_method_uses_snake_case_labels() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"cash_on_delivery\""
        );
        assert_eq!("online".parse::<PaymentMethod>().unwrap(), PaymentMethod::Online);
    }

    #[test]
    fn valid_shipping_form_passes() {
        assert!(shipping().validate().is_ok());
    }

    #[test]
    fn oversized_shipping_fields_are_rejected() {
        let cases: [(&str, fn(&mut ShippingDetails)); 5] = [
            ("full_name", |s| s.full_name = "A".repeat(300)),
            ("email", |s| s.email = format!("{}@example.com", "a".repeat(300))),
            ("phone", |s| s.phone = format!("0300{}1234567", " - ".repeat(15))),
            ("city", |s| s.city = "L".repeat(200)),
            ("postal_code", |s| s.postal_code = Some("5".repeat(21))),
        ];
        for (field, oversize) in cases {
            let mut form = shipping();
            oversize(&mut form);
            match form.validate() {
                Err(DomainError::InvalidInput(msg)) => assert!(msg.starts_with(field), "{msg}"),
                other => panic!("{field}: expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn postal_code_is_trimmed_and_blank_is_dropped() {
        let mut form = shipping();
        form.postal_code = Some("  54000 ".to_string());
        assert_eq!(form.postal_code().as_deref(), Some("54000"));
        form.postal_code = Some("   ".to_string());
        assert_eq!(form.postal_code(), None);
    }

    #[test]
    fn shipping_form_requires_city() {
        let mut form = shipping();
        form.city = "   ".to_string();
        assert!(matches!(form.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn shipping_form_rejects_short_phone() {
        let mut form = shipping();
        form.phone = "12345".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn formatted_address_skips_blank_postal_code() {
        let mut form = shipping();
        form.postal_code = Some(" ".to_string());
        assert_eq!(form.formatted_address(), "House 12, Street 4, Lahore");
    }
}
