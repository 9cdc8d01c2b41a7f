use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

pub const MAX_LINE_QUANTITY: i32 = 99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub title: String,
    pub price: BigDecimal,
    pub offer_price: Option<BigDecimal>,
    pub quantity: i32,
    pub image: Option<String>,
}

impl CartLineItem {
    pub fn unit_price(&self) -> &BigDecimal {
        self.offer_price.as_ref().unwrap_or(&self.price)
    }

    pub fn line_total(&self) -> BigDecimal {
        self.unit_price() * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCart {
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub items: Vec<CartLineItem>,
}

impl VendorCart {
    pub fn subtotal(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::zero(), |acc, item| acc + item.line_total())
    }
}

/// Line items grouped by vendor, in the order vendors were first added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub vendors: Vec<VendorCart>,
}

fn check_quantity(quantity: i32) -> Result<(), DomainError> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(DomainError::invalid(format!(
            "quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.vendors.iter().all(|v| v.items.is_empty())
    }

    /// Adds `item`, merging quantities when the product is already in the cart.
    pub fn add_item(&mut self, item: CartLineItem) -> Result<(), DomainError> {
        check_quantity(item.quantity)?;

        let group = match self.vendors.iter().position(|v| v.vendor_id == item.vendor_id) {
            Some(idx) => &mut self.vendors[idx],
            None => {
                self.vendors.push(VendorCart {
                    vendor_id: item.vendor_id,
                    vendor_name: item.vendor_name.clone(),
                    items: Vec::new(),
                });
                let last = self.vendors.len() - 1;
                &mut self.vendors[last]
            }
        };

        match group.items.iter_mut().find(|l| l.product_id == item.product_id) {
            Some(existing) => {
                let merged = existing.quantity + item.quantity;
                check_quantity(merged)?;
                existing.quantity = merged;
                existing.price = item.price;
                existing.offer_price = item.offer_price;
            }
            None => group.items.push(item),
        }
        Ok(())
    }

    /// Sets the quantity of a line; zero removes it.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) -> Result<(), DomainError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        check_quantity(quantity)?;
        let line = self
            .vendors
            .iter_mut()
            .flat_map(|v| v.items.iter_mut())
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| DomainError::not_found("Cart item"))?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: Uuid) -> Result<(), DomainError> {
        let mut removed = false;
        for group in &mut self.vendors {
            let before = group.items.len();
            group.items.retain(|l| l.product_id != product_id);
            removed |= group.items.len() != before;
        }
        self.vendors.retain(|v| !v.items.is_empty());
        if removed {
            Ok(())
        } else {
            Err(DomainError::not_found("Cart item"))
        }
    }

    pub fn clear(&mut self) {
        self.vendors.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLineItem> {
        self.vendors.iter().flat_map(|v| v.items.iter())
    }

    pub fn item_count(&self) -> i64 {
        self.lines().map(|l| i64::from(l.quantity)).sum()
    }

    pub fn total(&self) -> BigDecimal {
        self.vendors
            .iter()
            .fold(BigDecimal::zero(), |acc, v| acc + v.subtotal())
    }
}
