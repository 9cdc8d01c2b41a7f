use uuid::Uuid;

use crate::domain::cart::{Cart, CartLineItem};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CartRepository, CatalogRepository};

/// Attempts before a contended cart update gives up.
const SAVE_ATTEMPTS: usize = 3;

pub struct CartService<C, K> {
    carts: C,
    catalog: K,
}

impl<C: CartRepository, K: CatalogRepository> CartService<C, K> {
    pub fn new(carts: C, catalog: K) -> Self {
        Self { carts, catalog }
    }

    /// Unknown cart ids read as an empty cart.
    pub fn get(&self, cart_id: Uuid) -> Result<Cart, DomainError> {
        Ok(self.carts.load(cart_id)?.unwrap_or_default())
    }

    /// Read, change and compare-and-set the cart, re-reading when another
    /// request saved in between.
    fn modify<F>(&self, cart_id: Uuid, mut change: F) -> Result<Cart, DomainError>
    where
        F: FnMut(&mut Cart) -> Result<(), DomainError>,
    {
        for _ in 0..SAVE_ATTEMPTS {
            let (mut cart, version) = match self.carts.load_versioned(cart_id)? {
                Some((cart, version)) => (cart, Some(version)),
                None => (Cart::default(), None),
            };
            change(&mut cart)?;
            if self.carts.save(cart_id, &cart, version)? {
                return Ok(cart);
            }
            log::debug!("Cart {} changed concurrently, retrying", cart_id);
        }
        Err(DomainError::Conflict(
            "cart is being updated by another request, try again".to_string(),
        ))
    }

    /// Adds an offer at its current catalog price.
    pub fn add_item(
        &self,
        cart_id: Uuid,
        offer_id: Uuid,
        quantity: i32,
    ) -> Result<Cart, DomainError> {
        let offer = self
            .catalog
            .find_offer(offer_id)?
            .filter(|o| o.is_active)
            .ok_or_else(|| DomainError::not_found("Offer"))?;

        let line = CartLineItem {
            product_id: offer.id,
            vendor_id: offer.vendor_id,
            vendor_name: offer.vendor_name,
            title: offer.title,
            price: offer.price,
            offer_price: offer.offer_price,
            quantity,
            image: offer.image_url,
        };
        self.modify(cart_id, |cart| cart.add_item(line.clone()))
    }

    pub fn update_quantity(
        &self,
        cart_id: Uuid,
        offer_id: Uuid,
        quantity: i32,
    ) -> Result<Cart, DomainError> {
        self.modify(cart_id, |cart| cart.set_quantity(offer_id, quantity))
    }

    pub fn remove_item(&self, cart_id: Uuid, offer_id: Uuid) -> Result<Cart, DomainError> {
        self.modify(cart_id, |cart| cart.remove_item(offer_id))
    }

    pub fn clear(&self, cart_id: Uuid) -> Result<(), DomainError> {
        self.carts.delete(cart_id)
    }
}
