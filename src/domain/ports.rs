use uuid::Uuid;

use super::account::{CourseRegistration, CourseRegistrationForm, Profile, ProfileForm};
use super::cart::Cart;
use super::catalog::{Category, OfferFilter, OfferView, Page, PageRequest, Vendor};
use super::errors::DomainError;
use super::order::{NewOrderInput, OrderStatus, OrderView};

pub trait CatalogRepository: Send + Sync + 'static {
    fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
    fn list_vendors(&self, page: PageRequest) -> Result<Page<Vendor>, DomainError>;
    fn find_vendor_by_slug(&self, slug: &str) -> Result<Option<Vendor>, DomainError>;
    fn list_offers(&self, filter: &OfferFilter) -> Result<Page<OfferView>, DomainError>;
    fn find_offer(&self, id: Uuid) -> Result<Option<OfferView>, DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    /// The stored cart and its version.
    fn load_versioned(&self, id: Uuid) -> Result<Option<(Cart, i64)>, DomainError>;

    fn load(&self, id: Uuid) -> Result<Option<Cart>, DomainError> {
        Ok(self.load_versioned(id)?.map(|(cart, _)| cart))
    }

    /// Compare-and-set on the version read by `load_versioned`; `None`
    /// expects no stored cart yet. Returns `false` when another writer got
    /// there first.
    fn save(&self, id: Uuid, cart: &Cart, expected: Option<i64>) -> Result<bool, DomainError>;

    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Writes customer, order and items atomically.
    fn place(&self, order: NewOrderInput) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn find_by_reference(&self, reference: &str) -> Result<Option<OrderView>, DomainError>;
    fn list_for_profile(
        &self,
        profile_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<OrderView>, DomainError>;
    /// Compare-and-set on the current status. Returns `false` when the order
    /// was no longer in `expected`.
    fn update_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
        transaction_id: Option<&str>,
    ) -> Result<bool, DomainError>;
}

pub trait AccountRepository: Send + Sync + 'static {
    fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, DomainError>;
    fn upsert_profile(&self, id: Uuid, form: ProfileForm) -> Result<Profile, DomainError>;
    fn create_registration(
        &self,
        course_slug: &str,
        form: CourseRegistrationForm,
    ) -> Result<CourseRegistration, DomainError>;
}
