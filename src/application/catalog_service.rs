use uuid::Uuid;

use crate::domain::catalog::{
    Category, OfferFilter, OfferView, Page, PageRequest, Storefront, Vendor,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.repo.list_categories()
    }

    pub fn list_vendors(&self, page: PageRequest) -> Result<Page<Vendor>, DomainError> {
        self.repo.list_vendors(page)
    }

    pub fn list_offers(&self, filter: &OfferFilter) -> Result<Page<OfferView>, DomainError> {
        if let (Some(min), Some(max)) = (&filter.min_price, &filter.max_price) {
            if min > max {
                return Err(DomainError::invalid("min_price must not exceed max_price"));
            }
        }
        self.repo.list_offers(filter)
    }

    pub fn get_offer(&self, id: Uuid) -> Result<OfferView, DomainError> {
        self.repo
            .find_offer(id)?
            .ok_or_else(|| DomainError::not_found("Offer"))
    }

    /// A vendor together with a page of its active offers.
    pub fn vendor_storefront(
        &self,
        slug: &str,
        filter: OfferFilter,
    ) -> Result<Storefront, DomainError> {
        let vendor = self
            .repo
            .find_vendor_by_slug(slug)?
            .ok_or_else(|| DomainError::not_found("Vendor"))?;
        let offers = self.list_offers(&OfferFilter {
            vendor_id: Some(vendor.id),
            ..filter
        })?;
        Ok(Storefront { vendor, offers })
    }
}
