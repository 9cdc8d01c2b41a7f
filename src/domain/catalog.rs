use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An offer joined with the names of its vendor and category.
#[derive(Debug, Clone)]
pub struct OfferView {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub title: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub offer_price: Option<BigDecimal>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl OfferView {
    pub fn effective_price(&self) -> &BigDecimal {
        self.offer_price.as_ref().unwrap_or(&self.price)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone, Default)]
pub struct OfferFilter {
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub search: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub sort: OfferSort,
    pub page: PageRequest,
}

impl OfferFilter {
    /// `%term%` for a case-insensitive LIKE, with wildcards in the term escaped.
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref()?.trim();
        if term.is_empty() {
            return None;
        }
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }
}

const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Clamps to a 1-based page and a limit in `1..=MAX_PAGE_SIZE`.
    /// The page is capped so `offset()` always fits in an `i64`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Storefront {
    pub vendor: Vendor,
    pub offers: Page<OfferView>,
}
