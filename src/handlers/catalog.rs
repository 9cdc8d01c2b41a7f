use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{blocking, money};
use crate::domain::catalog::{
    Category, OfferFilter, OfferSort, OfferView, Page, PageRequest, Vendor,
};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OfferResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub category_id: Uuid,
    pub category_name: String,
    /// Decimal prices as strings, e.g. "1800.00"
    pub price: String,
    pub offer_price: Option<String>,
    pub effective_price: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OfferPageResponse {
    pub items: Vec<OfferResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorPageResponse {
    pub items: Vec<VendorResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StorefrontResponse {
    pub vendor: VendorResponse,
    pub offers: OfferPageResponse,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOffersParams {
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    /// Case-insensitive title search
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// `newest` (default), `price_asc` or `price_desc`
    pub sort: Option<String>,
    /// Page number (1-based). Defaults to 1.
    pub page: Option<i64>,
    /// Number of items per page. Defaults to 20, maximum 100.
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn parse_price(name: &str, value: Option<&str>) -> Result<Option<BigDecimal>, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            BigDecimal::from_str(v.trim())
                .map_err(|_| AppError::BadRequest(format!("{name} must be a decimal number")))
        })
        .transpose()
}

impl ListOffersParams {
    pub fn into_filter(self) -> Result<OfferFilter, AppError> {
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") | Some("newest") => OfferSort::Newest,
            Some("price_asc") => OfferSort::PriceAsc,
            Some("price_desc") => OfferSort::PriceDesc,
            Some(other) => return Err(AppError::BadRequest(format!("unknown sort '{other}'"))),
        };
        Ok(OfferFilter {
            category_id: self.category_id,
            vendor_id: self.vendor_id,
            min_price: parse_price("min_price", self.min_price.as_deref())?,
            max_price: parse_price("max_price", self.max_price.as_deref())?,
            search: self.search,
            sort,
            page: PageRequest::new(self.page, self.limit),
        })
    }
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            image_url: c.image_url,
        }
    }
}

impl From<Vendor> for VendorResponse {
    fn from(v: Vendor) -> Self {
        Self {
            id: v.id,
            name: v.name,
            slug: v.slug,
            description: v.description,
            logo_url: v.logo_url,
            city: v.city,
        }
    }
}

impl From<OfferView> for OfferResponse {
    fn from(o: OfferView) -> Self {
        Self {
            effective_price: money(o.effective_price()),
            id: o.id,
            title: o.title,
            description: o.description,
            vendor_id: o.vendor_id,
            vendor_name: o.vendor_name,
            category_id: o.category_id,
            category_name: o.category_name,
            price: money(&o.price),
            offer_price: o.offer_price.as_ref().map(money),
            image_url: o.image_url,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

impl From<Page<OfferView>> for OfferPageResponse {
    fn from(p: Page<OfferView>) -> Self {
        let p = p.map(OfferResponse::from);
        Self {
            items: p.items,
            total: p.total,
            page: p.page,
            limit: p.limit,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "All categories", body = [CategoryResponse]),
    ),
    tag = "catalog"
)]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = blocking(move || state.catalog.list_categories()).await?;
    let body: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /offers
///
/// Active offers with vendor and category names. Filters compose; price
/// bounds apply to the offer price when one is set.
#[utoipa::path(
    get,
    path = "/offers",
    params(ListOffersParams),
    responses(
        (status = 200, description = "Paginated offers", body = OfferPageResponse),
        (status = 400, description = "Malformed filter"),
    ),
    tag = "catalog"
)]
pub async fn list_offers(
    state: web::Data<AppState>,
    query: web::Query<ListOffersParams>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().into_filter()?;
    let page = blocking(move || state.catalog.list_offers(&filter)).await?;
    Ok(HttpResponse::Ok().json(OfferPageResponse::from(page)))
}

/// GET /offers/{id}
#[utoipa::path(
    get,
    path = "/offers/{id}",
    params(("id" = Uuid, Path, description = "Offer UUID")),
    responses(
        (status = 200, description = "Offer found", body = OfferResponse),
        (status = 404, description = "Offer not found"),
    ),
    tag = "catalog"
)]
pub async fn get_offer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let offer = blocking(move || state.catalog.get_offer(id)).await?;
    Ok(HttpResponse::Ok().json(OfferResponse::from(offer)))
}

/// GET /vendors
#[utoipa::path(
    get,
    path = "/vendors",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated vendors", body = VendorPageResponse),
    ),
    tag = "catalog"
)]
pub async fn list_vendors(
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::new(query.page, query.limit);
    let vendors = blocking(move || state.catalog.list_vendors(page)).await?;
    let vendors = vendors.map(VendorResponse::from);
    Ok(HttpResponse::Ok().json(VendorPageResponse {
        items: vendors.items,
        total: vendors.total,
        page: vendors.page,
        limit: vendors.limit,
    }))
}

/// GET /vendors/{slug}
///
/// Vendor storefront: the vendor plus a page of its offers. Accepts the same
/// query parameters as `GET /offers` except `vendor_id`.
#[utoipa::path(
    get,
    path = "/vendors/{slug}",
    params(("slug" = String, Path, description = "Vendor slug"), ListOffersParams),
    responses(
        (status = 200, description = "Storefront", body = StorefrontResponse),
        (status = 404, description = "Vendor not found"),
    ),
    tag = "catalog"
)]
pub async fn vendor_storefront(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListOffersParams>,
) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    let filter = query.into_inner().into_filter()?;
    let storefront = blocking(move || state.catalog.vendor_storefront(&slug, filter)).await?;
    Ok(HttpResponse::Ok().json(StorefrontResponse {
        vendor: storefront.vendor.into(),
        offers: storefront.offers.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_translate_into_filter() {
        let filter = ListOffersParams {
            min_price: Some("100".to_string()),
            max_price: Some(" ".to_string()),
            sort: Some("price_desc".to_string()),
            page: Some(0),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.min_price, Some(BigDecimal::from(100)));
        assert_eq!(filter.max_price, None);
        assert_eq!(filter.sort, OfferSort::PriceDesc);
        assert_eq!(filter.page.page, 1);
    }

    #[test]
    fn unknown_sort_is_bad_request() {
        let params = ListOffersParams {
            sort: Some("popular".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.into_filter(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn malformed_price_is_bad_request() {
        let params = ListOffersParams {
            min_price: Some("cheap".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.into_filter(), Err(AppError::BadRequest(_))));
    }
}
