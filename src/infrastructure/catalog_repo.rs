use diesel::prelude::*;
use diesel::sql_types::{Nullable, Numeric};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{
    Category, OfferFilter, OfferSort, OfferView, Page, PageRequest, Vendor,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{categories, offers, vendors};

use super::models::{CategoryRow, OfferRow, VendorRow};

diesel::define_sql_function! {
    /// `COALESCE(offer_price, price)`: the price a buyer actually pays.
    fn coalesce(offer_price: Nullable<Numeric>, price: Numeric) -> Numeric;
}

/// Applies the offer filters to a boxed query over a source containing `offers`.
macro_rules! filter_offers {
    ($query:expr, $filter:expr) => {{
        let filter: &OfferFilter = $filter;
        let mut query = $query.filter(offers::is_active.eq(true));
        if let Some(category_id) = filter.category_id {
            query = query.filter(offers::category_id.eq(category_id));
        }
        if let Some(vendor_id) = filter.vendor_id {
            query = query.filter(offers::vendor_id.eq(vendor_id));
        }
        if let Some(pattern) = filter.search_pattern() {
            query = query.filter(offers::title.ilike(pattern));
        }
        if let Some(min) = filter.min_price.clone() {
            query = query.filter(coalesce(offers::offer_price, offers::price).ge(min));
        }
        if let Some(max) = filter.max_price.clone() {
            query = query.filter(coalesce(offers::offer_price, offers::price).le(max));
        }
        query
    }};
}

#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_vendor(row: VendorRow) -> Vendor {
    Vendor {
        id: row.id,
        name: row.name,
        slug: row.slug,
        description: row.description,
        logo_url: row.logo_url,
        city: row.city,
        created_at: row.created_at,
    }
}

fn to_offer_view((offer, vendor_name, category_name): (OfferRow, String, String)) -> OfferView {
    OfferView {
        id: offer.id,
        vendor_id: offer.vendor_id,
        vendor_name,
        category_id: offer.category_id,
        category_name,
        title: offer.title,
        description: offer.description,
        price: offer.price,
        offer_price: offer.offer_price,
        image_url: offer.image_url,
        is_active: offer.is_active,
        created_at: offer.created_at,
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = categories::table
            .select(CategoryRow::as_select())
            .order(categories::name.asc())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|c| Category {
                id: c.id,
                name: c.name,
                slug: c.slug,
                image_url: c.image_url,
            })
            .collect())
    }

    fn list_vendors(&self, page: PageRequest) -> Result<Page<Vendor>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = vendors::table.count().get_result(conn)?;

            let rows = vendors::table
                .select(VendorRow::as_select())
                .order(vendors::name.asc())
                .limit(page.limit)
                .offset(page.offset())
                .load(conn)?;

            Ok(Page {
                items: rows.into_iter().map(to_vendor).collect(),
                total,
                page: page.page,
                limit: page.limit,
            })
        })
    }

    fn find_vendor_by_slug(&self, slug: &str) -> Result<Option<Vendor>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = vendors::table
            .filter(vendors::slug.eq(slug))
            .select(VendorRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(to_vendor))
    }

    fn list_offers(&self, filter: &OfferFilter) -> Result<Page<OfferView>, DomainError> {
        let mut conn = self.pool.get()?;
        let page = filter.page;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filter_offers!(offers::table.into_boxed(), filter)
                .count()
                .get_result(conn)?;

            let mut query = filter_offers!(
                offers::table
                    .inner_join(vendors::table)
                    .inner_join(categories::table)
                    .select((OfferRow::as_select(), vendors::name, categories::name))
                    .into_boxed(),
                filter
            );
            query = match filter.sort {
                OfferSort::Newest => query.order((offers::created_at.desc(), offers::id.asc())),
                OfferSort::PriceAsc => query.order((
                    coalesce(offers::offer_price, offers::price).asc(),
                    offers::id.asc(),
                )),
                OfferSort::PriceDesc => query.order((
                    coalesce(offers::offer_price, offers::price).desc(),
                    offers::id.asc(),
                )),
            };

            let rows: Vec<(OfferRow, String, String)> = query
                .limit(page.limit)
                .offset(page.offset())
                .load(conn)?;

            Ok(Page {
                items: rows.into_iter().map(to_offer_view).collect(),
                total,
                page: page.page,
                limit: page.limit,
            })
        })
    }

    fn find_offer(&self, id: Uuid) -> Result<Option<OfferView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<(OfferRow, String, String)> = offers::table
            .inner_join(vendors::table)
            .inner_join(categories::table)
            .filter(offers::id.eq(id))
            .select((OfferRow::as_select(), vendors::name, categories::name))
            .first(&mut conn)
            .optional()?;

        Ok(row.map(to_offer_view))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::DieselCatalogRepository;
    use crate::domain::catalog::{OfferFilter, OfferSort, PageRequest};
    use crate::domain::ports::CatalogRepository;
    use crate::infrastructure::test_support::{
        insert_category, insert_offer, insert_vendor, setup_db,
    };

    #[tokio::test]
    async fn list_offers_filters_sorts_and_paginates() {
        let (_container, pool) = setup_db().await;
        let food = insert_category(&pool, "food");
        let spa = insert_category(&pool, "spa");
        let vendor = insert_vendor(&pool, "pizza-point");
        let other = insert_vendor(&pool, "glow-spa");

        insert_offer(&pool, vendor, food, "Large Pizza", "1800", Some("1200"));
        insert_offer(&pool, vendor, food, "Small Pizza", "900", None);
        insert_offer(&pool, vendor, food, "Pizza Platter", "3000", None);
        insert_offer(&pool, other, spa, "Facial", "2500", Some("1500"));

        let repo = DieselCatalogRepository::new(pool);

        let all = repo.list_offers(&OfferFilter::default()).expect("list failed");
        assert_eq!(all.total, 4);

        let pizzas = repo
            .list_offers(&OfferFilter {
                search: Some("pizza".to_string()),
                sort: OfferSort::PriceAsc,
                ..Default::default()
            })
            .expect("list failed");
        assert_eq!(pizzas.total, 3);
        let titles: Vec<_> = pizzas.items.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, ["Small Pizza", "Large Pizza", "Pizza Platter"]);
        assert_eq!(pizzas.items[0].vendor_name, "pizza-point store");
        assert_eq!(pizzas.items[0].category_name, "FOOD");

        let cheap = repo
            .list_offers(&OfferFilter {
                max_price: Some(BigDecimal::from_str("1500").unwrap()),
                ..Default::default()
            })
            .expect("list failed");
        assert_eq!(cheap.total, 3, "effective price drives the price filter");

        let spa_only = repo
            .list_offers(&OfferFilter {
                category_id: Some(spa),
                ..Default::default()
            })
            .expect("list failed");
        assert_eq!(spa_only.total, 1);

        let second_page = repo
            .list_offers(&OfferFilter {
                vendor_id: Some(vendor),
                sort: OfferSort::PriceDesc,
                page: PageRequest::new(Some(2), Some(2)),
                ..Default::default()
            })
            .expect("list failed");
        assert_eq!(second_page.total, 3);
        assert_eq!(second_page.items.len(), 1);
        assert_eq!(second_page.items[0].title, "Small Pizza");
    }

    #[tokio::test]
    async fn find_offer_and_vendor_lookups() {
        let (_container, pool) = setup_db().await;
        let food = insert_category(&pool, "food");
        let vendor = insert_vendor(&pool, "pizza-point");
        let offer = insert_offer(&pool, vendor, food, "Large Pizza", "1800", None);
        let repo = DieselCatalogRepository::new(pool);

        let found = repo.find_offer(offer).expect("find failed").expect("offer exists");
        assert_eq!(found.vendor_id, vendor);
        assert!(repo.find_offer(Uuid::new_v4()).expect("find failed").is_none());

        let storefront = repo
            .find_vendor_by_slug("pizza-point")
            .expect("find failed")
            .expect("vendor exists");
        assert_eq!(storefront.id, vendor);

        let vendors = repo.list_vendors(PageRequest::default()).expect("list failed");
        assert_eq!(vendors.total, 1);
        assert_eq!(repo.list_categories().expect("list failed").len(), 1);
    }
}
