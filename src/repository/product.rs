use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDateTime};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
    UpdateProduct as DomainUpdateProduct, normalize_sku,
};
use crate::models::product::{
    NewProduct as DbNewProduct, NewProductImage, NewProductSku, Product as DbProduct,
    ProductImage as DbProductImage, ProductSku as DbProductSku, UpdateProduct as DbUpdateProduct,
    UpdateVisibility,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .filter(products::profile_id.eq(profile_id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        match product {
            Some(db_product) => Ok(Some(attach_aliases(&mut conn, db_product)?)),
            None => Ok(None),
        }
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut count_query = products::table
            .filter(products::profile_id.eq(query.profile_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if query.visible_only {
            count_query = count_query.filter(products::is_visible.eq(true));
        }

        if let Some(threshold) = query.low_stock {
            count_query = count_query
                .filter(products::stock.gt(0))
                .filter(products::stock.le(threshold));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = products::table
            .filter(products::profile_id.eq(query.profile_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if query.visible_only {
            items = items.filter(products::is_visible.eq(true));
        }

        if let Some(threshold) = query.low_stock {
            items = items
                .filter(products::stock.gt(0))
                .filter(products::stock.le(threshold));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        items = if query.low_stock.is_some() {
            items.order(products::stock.asc())
        } else {
            items.order(products::created_at.desc())
        };

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        attach_aliases_batch(&mut conn, db_products).map(|products| (total, products))
    }

    fn resolve_product(&self, profile_id: i32, candidates: &[String]) -> RepositoryResult<DomainProduct> {
        use crate::schema::{product_skus, products};

        let mut conn = self.conn()?;

        let mut slugs: Vec<String> = candidates
            .iter()
            .map(|candidate| normalize_sku(candidate))
            .filter(|slug| !slug.is_empty())
            .collect();
        slugs.sort();
        slugs.dedup();

        let mut matched: Vec<i32> = product_skus::table
            .inner_join(products::table)
            .filter(products::profile_id.eq(profile_id))
            .filter(product_skus::sku.eq_any(&slugs))
            .select(products::id)
            .distinct()
            .load::<i32>(&mut conn)?;

        if matched.is_empty() {
            // Fallback: exact case-insensitive name match.
            let named: Vec<(i32, String)> = products::table
                .filter(products::profile_id.eq(profile_id))
                .select((products::id, products::name))
                .load::<(i32, String)>(&mut conn)?;

            let lowered: HashSet<String> = candidates
                .iter()
                .map(|candidate| candidate.trim().to_lowercase())
                .filter(|candidate| !candidate.is_empty())
                .collect();

            matched = named
                .into_iter()
                .filter(|(_, name)| lowered.contains(&name.trim().to_lowercase()))
                .map(|(id, _)| id)
                .collect();
        }

        match matched.as_slice() {
            [] => Err(RepositoryError::NotFound),
            [id] => {
                let product = products::table
                    .filter(products::id.eq(*id))
                    .first::<DbProduct>(&mut conn)?;
                attach_aliases(&mut conn, product)
            }
            _ => Err(RepositoryError::Conflict(format!(
                "{} products match the supplied identifiers",
                matched.len()
            ))),
        }
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let db_new = DbNewProduct::from(new_product);

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            replace_skus(conn, created.id, &new_product.skus)?;
            replace_images(conn, created.id, &new_product.image_urls)?;

            attach_aliases(conn, created)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        profile_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let db_updates = DbUpdateProduct::from(updates);

            let target = products::table
                .filter(products::id.eq(product_id))
                .filter(products::profile_id.eq(profile_id));

            let updated = diesel::update(target)
                .set(&db_updates)
                .get_result::<DbProduct>(conn)?;

            if let Some(skus) = updates.skus.as_ref() {
                replace_skus(conn, updated.id, skus)?;
            }

            if let Some(image_urls) = updates.image_urls.as_ref() {
                replace_images(conn, updated.id, image_urls)?;
            }

            attach_aliases(conn, updated)
        })
    }

    fn delete_product(&self, product_id: i32, profile_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let target = products::table
            .filter(products::id.eq(product_id))
            .filter(products::profile_id.eq(profile_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn adjust_stock(
        &self,
        product_id: i32,
        profile_id: i32,
        delta: i32,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let current: i32 = products::table
                .filter(products::id.eq(product_id))
                .filter(products::profile_id.eq(profile_id))
                .select(products::stock)
                .first(conn)?;

            let next = current + delta;
            if next < 0 {
                return Err(RepositoryError::Conflict(format!(
                    "stock adjustment of {delta} would leave product {product_id} at {next}"
                )));
            }

            let target = products::table
                .filter(products::id.eq(product_id))
                .filter(products::profile_id.eq(profile_id));

            let updated = diesel::update(target)
                .set((
                    products::stock.eq(next),
                    products::updated_at.eq(Local::now().naive_utc()),
                ))
                .get_result::<DbProduct>(conn)?;

            attach_aliases(conn, updated)
        })
    }

    fn set_visibility(
        &self,
        product_id: i32,
        profile_id: i32,
        is_visible: bool,
        republish_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        // Invariant: a visible product never carries a republish timestamp.
        let republish_at = if is_visible { None } else { republish_at };

        let changes = UpdateVisibility {
            is_visible,
            republish_at,
            updated_at: Local::now().naive_utc(),
        };

        let target = products::table
            .filter(products::id.eq(product_id))
            .filter(products::profile_id.eq(profile_id));

        let updated = diesel::update(target)
            .set(&changes)
            .get_result::<DbProduct>(&mut conn)?;

        attach_aliases(&mut conn, updated)
    }

    fn upsert_product(
        &self,
        profile_id: i32,
        slug: &str,
        new_product: &DomainNewProduct,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<(DomainProduct, bool)> {
        use crate::schema::{product_skus, products};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let matched: Vec<i32> = product_skus::table
                .inner_join(products::table)
                .filter(products::profile_id.eq(profile_id))
                .filter(product_skus::sku.eq(slug))
                .select(products::id)
                .distinct()
                .load::<i32>(conn)?;

            match matched.as_slice() {
                [] => {
                    let db_new = DbNewProduct::from(new_product);
                    let created = diesel::insert_into(products::table)
                        .values(&db_new)
                        .get_result::<DbProduct>(conn)?;

                    replace_skus(conn, created.id, &new_product.skus)?;
                    replace_images(conn, created.id, &new_product.image_urls)?;

                    attach_aliases(conn, created).map(|product| (product, true))
                }
                [id] => {
                    let db_updates = DbUpdateProduct::from(updates);

                    let updated = diesel::update(products::table.filter(products::id.eq(*id)))
                        .set(&db_updates)
                        .get_result::<DbProduct>(conn)?;

                    if let Some(image_urls) = updates.image_urls.as_ref() {
                        replace_images(conn, updated.id, image_urls)?;
                    }

                    attach_aliases(conn, updated).map(|product| (product, false))
                }
                _ => Err(RepositoryError::Conflict(format!(
                    "slug `{slug}` matches {} products",
                    matched.len()
                ))),
            }
        })
    }
}

fn replace_skus(
    conn: &mut SqliteConnection,
    product_id: i32,
    skus: &[String],
) -> RepositoryResult<()> {
    use crate::schema::product_skus;

    diesel::delete(product_skus::table.filter(product_skus::product_id.eq(product_id)))
        .execute(conn)?;

    let mut seen = HashSet::new();
    let normalized: Vec<String> = skus
        .iter()
        .map(|sku| normalize_sku(sku))
        .filter(|slug| !slug.is_empty() && seen.insert(slug.clone()))
        .collect();

    let rows: Vec<NewProductSku<'_>> = normalized
        .iter()
        .map(|slug| NewProductSku {
            product_id,
            sku: slug.as_str(),
        })
        .collect();

    diesel::insert_into(product_skus::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

fn replace_images(
    conn: &mut SqliteConnection,
    product_id: i32,
    image_urls: &[String],
) -> RepositoryResult<()> {
    use crate::schema::product_images;

    diesel::delete(product_images::table.filter(product_images::product_id.eq(product_id)))
        .execute(conn)?;

    let rows: Vec<NewProductImage<'_>> = image_urls
        .iter()
        .enumerate()
        .map(|(position, url)| NewProductImage {
            product_id,
            url: url.as_str(),
            position: position as i32,
        })
        .collect();

    diesel::insert_into(product_images::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

fn attach_aliases(
    conn: &mut SqliteConnection,
    db_product: DbProduct,
) -> RepositoryResult<DomainProduct> {
    let mut products = attach_aliases_batch(conn, vec![db_product])?;
    products.pop().ok_or(RepositoryError::NotFound)
}

/// Batch-load SKU aliases and image URLs for the given rows and attach them
/// to the resulting domain products.
pub(crate) fn attach_aliases_batch(
    conn: &mut SqliteConnection,
    db_products: Vec<DbProduct>,
) -> RepositoryResult<Vec<DomainProduct>> {
    use crate::schema::{product_images, product_skus};

    if db_products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();

    let sku_rows = product_skus::table
        .filter(product_skus::product_id.eq_any(&product_ids))
        .order(product_skus::id.asc())
        .load::<DbProductSku>(conn)?;

    let mut sku_map: HashMap<i32, Vec<String>> = HashMap::new();
    for row in sku_rows {
        sku_map.entry(row.product_id).or_default().push(row.sku);
    }

    let image_rows = product_images::table
        .filter(product_images::product_id.eq_any(&product_ids))
        .order((product_images::position.asc(), product_images::id.asc()))
        .load::<DbProductImage>(conn)?;

    let mut image_map: HashMap<i32, Vec<String>> = HashMap::new();
    for row in image_rows {
        image_map.entry(row.product_id).or_default().push(row.url);
    }

    let mut domain_products = Vec::with_capacity(db_products.len());
    for db_product in db_products {
        let mut domain: DomainProduct = db_product.into();
        domain.skus = sku_map.remove(&domain.id).unwrap_or_default();
        domain.image_urls = image_map.remove(&domain.id).unwrap_or_default();
        domain_products.push(domain);
    }

    Ok(domain_products)
}
