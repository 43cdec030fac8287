use std::collections::{HashMap, HashSet};

use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::catalog::{
    Catalog as DomainCatalog, CatalogListQuery, NewCatalog as DomainNewCatalog, PublicCatalog,
    UpdateCatalog as DomainUpdateCatalog,
};
use crate::models::catalog::{
    Catalog as DbCatalog, CatalogProduct as DbCatalogProduct, NewCatalog as DbNewCatalog,
    NewCatalogProduct, UpdateCatalog as DbUpdateCatalog,
};
use crate::models::product::Product as DbProduct;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::product::attach_aliases_batch;
use crate::repository::{CatalogReader, CatalogWriter, DieselRepository};

impl CatalogReader for DieselRepository {
    fn get_catalog_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<DomainCatalog>> {
        use crate::schema::catalogs;

        let mut conn = self.conn()?;

        let catalog = catalogs::table
            .filter(catalogs::id.eq(id))
            .filter(catalogs::profile_id.eq(profile_id))
            .first::<DbCatalog>(&mut conn)
            .optional()?;

        match catalog {
            Some(db_catalog) => {
                let mut memberships = load_product_ids_for_catalogs(&mut conn, &[db_catalog.id])?;
                let mut domain: DomainCatalog = db_catalog.into();
                domain.product_ids = memberships.remove(&domain.id).unwrap_or_default();
                Ok(Some(domain))
            }
            None => Ok(None),
        }
    }

    fn list_catalogs(&self, query: CatalogListQuery) -> RepositoryResult<(usize, Vec<DomainCatalog>)> {
        use crate::schema::catalogs;

        let mut conn = self.conn()?;

        let mut count_query = catalogs::table
            .filter(catalogs::profile_id.eq(query.profile_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(catalogs::name.like(pattern));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = catalogs::table
            .filter(catalogs::profile_id.eq(query.profile_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(catalogs::name.like(pattern));
        }

        items = items.order(catalogs::name.asc());

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_catalogs = items.load::<DbCatalog>(&mut conn)?;

        let catalog_ids: Vec<i32> = db_catalogs.iter().map(|catalog| catalog.id).collect();
        let mut memberships = load_product_ids_for_catalogs(&mut conn, &catalog_ids)?;

        let mut domain_catalogs = Vec::with_capacity(db_catalogs.len());
        for db_catalog in db_catalogs {
            let mut domain: DomainCatalog = db_catalog.into();
            domain.product_ids = memberships.remove(&domain.id).unwrap_or_default();
            domain_catalogs.push(domain);
        }

        Ok((total, domain_catalogs))
    }

    fn list_public_catalogs(&self, profile_id: i32) -> RepositoryResult<Vec<PublicCatalog>> {
        use crate::schema::{catalogs, products};

        let mut conn = self.conn()?;

        let db_catalogs = catalogs::table
            .filter(catalogs::profile_id.eq(profile_id))
            .filter(catalogs::is_public.eq(true))
            .order(catalogs::name.asc())
            .load::<DbCatalog>(&mut conn)?;

        if db_catalogs.is_empty() {
            return Ok(Vec::new());
        }

        let catalog_ids: Vec<i32> = db_catalogs.iter().map(|catalog| catalog.id).collect();
        let memberships = load_product_ids_for_catalogs(&mut conn, &catalog_ids)?;

        let mut member_ids: Vec<i32> = memberships.values().flatten().copied().collect();
        member_ids.sort_unstable();
        member_ids.dedup();

        let db_products = products::table
            .filter(products::id.eq_any(&member_ids))
            .filter(products::is_visible.eq(true))
            .load::<DbProduct>(&mut conn)?;

        let visible: HashMap<i32, _> = attach_aliases_batch(&mut conn, db_products)?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        // Join in memory and drop catalogs left with no qualifying products.
        let mut public_catalogs = Vec::with_capacity(db_catalogs.len());
        for db_catalog in db_catalogs {
            let products: Vec<_> = memberships
                .get(&db_catalog.id)
                .into_iter()
                .flatten()
                .filter_map(|product_id| visible.get(product_id).cloned())
                .collect();

            if products.is_empty() {
                continue;
            }

            public_catalogs.push(PublicCatalog {
                id: db_catalog.id,
                name: db_catalog.name,
                products,
            });
        }

        Ok(public_catalogs)
    }
}

impl CatalogWriter for DieselRepository {
    fn create_catalog(&self, new_catalog: &DomainNewCatalog) -> RepositoryResult<DomainCatalog> {
        use crate::schema::catalogs;

        let mut conn = self.conn()?;
        let insertable = DbNewCatalog::from(new_catalog);

        let created = diesel::insert_into(catalogs::table)
            .values(&insertable)
            .get_result::<DbCatalog>(&mut conn)?;

        Ok(created.into())
    }

    fn update_catalog(
        &self,
        catalog_id: i32,
        profile_id: i32,
        updates: &DomainUpdateCatalog,
    ) -> RepositoryResult<DomainCatalog> {
        use crate::schema::catalogs;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateCatalog::from(updates);

        let target = catalogs::table
            .filter(catalogs::id.eq(catalog_id))
            .filter(catalogs::profile_id.eq(profile_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbCatalog>(&mut conn)?;

        let mut memberships = load_product_ids_for_catalogs(&mut conn, &[updated.id])?;
        let mut domain: DomainCatalog = updated.into();
        domain.product_ids = memberships.remove(&domain.id).unwrap_or_default();

        Ok(domain)
    }

    fn replace_catalog_products(
        &self,
        catalog_id: i32,
        profile_id: i32,
        product_ids: &[i32],
    ) -> RepositoryResult<()> {
        use crate::schema::{catalog_products, catalogs, products};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let owned = select(exists(
                catalogs::table
                    .filter(catalogs::id.eq(catalog_id))
                    .filter(catalogs::profile_id.eq(profile_id)),
            ))
            .get_result::<bool>(conn)?;

            if !owned {
                return Err(RepositoryError::NotFound);
            }

            let mut seen = HashSet::new();
            let unique_ids: Vec<i32> = product_ids
                .iter()
                .copied()
                .filter(|product_id| seen.insert(*product_id))
                .collect();

            let owned_count = products::table
                .filter(products::id.eq_any(&unique_ids))
                .filter(products::profile_id.eq(profile_id))
                .count()
                .get_result::<i64>(conn)? as usize;

            if owned_count != unique_ids.len() {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                catalog_products::table.filter(catalog_products::catalog_id.eq(catalog_id)),
            )
            .execute(conn)?;

            let rows: Vec<NewCatalogProduct> = unique_ids
                .iter()
                .map(|product_id| NewCatalogProduct {
                    catalog_id,
                    product_id: *product_id,
                })
                .collect();

            diesel::insert_into(catalog_products::table)
                .values(&rows)
                .execute(conn)?;

            Ok(())
        })
    }

    fn delete_catalog(&self, catalog_id: i32, profile_id: i32) -> RepositoryResult<()> {
        use crate::schema::catalogs;

        let mut conn = self.conn()?;

        let target = catalogs::table
            .filter(catalogs::id.eq(catalog_id))
            .filter(catalogs::profile_id.eq(profile_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn load_product_ids_for_catalogs(
    conn: &mut SqliteConnection,
    catalog_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
    use crate::schema::catalog_products;

    if catalog_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = catalog_products::table
        .filter(catalog_products::catalog_id.eq_any(catalog_ids))
        .order(catalog_products::id.asc())
        .load::<DbCatalogProduct>(conn)?;

    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    for row in rows {
        map.entry(row.catalog_id).or_default().push(row.product_id);
    }

    Ok(map)
}
