use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::catalog::{Catalog, CatalogListQuery, NewCatalog};
use crate::domain::product::{Product, ProductListQuery};
use crate::domain::profile::Profile;
use crate::forms::catalogs::SaveCatalogForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CatalogReader, CatalogWriter, ProductReader, ProfileReader, ProfileWriter,
};
use crate::services::main::ensure_profile;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the catalogs index page.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogsQuery {
    /// Optional name search entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the catalogs index template.
pub struct CatalogsPageData {
    /// Profile of the signed-in vendor.
    pub profile: Profile,
    /// Paginated list of catalogs displayed in the table.
    pub catalogs: Paginated<Catalog>,
    /// All products of the vendor, for the membership editor.
    pub products: Vec<Product>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
}

/// Loads the catalogs overview page.
pub fn load_catalogs_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CatalogsQuery,
) -> ServiceResult<CatalogsPageData>
where
    R: ProfileReader + ProfileWriter + ProductReader + CatalogReader + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = CatalogListQuery::new(profile.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, catalogs) = repo.list_catalogs(list_query).map_err(ServiceError::from)?;
    let (_, products) = repo
        .list_products(ProductListQuery::new(profile.id))
        .map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let catalogs = Paginated::new(catalogs, page, total_pages);

    Ok(CatalogsPageData {
        profile,
        catalogs,
        products,
        search: query.search,
    })
}

/// Creates or updates a catalog and replaces its membership set.
pub fn save_catalog<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveCatalogForm,
) -> ServiceResult<Catalog>
where
    R: ProfileReader + ProfileWriter + CatalogWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let payload = form
        .into_payload()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let catalog = match payload.catalog_id {
        Some(catalog_id) => repo
            .update_catalog(catalog_id, profile.id, &payload.update)
            .map_err(ServiceError::from)?,
        None => {
            let mut new_catalog = NewCatalog::new(profile.id, &payload.update.name);
            if payload.update.is_public {
                new_catalog = new_catalog.public();
            }
            repo.create_catalog(&new_catalog).map_err(ServiceError::from)?
        }
    };

    repo.replace_catalog_products(catalog.id, profile.id, &payload.product_ids)
        .map_err(ServiceError::from)?;

    Ok(catalog)
}

/// Deletes a catalog owned by the signed-in vendor.
pub fn remove_catalog<R>(
    repo: &R,
    user: &AuthenticatedUser,
    catalog_id: i32,
) -> ServiceResult<()>
where
    R: ProfileReader + ProfileWriter + CatalogWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    repo.delete_catalog(catalog_id, profile.id)
        .map_err(ServiceError::from)
}
