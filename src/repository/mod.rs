use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::catalog::{
    Catalog, CatalogListQuery, NewCatalog, PublicCatalog, UpdateCatalog,
};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::profile::{NewProfile, Profile, UpdateProfile};
use crate::domain::report::{NewReport, Report, ReportListQuery};
use crate::repository::errors::RepositoryResult;

pub mod errors;

pub mod catalog;
pub mod product;
pub mod profile;
pub mod report;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over vendor profiles.
pub trait ProfileReader {
    fn get_profile_by_id(&self, id: i32) -> RepositoryResult<Option<Profile>>;
    fn get_profile_by_sub(&self, sub: &str) -> RepositoryResult<Option<Profile>>;
    fn get_profile_by_email(&self, email: &str) -> RepositoryResult<Option<Profile>>;
}

/// Write operations over vendor profiles.
pub trait ProfileWriter {
    fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile>;
    fn update_profile(&self, profile_id: i32, updates: &UpdateProfile)
    -> RepositoryResult<Profile>;
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Resolve one product from SKU/name candidates.
    ///
    /// Candidates are slugified and matched against the stored alias set;
    /// when no alias matches, an exact case-insensitive name match is tried.
    /// Zero matches yield `NotFound`, more than one distinct product yields
    /// `Conflict`.
    fn resolve_product(&self, profile_id: i32, candidates: &[String]) -> RepositoryResult<Product>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        profile_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32, profile_id: i32) -> RepositoryResult<()>;
    /// Apply a signed stock delta inside a transaction.
    ///
    /// Fails with `Conflict` and leaves the row untouched when the result
    /// would be negative.
    fn adjust_stock(
        &self,
        product_id: i32,
        profile_id: i32,
        delta: i32,
    ) -> RepositoryResult<Product>;
    /// Write a visibility transition. Visible products always get a cleared
    /// republish timestamp, whatever the caller passed.
    fn set_visibility(
        &self,
        product_id: i32,
        profile_id: i32,
        is_visible: bool,
        republish_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Product>;
    /// Insert or update keyed by the derived SKU slug.
    ///
    /// Returns the row and whether it was created. An ambiguous slug
    /// (several products sharing the alias) yields `Conflict`.
    fn upsert_product(
        &self,
        profile_id: i32,
        slug: &str,
        new_product: &NewProduct,
        updates: &UpdateProduct,
    ) -> RepositoryResult<(Product, bool)>;
}

/// Read-only operations over catalog records.
pub trait CatalogReader {
    fn get_catalog_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<Catalog>>;
    fn list_catalogs(&self, query: CatalogListQuery) -> RepositoryResult<(usize, Vec<Catalog>)>;
    /// The public storefront read path: public catalogs of the vendor with
    /// their visible products joined in memory; empty catalogs are dropped.
    fn list_public_catalogs(&self, profile_id: i32) -> RepositoryResult<Vec<PublicCatalog>>;
}

/// Write operations over catalog records.
pub trait CatalogWriter {
    fn create_catalog(&self, new_catalog: &NewCatalog) -> RepositoryResult<Catalog>;
    fn update_catalog(
        &self,
        catalog_id: i32,
        profile_id: i32,
        updates: &UpdateCatalog,
    ) -> RepositoryResult<Catalog>;
    /// Replace the whole membership set (delete-all, insert list) in one
    /// transaction. Product ids not owned by the profile are rejected.
    fn replace_catalog_products(
        &self,
        catalog_id: i32,
        profile_id: i32,
        product_ids: &[i32],
    ) -> RepositoryResult<()>;
    fn delete_catalog(&self, catalog_id: i32, profile_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over stored reports.
pub trait ReportReader {
    fn get_report_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<Report>>;
    fn list_reports(&self, query: ReportListQuery) -> RepositoryResult<(usize, Vec<Report>)>;
}

/// Write operations over stored reports.
pub trait ReportWriter {
    fn create_report(&self, new_report: &NewReport) -> RepositoryResult<Report>;
    fn delete_report(&self, report_id: i32, profile_id: i32) -> RepositoryResult<()>;
}
