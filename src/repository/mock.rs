use chrono::NaiveDateTime;
use mockall::mock;

use super::{
    CatalogReader, CatalogWriter, ProductReader, ProductWriter, ProfileReader, ProfileWriter,
    ReportReader, ReportWriter,
};
use crate::domain::{
    catalog::{Catalog, CatalogListQuery, NewCatalog, PublicCatalog, UpdateCatalog},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    profile::{NewProfile, Profile, UpdateProfile},
    report::{NewReport, Report, ReportListQuery},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub ProfileReader {}

    impl ProfileReader for ProfileReader {
        fn get_profile_by_id(&self, id: i32) -> RepositoryResult<Option<Profile>>;
        fn get_profile_by_sub(&self, sub: &str) -> RepositoryResult<Option<Profile>>;
        fn get_profile_by_email(&self, email: &str) -> RepositoryResult<Option<Profile>>;
    }
}

mock! {
    pub ProfileWriter {}

    impl ProfileWriter for ProfileWriter {
        fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile>;
        fn update_profile(&self, profile_id: i32, updates: &UpdateProfile) -> RepositoryResult<Profile>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn resolve_product(&self, profile_id: i32, candidates: &[String]) -> RepositoryResult<Product>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, profile_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32, profile_id: i32) -> RepositoryResult<()>;
        fn adjust_stock(&self, product_id: i32, profile_id: i32, delta: i32) -> RepositoryResult<Product>;
        fn set_visibility(&self, product_id: i32, profile_id: i32, is_visible: bool, republish_at: Option<NaiveDateTime>) -> RepositoryResult<Product>;
        fn upsert_product(&self, profile_id: i32, slug: &str, new_product: &NewProduct, updates: &UpdateProduct) -> RepositoryResult<(Product, bool)>;
    }
}

mock! {
    pub CatalogReader {}

    impl CatalogReader for CatalogReader {
        fn get_catalog_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<Catalog>>;
        fn list_catalogs(&self, query: CatalogListQuery) -> RepositoryResult<(usize, Vec<Catalog>)>;
        fn list_public_catalogs(&self, profile_id: i32) -> RepositoryResult<Vec<PublicCatalog>>;
    }
}

mock! {
    pub CatalogWriter {}

    impl CatalogWriter for CatalogWriter {
        fn create_catalog(&self, new_catalog: &NewCatalog) -> RepositoryResult<Catalog>;
        fn update_catalog(&self, catalog_id: i32, profile_id: i32, updates: &UpdateCatalog) -> RepositoryResult<Catalog>;
        fn replace_catalog_products(&self, catalog_id: i32, profile_id: i32, product_ids: &[i32]) -> RepositoryResult<()>;
        fn delete_catalog(&self, catalog_id: i32, profile_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ReportReader {}

    impl ReportReader for ReportReader {
        fn get_report_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<Report>>;
        fn list_reports(&self, query: ReportListQuery) -> RepositoryResult<(usize, Vec<Report>)>;
    }
}

mock! {
    pub ReportWriter {}

    impl ReportWriter for ReportWriter {
        fn create_report(&self, new_report: &NewReport) -> RepositoryResult<Report>;
        fn delete_report(&self, report_id: i32, profile_id: i32) -> RepositoryResult<()>;
    }
}
