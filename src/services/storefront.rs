use crate::domain::catalog::PublicCatalog;
use crate::domain::profile::Profile;
use crate::repository::{CatalogReader, ProfileReader};
use crate::services::{ServiceError, ServiceResult};

/// Data required to render the public storefront page.
pub struct StorefrontPageData {
    /// Profile of the vendor whose storefront was requested.
    pub profile: Profile,
    /// Public catalogs with their visible products; empty catalogs dropped.
    pub catalogs: Vec<PublicCatalog>,
}

/// Loads the public storefront for a vendor. The only unauthenticated and
/// cross-tenant read path in the application.
pub fn load_storefront<R>(repo: &R, profile_id: i32) -> ServiceResult<StorefrontPageData>
where
    R: ProfileReader + CatalogReader + ?Sized,
{
    let profile = repo
        .get_profile_by_id(profile_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let catalogs = repo
        .list_public_catalogs(profile.id)
        .map_err(ServiceError::from)?;

    Ok(StorefrontPageData { profile, catalogs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::catalog::{Catalog, CatalogListQuery};
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockCatalogReader, MockProfileReader};

    fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    fn sample_profile(id: i32) -> Profile {
        Profile {
            id,
            sub: "auth0|1".to_string(),
            email: "vendor@example.com".to_string(),
            name: "Tienda Rosa".to_string(),
            phone: Some("+54 11 5555-0000".to_string()),
            theme_background: "#ffffff".to_string(),
            theme_primary: "#1f2937".to_string(),
            theme_accent: "#f59e0b".to_string(),
            font_family: "Inter".to_string(),
            banner_url: None,
            avatar_url: None,
            max_products: 50,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    struct FakeRepo {
        profile_reader: MockProfileReader,
        catalog_reader: MockCatalogReader,
    }

    impl ProfileReader for FakeRepo {
        fn get_profile_by_id(&self, id: i32) -> RepositoryResult<Option<Profile>> {
            self.profile_reader.get_profile_by_id(id)
        }

        fn get_profile_by_sub(&self, sub: &str) -> RepositoryResult<Option<Profile>> {
            self.profile_reader.get_profile_by_sub(sub)
        }

        fn get_profile_by_email(&self, email: &str) -> RepositoryResult<Option<Profile>> {
            self.profile_reader.get_profile_by_email(email)
        }
    }

    impl CatalogReader for FakeRepo {
        fn get_catalog_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<Catalog>> {
            self.catalog_reader.get_catalog_by_id(id, profile_id)
        }

        fn list_catalogs(
            &self,
            query: CatalogListQuery,
        ) -> RepositoryResult<(usize, Vec<Catalog>)> {
            self.catalog_reader.list_catalogs(query)
        }

        fn list_public_catalogs(&self, profile_id: i32) -> RepositoryResult<Vec<PublicCatalog>> {
            self.catalog_reader.list_public_catalogs(profile_id)
        }
    }

    #[test]
    fn load_storefront_returns_catalogs() {
        let mut profile_reader = MockProfileReader::new();
        let mut catalog_reader = MockCatalogReader::new();

        profile_reader
            .expect_get_profile_by_id()
            .times(1)
            .returning(|id| Ok(Some(sample_profile(id))));

        catalog_reader
            .expect_list_public_catalogs()
            .times(1)
            .withf(|profile_id| {
                assert_eq!(*profile_id, 5);
                true
            })
            .returning(|_| {
                Ok(vec![PublicCatalog {
                    id: 1,
                    name: "Ofertas".to_string(),
                    products: Vec::new(),
                }])
            });

        let repo = FakeRepo {
            profile_reader,
            catalog_reader,
        };

        let data = load_storefront(&repo, 5).expect("expected success");

        assert_eq!(data.profile.id, 5);
        assert_eq!(data.catalogs.len(), 1);
    }

    #[test]
    fn load_storefront_unknown_vendor_is_not_found() {
        let mut profile_reader = MockProfileReader::new();
        let catalog_reader = MockCatalogReader::new();

        profile_reader
            .expect_get_profile_by_id()
            .returning(|_| Ok(None));

        let repo = FakeRepo {
            profile_reader,
            catalog_reader,
        };

        let result = load_storefront(&repo, 404);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
