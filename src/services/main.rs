use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductListQuery};
use crate::domain::profile::{NewProfile, Profile};
use crate::forms::profile::SettingsForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductReader, ProfileReader, ProfileWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
}

/// Data required to render the dashboard template.
pub struct IndexPageData {
    /// Profile of the signed-in vendor.
    pub profile: Profile,
    /// Paginated list of products to show in the table.
    pub products: Paginated<Product>,
    /// Search query echoed back to the template when present.
    pub search: Option<String>,
}

/// Resolves the vendor profile for the signed-in user, creating it on the
/// first authenticated visit.
pub fn ensure_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Profile>
where
    R: ProfileReader + ProfileWriter + ?Sized,
{
    if let Some(profile) = repo.get_profile_by_sub(&user.sub).map_err(ServiceError::from)? {
        return Ok(profile);
    }

    let new_profile = NewProfile::new(&user.sub, &user.email, &user.name);
    log::info!("creating profile for first visit of {}", user.email);
    repo.create_profile(&new_profile).map_err(ServiceError::from)
}

/// Loads the product overview for the dashboard page.
pub fn load_index_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IndexQuery,
) -> ServiceResult<IndexPageData>
where
    R: ProfileReader + ProfileWriter + ProductReader + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ProductListQuery::new(profile.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(value) = query.search.as_ref() {
        list_query = list_query.search(value);
    }

    let (total, products) = repo.list_products(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let products = Paginated::new(products, page, total_pages);

    Ok(IndexPageData {
        profile,
        products,
        search: query.search,
    })
}

/// Loads the profile for the settings page.
pub fn load_settings_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Profile>
where
    R: ProfileReader + ProfileWriter + ?Sized,
{
    ensure_profile(repo, user)
}

/// Applies the settings form to the vendor profile.
pub fn save_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SettingsForm,
) -> ServiceResult<Profile>
where
    R: ProfileReader + ProfileWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let update = form
        .into_update_profile()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_profile(profile.id, &update)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockProductReader, MockProfileReader, MockProfileWriter};
    use crate::repository::{ProductReader, ProfileReader, ProfileWriter};

    fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    fn sample_profile(id: i32, sub: &str) -> Profile {
        Profile {
            id,
            sub: sub.to_string(),
            email: "vendor@example.com".to_string(),
            name: "Vendor".to_string(),
            phone: None,
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

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "auth0|1".to_string(),
            email: "vendor@example.com".to_string(),
            name: "Vendor".to_string(),
            exp: 0,
        }
    }

    struct FakeRepo {
        profile_reader: MockProfileReader,
        profile_writer: MockProfileWriter,
        product_reader: MockProductReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                profile_reader: MockProfileReader::new(),
                profile_writer: MockProfileWriter::new(),
                product_reader: MockProductReader::new(),
            }
        }
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

    impl ProfileWriter for FakeRepo {
        fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile> {
            self.profile_writer.create_profile(new_profile)
        }

        fn update_profile(
            &self,
            profile_id: i32,
            updates: &crate::domain::profile::UpdateProfile,
        ) -> RepositoryResult<Profile> {
            self.profile_writer.update_profile(profile_id, updates)
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(id, profile_id)
        }

        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)> {
            self.product_reader.list_products(query)
        }

        fn resolve_product(
            &self,
            profile_id: i32,
            candidates: &[String],
        ) -> RepositoryResult<Product> {
            self.product_reader.resolve_product(profile_id, candidates)
        }
    }

    #[test]
    fn ensure_profile_returns_existing() {
        let mut repo = FakeRepo::new();
        let user = sample_user();

        repo.profile_reader
            .expect_get_profile_by_sub()
            .times(1)
            .returning(|sub| Ok(Some(sample_profile(9, sub))));

        let profile = ensure_profile(&repo, &user).expect("expected success");

        assert_eq!(profile.id, 9);
        assert_eq!(profile.sub, "auth0|1");
    }

    #[test]
    fn ensure_profile_creates_on_first_visit() {
        let mut repo = FakeRepo::new();
        let user = sample_user();

        repo.profile_reader
            .expect_get_profile_by_sub()
            .times(1)
            .returning(|_| Ok(None));

        repo.profile_writer
            .expect_create_profile()
            .times(1)
            .withf(|new_profile| {
                assert_eq!(new_profile.sub, "auth0|1");
                assert_eq!(new_profile.email, "vendor@example.com");
                true
            })
            .returning(|new_profile| Ok(sample_profile(1, &new_profile.sub)));

        let profile = ensure_profile(&repo, &user).expect("expected success");

        assert_eq!(profile.id, 1);
    }

    #[test]
    fn load_index_page_returns_paginated_data() {
        let mut repo = FakeRepo::new();
        let user = sample_user();
        let query = IndexQuery {
            search: Some("caf".to_string()),
            page: Some(2),
        };

        repo.profile_reader
            .expect_get_profile_by_sub()
            .returning(|sub| Ok(Some(sample_profile(3, sub))));

        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|query| {
                assert_eq!(query.profile_id, 3);
                assert_eq!(query.search.as_deref(), Some("caf"));
                match &query.pagination {
                    Some(pagination) => {
                        assert_eq!(pagination.page, 2);
                        assert_eq!(pagination.per_page, DEFAULT_ITEMS_PER_PAGE);
                    }
                    None => panic!("expected pagination to be set"),
                }
                true
            })
            .returning(|_| Ok((30, Vec::new())));

        let data = load_index_page(&repo, &user, query).expect("expected success");

        assert_eq!(data.profile.id, 3);
        assert_eq!(data.products.page, 2);
        assert_eq!(data.products.total_pages, 2);
        assert_eq!(data.search.as_deref(), Some("caf"));
    }

    #[test]
    fn save_settings_updates_profile() {
        let mut repo = FakeRepo::new();
        let user = sample_user();

        repo.profile_reader
            .expect_get_profile_by_sub()
            .returning(|sub| Ok(Some(sample_profile(3, sub))));

        repo.profile_writer
            .expect_update_profile()
            .times(1)
            .withf(|profile_id, updates| {
                assert_eq!(*profile_id, 3);
                assert_eq!(updates.name, "Tienda Rosa");
                assert_eq!(updates.theme_accent, "#f59e0b");
                true
            })
            .returning(|profile_id, _| Ok(sample_profile(profile_id, "auth0|1")));

        let form = SettingsForm {
            name: " Tienda Rosa ".to_string(),
            phone: None,
            theme_background: "#ffffff".to_string(),
            theme_primary: "#1f2937".to_string(),
            theme_accent: "#f59e0b".to_string(),
            font_family: "Inter".to_string(),
            banner_url: None,
            avatar_url: None,
        };

        let result = save_settings(&repo, &user, form);

        assert!(result.is_ok());
    }
}
