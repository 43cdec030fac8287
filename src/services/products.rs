use chrono::Local;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductListQuery, schedule_republish};
use crate::domain::profile::Profile;
use crate::forms::products::{
    AddProductForm, AdjustStockForm, EditProductForm, PauseProductForm,
};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductReader, ProductWriter, ProfileReader, ProfileWriter};
use crate::services::main::ensure_profile;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the products index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the products index template.
pub struct ProductsPageData {
    /// Profile of the signed-in vendor.
    pub profile: Profile,
    /// Paginated list of products displayed in the table.
    pub products: Paginated<Product>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
}

/// Loads the products overview page.
pub fn load_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProfileReader + ProfileWriter + ProductReader + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ProductListQuery::new(profile.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, products) = repo.list_products(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let products = Paginated::new(products, page, total_pages);

    Ok(ProductsPageData {
        profile,
        products,
        search: query.search,
    })
}

/// Creates a new product for the signed-in vendor.
///
/// Rejected with `Conflict` once the vendor holds `max_products` items.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: ProfileReader + ProfileWriter + ProductReader + ProductWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let (total, _) = repo
        .list_products(ProductListQuery::new(profile.id).paginate(1, 1))
        .map_err(ServiceError::from)?;

    if total >= profile.max_products as usize {
        return Err(ServiceError::Conflict(format!(
            "product limit of {} reached",
            profile.max_products
        )));
    }

    let new_product = form
        .into_new_product(profile.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&new_product).map_err(ServiceError::from)
}

/// Updates an existing product owned by the signed-in vendor.
pub fn modify_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: ProfileReader + ProfileWriter + ProductWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let payload = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_product(payload.product_id, profile.id, &payload.update)
        .map_err(ServiceError::from)
}

/// Deletes a product owned by the signed-in vendor.
pub fn remove_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProfileReader + ProfileWriter + ProductWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    repo.delete_product(product_id, profile.id)
        .map_err(ServiceError::from)
}

/// Applies a signed stock delta to a product.
pub fn change_stock<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AdjustStockForm,
) -> ServiceResult<Product>
where
    R: ProfileReader + ProfileWriter + ProductWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    repo.adjust_stock(form.product_id, profile.id, form.delta)
        .map_err(ServiceError::from)
}

/// Pauses or resumes a product, writing the advisory republish timestamp.
pub fn pause_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PauseProductForm,
) -> ServiceResult<Product>
where
    R: ProfileReader + ProfileWriter + ProductWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let republish_at = schedule_republish(
        form.visible,
        form.pause_duration_minutes,
        Local::now().naive_utc(),
    );

    repo.set_visibility(form.product_id, profile.id, form.visible, republish_at)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::product::{NewProduct, UpdateProduct};
    use crate::domain::profile::NewProfile;
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{
        MockProductReader, MockProductWriter, MockProfileReader, MockProfileWriter,
    };

    fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    fn sample_profile(id: i32, max_products: i32) -> Profile {
        Profile {
            id,
            sub: "auth0|1".to_string(),
            email: "vendor@example.com".to_string(),
            name: "Vendor".to_string(),
            phone: None,
            theme_background: "#ffffff".to_string(),
            theme_primary: "#1f2937".to_string(),
            theme_accent: "#f59e0b".to_string(),
            font_family: "Inter".to_string(),
            banner_url: None,
            avatar_url: None,
            max_products,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn sample_product(id: i32, profile_id: i32, name: &str) -> Product {
        Product {
            id,
            profile_id,
            name: name.to_string(),
            description: None,
            price_cents: 1000,
            cost_cents: 0,
            stock: 5,
            is_visible: true,
            republish_at: None,
            skus: vec![name.to_lowercase()],
            image_urls: Vec::new(),
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
        product_writer: MockProductWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                profile_reader: MockProfileReader::new(),
                profile_writer: MockProfileWriter::new(),
                product_reader: MockProductReader::new(),
                product_writer: MockProductWriter::new(),
            }
        }

        fn with_profile(max_products: i32) -> Self {
            let mut repo = Self::new();
            repo.profile_reader
                .expect_get_profile_by_sub()
                .returning(move |_| Ok(Some(sample_profile(3, max_products))));
            repo
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

    impl ProductWriter for FakeRepo {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
            self.product_writer.create_product(new_product)
        }

        fn update_product(
            &self,
            product_id: i32,
            profile_id: i32,
            updates: &UpdateProduct,
        ) -> RepositoryResult<Product> {
            self.product_writer
                .update_product(product_id, profile_id, updates)
        }

        fn delete_product(&self, product_id: i32, profile_id: i32) -> RepositoryResult<()> {
            self.product_writer.delete_product(product_id, profile_id)
        }

        fn adjust_stock(
            &self,
            product_id: i32,
            profile_id: i32,
            delta: i32,
        ) -> RepositoryResult<Product> {
            self.product_writer
                .adjust_stock(product_id, profile_id, delta)
        }

        fn set_visibility(
            &self,
            product_id: i32,
            profile_id: i32,
            is_visible: bool,
            republish_at: Option<NaiveDateTime>,
        ) -> RepositoryResult<Product> {
            self.product_writer
                .set_visibility(product_id, profile_id, is_visible, republish_at)
        }

        fn upsert_product(
            &self,
            profile_id: i32,
            slug: &str,
            new_product: &NewProduct,
            updates: &UpdateProduct,
        ) -> RepositoryResult<(Product, bool)> {
            self.product_writer
                .upsert_product(profile_id, slug, new_product, updates)
        }
    }

    fn add_form(name: &str) -> AddProductForm {
        AddProductForm {
            name: name.to_string(),
            price: "10".to_string(),
            cost: None,
            stock: None,
            description: None,
            skus: None,
            image_urls: None,
        }
    }

    #[test]
    fn create_product_persists_payload() {
        let mut repo = FakeRepo::with_profile(50);
        let user = sample_user();

        repo.product_reader
            .expect_list_products()
            .times(1)
            .returning(|_| Ok((2, Vec::new())));

        repo.product_writer
            .expect_create_product()
            .times(1)
            .withf(|new_product| {
                assert_eq!(new_product.profile_id, 3);
                assert_eq!(new_product.name, "Café");
                assert_eq!(new_product.price_cents, 1000);
                true
            })
            .returning(|new_product| Ok(sample_product(7, new_product.profile_id, "Café")));

        let created = create_product(&repo, &user, add_form("Café")).expect("expected success");

        assert_eq!(created.id, 7);
    }

    #[test]
    fn create_product_enforces_limit() {
        let mut repo = FakeRepo::with_profile(2);
        let user = sample_user();

        repo.product_reader
            .expect_list_products()
            .times(1)
            .returning(|_| Ok((2, Vec::new())));

        let result = create_product(&repo, &user, add_form("Café"));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn create_product_returns_form_error() {
        let mut repo = FakeRepo::with_profile(50);
        let user = sample_user();

        repo.product_reader
            .expect_list_products()
            .returning(|_| Ok((0, Vec::new())));

        let mut form = add_form("Té");
        form.price = "free".to_string();

        let result = create_product(&repo, &user, form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn change_stock_delegates_to_repository() {
        let mut repo = FakeRepo::with_profile(50);
        let user = sample_user();

        repo.product_writer
            .expect_adjust_stock()
            .times(1)
            .withf(|product_id, profile_id, delta| {
                assert_eq!(*product_id, 9);
                assert_eq!(*profile_id, 3);
                assert_eq!(*delta, -2);
                true
            })
            .returning(|product_id, profile_id, _| Ok(sample_product(product_id, profile_id, "x")));

        let form = AdjustStockForm {
            product_id: 9,
            delta: -2,
        };

        let result = change_stock(&repo, &user, form);

        assert!(result.is_ok());
    }

    #[test]
    fn change_stock_surfaces_conflict() {
        let mut repo = FakeRepo::with_profile(50);
        let user = sample_user();

        repo.product_writer.expect_adjust_stock().returning(|_, _, _| {
            Err(crate::repository::errors::RepositoryError::Conflict(
                "stock would fall below zero".to_string(),
            ))
        });

        let form = AdjustStockForm {
            product_id: 9,
            delta: -20,
        };

        let result = change_stock(&repo, &user, form);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn pause_product_writes_republish_timestamp() {
        let mut repo = FakeRepo::with_profile(50);
        let user = sample_user();

        repo.product_writer
            .expect_set_visibility()
            .times(1)
            .withf(|product_id, profile_id, is_visible, republish_at| {
                assert_eq!(*product_id, 4);
                assert_eq!(*profile_id, 3);
                assert!(!*is_visible);
                assert!(republish_at.is_some());
                true
            })
            .returning(|product_id, profile_id, _, _| {
                Ok(sample_product(product_id, profile_id, "x"))
            });

        let form = PauseProductForm {
            product_id: 4,
            visible: false,
            pause_duration_minutes: Some(30),
        };

        let result = pause_product(&repo, &user, form);

        assert!(result.is_ok());
    }

    #[test]
    fn resume_clears_republish_timestamp() {
        let mut repo = FakeRepo::with_profile(50);
        let user = sample_user();

        repo.product_writer
            .expect_set_visibility()
            .times(1)
            .withf(|_, _, is_visible, republish_at| {
                assert!(*is_visible);
                assert!(republish_at.is_none());
                true
            })
            .returning(|product_id, profile_id, _, _| {
                Ok(sample_product(product_id, profile_id, "x"))
            });

        let form = PauseProductForm {
            product_id: 4,
            visible: true,
            pause_duration_minutes: Some(30),
        };

        let result = pause_product(&repo, &user, form);

        assert!(result.is_ok());
    }
}
