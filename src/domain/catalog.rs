use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::pagination::Pagination;

/// Domain representation of a curated catalog belonging to a profile.
///
/// Membership is persisted as explicit join rows; the flattened
/// `product_ids` list exists only for editing and display.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Catalog {
    /// Unique identifier of the catalog.
    pub id: i32,
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Human-readable name of the catalog.
    pub name: String,
    /// Whether the catalog appears on the public storefront.
    pub is_public: bool,
    /// Identifiers of the member products.
    pub product_ids: Vec<i32>,
    /// Timestamp for when the catalog was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the catalog.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new catalog for a profile.
#[derive(Debug, Clone)]
pub struct NewCatalog {
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Human-readable name of the catalog.
    pub name: String,
    /// Whether the catalog appears on the public storefront.
    pub is_public: bool,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewCatalog {
    /// Build a new catalog payload with the supplied details.
    pub fn new(profile_id: i32, name: impl Into<String>) -> Self {
        Self {
            profile_id,
            name: name.into(),
            is_public: false,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Mark the catalog as publicly visible.
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }
}

/// Patch data applied when updating a catalog header.
#[derive(Debug, Clone)]
pub struct UpdateCatalog {
    /// Name submitted by the owner.
    pub name: String,
    /// Public visibility flag.
    pub is_public: bool,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateCatalog {
    pub fn new(name: impl Into<String>, is_public: bool) -> Self {
        Self {
            name: name.into(),
            is_public,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list catalogs for a profile.
#[derive(Debug, Clone)]
pub struct CatalogListQuery {
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Optional name search term.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl CatalogListQuery {
    /// Construct a query that targets all catalogs belonging to `profile_id`.
    pub fn new(profile_id: i32) -> Self {
        Self {
            profile_id,
            search: None,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the name.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// A public catalog together with its qualifying products, as rendered on
/// the storefront. Catalogs with no qualifying products are never built.
#[derive(Debug, Serialize, Clone)]
pub struct PublicCatalog {
    /// Identifier of the catalog.
    pub id: i32,
    /// Name shown as the section heading.
    pub name: String,
    /// Visible products linked to the catalog.
    pub products: Vec<Product>,
}
