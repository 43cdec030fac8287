use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::catalog::{
    Catalog as DomainCatalog, NewCatalog as DomainNewCatalog, UpdateCatalog as DomainUpdateCatalog,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::catalogs)]
pub struct Catalog {
    pub id: i32,
    pub profile_id: i32,
    pub name: String,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::catalogs)]
pub struct NewCatalog<'a> {
    pub profile_id: i32,
    pub name: &'a str,
    pub is_public: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::catalogs)]
pub struct UpdateCatalog<'a> {
    pub name: &'a str,
    pub is_public: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::catalog_products)]
#[diesel(belongs_to(Catalog))]
pub struct CatalogProduct {
    pub id: i32,
    pub catalog_id: i32,
    pub product_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::catalog_products)]
pub struct NewCatalogProduct {
    pub catalog_id: i32,
    pub product_id: i32,
}

impl From<Catalog> for DomainCatalog {
    fn from(value: Catalog) -> Self {
        Self {
            id: value.id,
            profile_id: value.profile_id,
            name: value.name,
            is_public: value.is_public,
            product_ids: Vec::new(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCatalog> for NewCatalog<'a> {
    fn from(value: &'a DomainNewCatalog) -> Self {
        Self {
            profile_id: value.profile_id,
            name: value.name.as_str(),
            is_public: value.is_public,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCatalog> for UpdateCatalog<'a> {
    fn from(value: &'a DomainUpdateCatalog) -> Self {
        Self {
            name: value.name.as_str(),
            is_public: value.is_public,
            updated_at: value.updated_at,
        }
    }
}
