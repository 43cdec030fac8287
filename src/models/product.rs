use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub profile_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub stock: i32,
    pub is_visible: bool,
    pub republish_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub profile_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub stock: i32,
    pub is_visible: bool,
    pub updated_at: NaiveDateTime,
}

/// Partial update; `None` fields are left untouched, the nested options on
/// `description` and `republish_at` clear the column.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub price_cents: Option<i64>,
    pub cost_cents: Option<i64>,
    pub stock: Option<i32>,
    pub is_visible: Option<bool>,
    pub republish_at: Option<Option<NaiveDateTime>>,
    pub updated_at: NaiveDateTime,
}

/// Visibility transition; `treat_none_as_null` so clearing the republish
/// timestamp actually writes NULL.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateVisibility {
    pub is_visible: bool,
    pub republish_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::product_skus)]
#[diesel(belongs_to(Product))]
pub struct ProductSku {
    pub id: i32,
    pub product_id: i32,
    pub sku: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_skus)]
pub struct NewProductSku<'a> {
    pub product_id: i32,
    pub sku: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::product_images)]
#[diesel(belongs_to(Product))]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub url: String,
    pub position: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage<'a> {
    pub product_id: i32,
    pub url: &'a str,
    pub position: i32,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            profile_id: value.profile_id,
            name: value.name,
            description: value.description,
            price_cents: value.price_cents,
            cost_cents: value.cost_cents,
            stock: value.stock,
            is_visible: value.is_visible,
            republish_at: value.republish_at,
            skus: Vec::new(),
            image_urls: Vec::new(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            profile_id: value.profile_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            price_cents: value.price_cents,
            cost_cents: value.cost_cents,
            stock: value.stock,
            is_visible: value.is_visible,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_deref(),
            description: value
                .description
                .as_ref()
                .map(|inner| inner.as_deref()),
            price_cents: value.price_cents,
            cost_cents: value.cost_cents,
            stock: value.stock,
            is_visible: value.is_visible,
            // A visibility write always drops any pending republish timer.
            republish_at: value.is_visible.map(|_| None),
            updated_at: value.updated_at,
        }
    }
}
