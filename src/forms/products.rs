use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{parse_money_cents, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// A money field could not be parsed.
    #[error("invalid amount `{value}` for {field}")]
    InvalidAmount { field: &'static str, value: String },
    /// A stock value below zero was submitted.
    #[error("stock cannot be negative")]
    NegativeStock,
}

/// Form payload emitted when submitting the "Add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Selling price as a decimal string.
    pub price: String,
    /// Optional acquisition cost as a decimal string.
    #[serde(default)]
    pub cost: Option<String>,
    /// Optional initial stock level.
    #[serde(default)]
    pub stock: Option<i32>,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional comma-separated SKU aliases.
    #[serde(default)]
    pub skus: Option<String>,
    /// Optional newline-separated image URLs.
    #[serde(default)]
    pub image_urls: Option<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self, profile_id: i32) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents =
            parse_money_cents(&self.price).ok_or_else(|| ProductFormError::InvalidAmount {
                field: "price",
                value: self.price.clone(),
            })?;

        let cost_cents = match self.cost.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => parse_money_cents(raw).ok_or_else(|| ProductFormError::InvalidAmount {
                field: "cost",
                value: raw.to_string(),
            })?,
            None => 0,
        };

        let stock = self.stock.unwrap_or(0);
        if stock < 0 {
            return Err(ProductFormError::NegativeStock);
        }

        let mut new_product = NewProduct::new(profile_id, sanitized_name, price_cents)
            .with_cost_cents(cost_cents)
            .with_stock(stock);

        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            new_product = new_product.with_description(description);
        }

        if let Some(skus) = self.skus.as_deref().map(split_skus).filter(|v| !v.is_empty()) {
            new_product = new_product.with_skus(skus);
        }

        if let Some(images) = self
            .image_urls
            .as_deref()
            .map(split_image_urls)
            .filter(|v| !v.is_empty())
        {
            new_product = new_product.with_image_urls(images);
        }

        Ok(new_product)
    }
}

/// Normalized payload produced by the "Edit product" form.
#[derive(Debug)]
pub struct EditProductPayload {
    /// Identifier of the product to update.
    pub product_id: i32,
    /// Patch data that should be applied to the product.
    pub update: UpdateProduct,
}

/// Form payload emitted when editing an existing product.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    /// Identifier of the product to update.
    #[validate(range(min = 1))]
    pub product_id: i32,
    /// Name submitted by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Selling price as a decimal string.
    pub price: String,
    /// Optional acquisition cost as a decimal string.
    #[serde(default)]
    pub cost: Option<String>,
    /// Optional description update.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional comma-separated SKU aliases.
    #[serde(default)]
    pub skus: Option<String>,
    /// Optional newline-separated image URLs.
    #[serde(default)]
    pub image_urls: Option<String>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into an update patch.
    pub fn into_update_product(self) -> ProductFormResult<EditProductPayload> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents =
            parse_money_cents(&self.price).ok_or_else(|| ProductFormError::InvalidAmount {
                field: "price",
                value: self.price.clone(),
            })?;

        let mut update = UpdateProduct::new()
            .name(sanitized_name)
            .price_cents(price_cents);

        if let Some(raw) = self.cost.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let cost_cents =
                parse_money_cents(raw).ok_or_else(|| ProductFormError::InvalidAmount {
                    field: "cost",
                    value: raw.to_string(),
                })?;
            update = update.cost_cents(cost_cents);
        }

        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());
        update = update.description(description);

        if let Some(skus) = self.skus.as_deref().map(split_skus) {
            if !skus.is_empty() {
                update = update.skus(skus);
            }
        }

        if let Some(images) = self.image_urls.as_deref().map(split_image_urls) {
            if !images.is_empty() {
                update = update.image_urls(images);
            }
        }

        Ok(EditProductPayload {
            product_id: self.product_id,
            update,
        })
    }
}

/// Form payload emitted when adjusting stock from the products page.
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockForm {
    /// Identifier of the product to adjust.
    #[validate(range(min = 1))]
    pub product_id: i32,
    /// Signed stock delta.
    pub delta: i32,
}

/// Form payload emitted when pausing or resuming a product.
#[derive(Debug, Deserialize, Validate)]
pub struct PauseProductForm {
    /// Identifier of the product.
    #[validate(range(min = 1))]
    pub product_id: i32,
    /// Whether the product should be visible.
    pub visible: bool,
    /// Optional pause duration in minutes.
    #[serde(default)]
    pub pause_duration_minutes: Option<i64>,
}

fn split_skus(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
        .collect()
}

fn split_image_urls(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}
