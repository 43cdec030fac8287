use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::catalog::UpdateCatalog;
use crate::forms::sanitize_inline_text;

/// Maximum length allowed for a catalog name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the catalog form helpers.
pub type CatalogFormResult<T> = Result<T, CatalogFormError>;

/// Errors that can occur while processing catalog forms.
#[derive(Debug, Error)]
pub enum CatalogFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("catalog name cannot be empty")]
    EmptyName,
}

/// Normalized payload produced by the "Save catalog" form.
#[derive(Debug)]
pub struct SaveCatalogPayload {
    /// Identifier of the catalog; `None` creates a new one.
    pub catalog_id: Option<i32>,
    /// Header patch applied to the catalog.
    pub update: UpdateCatalog,
    /// Full replacement membership list, deduplicated in submit order.
    pub product_ids: Vec<i32>,
}

/// Form payload emitted when saving a catalog and its membership.
///
/// Parsed with `serde_html_form` because `product_ids` arrives as a
/// repeated urlencoded key.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveCatalogForm {
    /// Identifier of the catalog being edited, absent when creating.
    #[serde(default)]
    pub catalog_id: Option<i32>,
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Whether the catalog appears on the public storefront.
    #[serde(default)]
    pub is_public: bool,
    /// Identifiers of the member products selected by the user.
    #[serde(default)]
    pub product_ids: Vec<i32>,
}

impl SaveCatalogForm {
    /// Validates and sanitizes the payload into a save request.
    pub fn into_payload(self) -> CatalogFormResult<SaveCatalogPayload> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(CatalogFormError::EmptyName);
        }

        let mut seen = HashSet::new();
        let product_ids: Vec<i32> = self
            .product_ids
            .into_iter()
            .filter(|product_id| *product_id > 0 && seen.insert(*product_id))
            .collect();

        Ok(SaveCatalogPayload {
            catalog_id: self.catalog_id.filter(|id| *id > 0),
            update: UpdateCatalog::new(sanitized_name, self.is_public),
            product_ids,
        })
    }
}
