use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Image shown for products created without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "/assets/img/product-placeholder.svg";

/// Domain representation of a product owned by a vendor profile.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown on the storefront.
    pub description: Option<String>,
    /// Selling price in the smallest currency unit.
    pub price_cents: i64,
    /// Acquisition cost in the smallest currency unit.
    pub cost_cents: i64,
    /// Units in stock; never negative.
    pub stock: i32,
    /// Whether the product appears on the public storefront.
    pub is_visible: bool,
    /// Advisory timestamp for when a paused product should return.
    ///
    /// Written by the pause flow; acting on it is the job of an external
    /// scheduler, never of this application.
    pub republish_at: Option<NaiveDateTime>,
    /// SKU aliases the product can be matched by in external lookups.
    pub skus: Vec<String>,
    /// Image URLs in display order.
    pub image_urls: Vec<String>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product for a profile.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown on the storefront.
    pub description: Option<String>,
    /// Selling price in the smallest currency unit.
    pub price_cents: i64,
    /// Acquisition cost in the smallest currency unit.
    pub cost_cents: i64,
    /// Initial stock level.
    pub stock: i32,
    /// Whether the product starts out visible.
    pub is_visible: bool,
    /// SKU aliases; defaults to the slug derived from the name.
    pub skus: Vec<String>,
    /// Image URLs; defaults to the placeholder image.
    pub image_urls: Vec<String>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and defaults.
    pub fn new(profile_id: i32, name: impl Into<String>, price_cents: i64) -> Self {
        let name = name.into();
        let slug = normalize_sku(&name);
        Self {
            profile_id,
            name,
            description: None,
            price_cents,
            cost_cents: 0,
            stock: 0,
            is_visible: true,
            skus: vec![slug],
            image_urls: vec![PLACEHOLDER_IMAGE_URL.to_string()],
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the acquisition cost.
    pub fn with_cost_cents(mut self, cost_cents: i64) -> Self {
        self.cost_cents = cost_cents;
        self
    }

    /// Set the initial stock level.
    pub fn with_stock(mut self, stock: i32) -> Self {
        self.stock = stock;
        self
    }

    /// Set the initial visibility.
    pub fn with_visibility(mut self, is_visible: bool) -> Self {
        self.is_visible = is_visible;
        self
    }

    /// Replace the SKU alias list.
    pub fn with_skus(mut self, skus: Vec<String>) -> Self {
        if !skus.is_empty() {
            self.skus = skus;
        }
        self
    }

    /// Replace the image URL list.
    pub fn with_image_urls(mut self, image_urls: Vec<String>) -> Self {
        if !image_urls.is_empty() {
            self.image_urls = image_urls;
        }
        self
    }
}

/// Patch data applied when updating an existing product.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    /// Optional name update.
    pub name: Option<String>,
    /// Optional description update, `None` inside clears the value.
    pub description: Option<Option<String>>,
    /// Optional price update.
    pub price_cents: Option<i64>,
    /// Optional cost update.
    pub cost_cents: Option<i64>,
    /// Optional stock replacement. Relative adjustments go through
    /// the dedicated stock-adjustment path instead.
    pub stock: Option<i32>,
    /// Optional visibility change. Writing one clears the republish
    /// timestamp; timed pauses go through the dedicated visibility path.
    pub is_visible: Option<bool>,
    /// Optional replacement of the SKU alias list.
    pub skus: Option<Vec<String>>,
    /// Optional replacement of the image URL list.
    pub image_urls: Option<Vec<String>>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            price_cents: None,
            cost_cents: None,
            stock: None,
            is_visible: None,
            skus: None,
            image_urls: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Update the product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the description, using `None` to clear an existing value.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    /// Update the selling price.
    pub fn price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    /// Update the acquisition cost.
    pub fn cost_cents(mut self, cost_cents: i64) -> Self {
        self.cost_cents = Some(cost_cents);
        self
    }

    /// Replace the stock level.
    pub fn stock(mut self, stock: i32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Change the storefront visibility.
    pub fn visibility(mut self, is_visible: bool) -> Self {
        self.is_visible = Some(is_visible);
        self
    }

    /// Replace the SKU alias list.
    pub fn skus(mut self, skus: Vec<String>) -> Self {
        self.skus = Some(skus);
        self
    }

    /// Replace the image URL list.
    pub fn image_urls(mut self, image_urls: Vec<String>) -> Self {
        self.image_urls = Some(image_urls);
        self
    }
}

/// Query definition used to list products for a profile.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Restrict the results to visible products.
    pub visible_only: bool,
    /// Restrict to `0 < stock <= n`, ordered by stock ascending.
    pub low_stock: Option<i32>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets all products belonging to `profile_id`.
    pub fn new(profile_id: i32) -> Self {
        Self {
            profile_id,
            search: None,
            visible_only: false,
            low_stock: None,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Only return products visible on the storefront.
    pub fn visible_only(mut self) -> Self {
        self.visible_only = true;
        self
    }

    /// Only return products with `0 < stock <= threshold`, lowest first.
    pub fn low_stock(mut self, threshold: i32) -> Self {
        self.low_stock = Some(threshold);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Normalize a SKU or product name into the canonical lookup slug.
///
/// Lowercases, folds common Latin accents, and collapses every run of
/// non-alphanumeric characters into a single hyphen.
pub fn normalize_sku(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.chars().flat_map(|ch| ch.to_lowercase()) {
        let folded = fold_accent(ch);
        if folded.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(folded);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Compute the republish timestamp for a visibility change.
///
/// Visible products never carry a timestamp; paused products carry one only
/// when a positive duration was requested.
pub fn schedule_republish(
    is_visible: bool,
    pause_minutes: Option<i64>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    if is_visible {
        return None;
    }

    match pause_minutes {
        Some(minutes) if minutes > 0 => Some(now + Duration::minutes(minutes)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn normalize_sku_collapses_and_folds() {
        assert_eq!(normalize_sku("Café con Leche"), "cafe-con-leche");
        assert_eq!(normalize_sku("  SKU--42!! "), "sku-42");
        assert_eq!(normalize_sku("Ñandú"), "nandu");
        assert_eq!(normalize_sku("***"), "");
    }

    #[test]
    fn schedule_republish_state_machine() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .unwrap_or_default();

        assert_eq!(schedule_republish(true, Some(30), now), None);
        assert_eq!(schedule_republish(false, None, now), None);
        assert_eq!(schedule_republish(false, Some(0), now), None);
        assert_eq!(
            schedule_republish(false, Some(30), now),
            Some(now + Duration::minutes(30))
        );
    }

    #[test]
    fn new_product_defaults() {
        let payload = NewProduct::new(7, "Té Verde", 1500);

        assert_eq!(payload.skus, vec!["te-verde".to_string()]);
        assert_eq!(payload.image_urls, vec![PLACEHOLDER_IMAGE_URL.to_string()]);
        assert_eq!(payload.stock, 0);
        assert!(payload.is_visible);
    }
}
