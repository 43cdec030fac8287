use chrono::Local;
use serde::Serialize;

use crate::domain::product::{
    NewProduct, Product, ProductListQuery, UpdateProduct, schedule_republish,
};
use crate::domain::profile::Profile;
use crate::forms::api::{ManageProductPayload, StockAdjustPayload, UpsertPayload};
use crate::repository::{ProductReader, ProductWriter, ProfileReader};
use crate::services::{ServiceError, ServiceResult};

/// Products with `0 < stock <= this` show up in the stock alert.
pub const STOCK_ALERT_THRESHOLD: i32 = 10;

/// Inventory valuation returned by the sales report endpoint.
#[derive(Debug, Serialize)]
pub struct InventoryValuation {
    /// Number of products in the store.
    pub product_count: usize,
    /// Acquisition cost of everything in stock.
    pub total_cost_cents: i64,
    /// Revenue if everything in stock sold at the current price.
    pub potential_revenue_cents: i64,
    /// Potential revenue minus total cost.
    pub potential_profit_cents: i64,
}

fn profile_by_email<R>(repo: &R, email: &str) -> ServiceResult<Profile>
where
    R: ProfileReader + ?Sized,
{
    repo.get_profile_by_email(email)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Inserts or updates a product keyed by the derived SKU slug.
///
/// Returns the row and whether it was created.
pub fn upsert_product<R>(repo: &R, payload: UpsertPayload) -> ServiceResult<(Product, bool)>
where
    R: ProfileReader + ProductWriter + ?Sized,
{
    let profile = profile_by_email(repo, &payload.user_email)?;

    let mut new_product = NewProduct::new(profile.id, &payload.name, payload.price_cents)
        .with_skus(vec![payload.slug.clone()]);

    if let Some(description) = payload.description.as_deref() {
        new_product = new_product.with_description(description);
    }
    if let Some(cost_cents) = payload.cost_cents {
        new_product = new_product.with_cost_cents(cost_cents);
    }
    if let Some(stock) = payload.stock {
        new_product = new_product.with_stock(stock);
    }
    if let Some(visible) = payload.visible {
        new_product = new_product.with_visibility(visible);
    }
    if let Some(image_urls) = payload.image_urls.clone() {
        new_product = new_product.with_image_urls(image_urls);
    }

    let mut update = UpdateProduct::new()
        .name(&payload.name)
        .price_cents(payload.price_cents);

    if payload.description.is_some() {
        update = update.description(payload.description.as_deref());
    }
    if let Some(cost_cents) = payload.cost_cents {
        update = update.cost_cents(cost_cents);
    }
    if let Some(stock) = payload.stock {
        update = update.stock(stock);
    }
    if let Some(visible) = payload.visible {
        update = update.visibility(visible);
    }
    if let Some(image_urls) = payload.image_urls {
        update = update.image_urls(image_urls);
    }

    repo.upsert_product(profile.id, &payload.slug, &new_product, &update)
        .map_err(ServiceError::from)
}

/// Applies a signed stock delta to the product matching the candidates.
pub fn adjust_stock<R>(repo: &R, payload: StockAdjustPayload) -> ServiceResult<Product>
where
    R: ProfileReader + ProductReader + ProductWriter + ?Sized,
{
    let profile = profile_by_email(repo, &payload.user_email)?;

    let product = repo
        .resolve_product(profile.id, &payload.candidates)
        .map_err(ServiceError::from)?;

    repo.adjust_stock(product.id, profile.id, payload.delta)
        .map_err(ServiceError::from)
}

/// Changes visibility of the product matching the candidates, writing the
/// advisory republish timestamp for timed pauses.
pub fn manage_product<R>(repo: &R, payload: ManageProductPayload) -> ServiceResult<Product>
where
    R: ProfileReader + ProductReader + ProductWriter + ?Sized,
{
    let profile = profile_by_email(repo, &payload.user_email)?;

    let product = repo
        .resolve_product(profile.id, &payload.candidates)
        .map_err(ServiceError::from)?;

    let republish_at = schedule_republish(
        payload.visible,
        payload.pause_duration_minutes,
        Local::now().naive_utc(),
    );

    repo.set_visibility(product.id, profile.id, payload.visible, republish_at)
        .map_err(ServiceError::from)
}

/// Computes the inventory valuation for the vendor's whole store.
pub fn inventory_valuation<R>(repo: &R, user_email: &str) -> ServiceResult<InventoryValuation>
where
    R: ProfileReader + ProductReader + ?Sized,
{
    let profile = profile_by_email(repo, user_email)?;

    let (_, products) = repo
        .list_products(ProductListQuery::new(profile.id))
        .map_err(ServiceError::from)?;

    let mut total_cost_cents = 0i64;
    let mut potential_revenue_cents = 0i64;

    for product in &products {
        let stock = i64::from(product.stock);
        total_cost_cents += product.cost_cents * stock;
        potential_revenue_cents += product.price_cents * stock;
    }

    Ok(InventoryValuation {
        product_count: products.len(),
        total_cost_cents,
        potential_revenue_cents,
        potential_profit_cents: potential_revenue_cents - total_cost_cents,
    })
}

/// Lists products running low, lowest stock first.
pub fn stock_alert<R>(repo: &R, user_email: &str) -> ServiceResult<Vec<Product>>
where
    R: ProfileReader + ProductReader + ?Sized,
{
    let profile = profile_by_email(repo, user_email)?;

    let (_, products) = repo
        .list_products(ProductListQuery::new(profile.id).low_stock(STOCK_ALERT_THRESHOLD))
        .map_err(ServiceError::from)?;

    Ok(products)
}
