use serde::Deserialize;
use thiserror::Error;

use crate::domain::product::normalize_sku;

/// Result type returned by the automation API payload helpers.
pub type ApiFormResult<T> = Result<T, ApiFormError>;

/// Errors produced while normalizing automation API bodies.
#[derive(Debug, Error)]
pub enum ApiFormError {
    /// A required field is absent or empty.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// A field carries an unusable value.
    #[error("invalid value `{value}` for `{field}`")]
    InvalidField { field: &'static str, value: String },
}

/// Raw upsert body. Historical clients used several spellings for the same
/// logical fields; the fixed alias set below maps them onto one record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpsertProductRequest {
    #[serde(alias = "userEmail", alias = "email")]
    pub user_email: Option<String>,
    #[serde(alias = "productName", alias = "title")]
    pub name: Option<String>,
    #[serde(alias = "SKU")]
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    #[serde(alias = "isVisible")]
    pub visible: Option<bool>,
    #[serde(alias = "imageUrls", alias = "images")]
    pub image_urls: Option<Vec<String>>,
}

/// Normalized upsert request.
#[derive(Debug)]
pub struct UpsertPayload {
    /// Email identifying the owning vendor.
    pub user_email: String,
    /// Slug the upsert is keyed by, derived from the SKU or the name.
    pub slug: String,
    /// Product name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Selling price in cents.
    pub price_cents: i64,
    /// Acquisition cost in cents.
    pub cost_cents: Option<i64>,
    /// Stock level.
    pub stock: Option<i32>,
    /// Storefront visibility.
    pub visible: Option<bool>,
    /// Image URLs, cleaned of blanks.
    pub image_urls: Option<Vec<String>>,
}

impl UpsertProductRequest {
    /// Map the tolerated body onto a typed record or a validation error.
    pub fn into_payload(self) -> ApiFormResult<UpsertPayload> {
        let user_email = required_text(self.user_email, "userEmail")?;
        let name = required_text(self.name, "name")?;

        let price = self.price.ok_or(ApiFormError::MissingField("price"))?;
        let price_cents = money_to_cents(price, "price")?;

        let cost_cents = self
            .cost
            .map(|cost| money_to_cents(cost, "cost"))
            .transpose()?;

        if let Some(stock) = self.stock
            && stock < 0
        {
            return Err(ApiFormError::InvalidField {
                field: "stock",
                value: stock.to_string(),
            });
        }

        let slug_source = self
            .sku
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(name.as_str());
        let slug = normalize_sku(slug_source);
        if slug.is_empty() {
            return Err(ApiFormError::InvalidField {
                field: "sku",
                value: slug_source.to_string(),
            });
        }

        let description = self
            .description
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let image_urls = self.image_urls.map(|urls| {
            urls.into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect::<Vec<_>>()
        });

        Ok(UpsertPayload {
            user_email,
            slug,
            name,
            description,
            price_cents,
            cost_cents,
            stock: self.stock,
            visible: self.visible,
            image_urls,
        })
    }
}

/// Raw stock adjustment body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StockAdjustRequest {
    #[serde(alias = "userEmail", alias = "email")]
    pub user_email: Option<String>,
    #[serde(alias = "SKU")]
    pub sku: Option<String>,
    #[serde(alias = "productName", alias = "product_name")]
    pub name: Option<String>,
    pub delta: Option<i32>,
}

/// Normalized stock adjustment request.
#[derive(Debug)]
pub struct StockAdjustPayload {
    /// Email identifying the owning vendor.
    pub user_email: String,
    /// Lookup candidates in submission order.
    pub candidates: Vec<String>,
    /// Signed stock delta.
    pub delta: i32,
}

impl StockAdjustRequest {
    /// Map the tolerated body onto a typed record or a validation error.
    ///
    /// `path_sku` carries the SKU from the path-parameterized route variant
    /// and takes precedence as the first lookup candidate.
    pub fn into_payload(self, path_sku: Option<&str>) -> ApiFormResult<StockAdjustPayload> {
        let user_email = required_text(self.user_email, "userEmail")?;
        let delta = self.delta.ok_or(ApiFormError::MissingField("delta"))?;

        let candidates = collect_candidates(path_sku, self.sku.as_deref(), self.name.as_deref());
        if candidates.is_empty() {
            return Err(ApiFormError::MissingField("sku"));
        }

        Ok(StockAdjustPayload {
            user_email,
            candidates,
            delta,
        })
    }
}

/// Raw pause/visibility body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManageProductRequest {
    #[serde(alias = "userEmail", alias = "email")]
    pub user_email: Option<String>,
    #[serde(alias = "SKU")]
    pub sku: Option<String>,
    #[serde(alias = "productName", alias = "product_name")]
    pub name: Option<String>,
    #[serde(alias = "isVisible")]
    pub visible: Option<bool>,
    #[serde(alias = "pauseDurationMinutes", alias = "pause_minutes")]
    pub pause_duration_minutes: Option<i64>,
}

/// Normalized visibility/pause request.
#[derive(Debug)]
pub struct ManageProductPayload {
    /// Email identifying the owning vendor.
    pub user_email: String,
    /// Lookup candidates in submission order.
    pub candidates: Vec<String>,
    /// Target visibility.
    pub visible: bool,
    /// Pause duration in minutes when pausing with a timer.
    pub pause_duration_minutes: Option<i64>,
}

impl ManageProductRequest {
    /// Map the tolerated body onto a typed record or a validation error.
    ///
    /// A positive pause duration implies `visible=false`; without one the
    /// `visible` flag itself is required.
    pub fn into_payload(self) -> ApiFormResult<ManageProductPayload> {
        let user_email = required_text(self.user_email, "userEmail")?;

        let candidates = collect_candidates(None, self.sku.as_deref(), self.name.as_deref());
        if candidates.is_empty() {
            return Err(ApiFormError::MissingField("sku"));
        }

        if let Some(minutes) = self.pause_duration_minutes
            && minutes < 0
        {
            return Err(ApiFormError::InvalidField {
                field: "pause_duration_minutes",
                value: minutes.to_string(),
            });
        }

        let pausing = self.pause_duration_minutes.is_some_and(|minutes| minutes > 0);
        let visible = if pausing {
            false
        } else {
            self.visible.ok_or(ApiFormError::MissingField("visible"))?
        };

        Ok(ManageProductPayload {
            user_email,
            candidates,
            visible,
            pause_duration_minutes: self.pause_duration_minutes,
        })
    }
}

fn required_text(value: Option<String>, field: &'static str) -> ApiFormResult<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ApiFormError::MissingField(field))
}

fn money_to_cents(amount: f64, field: &'static str) -> ApiFormResult<i64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ApiFormError::InvalidField {
            field,
            value: amount.to_string(),
        });
    }

    Ok((amount * 100.0).round() as i64)
}

fn collect_candidates(
    path_sku: Option<&str>,
    sku: Option<&str>,
    name: Option<&str>,
) -> Vec<String> {
    let mut candidates = Vec::new();

    for value in [path_sku, sku, name].into_iter().flatten() {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !candidates.iter().any(|existing| existing == trimmed) {
            candidates.push(trimmed.to_string());
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upsert_accepts_field_aliases() {
        let request: UpsertProductRequest = serde_json::from_value(json!({
            "userEmail": "vendor@example.com",
            "productName": "Café Especial",
            "SKU": "CAFE 01",
            "price": 12.5,
            "imageUrls": ["https://img.example/a.jpg", " "],
        }))
        .expect("body to deserialize");

        let payload = request.into_payload().expect("payload to build");

        assert_eq!(payload.user_email, "vendor@example.com");
        assert_eq!(payload.slug, "cafe-01");
        assert_eq!(payload.price_cents, 1250);
        assert_eq!(
            payload.image_urls,
            Some(vec!["https://img.example/a.jpg".to_string()])
        );
    }

    #[test]
    fn upsert_slug_falls_back_to_name() {
        let request: UpsertProductRequest = serde_json::from_value(json!({
            "email": "vendor@example.com",
            "name": "Té Verde",
            "price": 3,
        }))
        .expect("body to deserialize");

        let payload = request.into_payload().expect("payload to build");

        assert_eq!(payload.slug, "te-verde");
    }

    #[test]
    fn upsert_requires_price() {
        let request: UpsertProductRequest = serde_json::from_value(json!({
            "userEmail": "vendor@example.com",
            "name": "Té Verde",
        }))
        .expect("body to deserialize");

        assert!(matches!(
            request.into_payload(),
            Err(ApiFormError::MissingField("price"))
        ));
    }

    #[test]
    fn stock_adjust_orders_candidates() {
        let request: StockAdjustRequest = serde_json::from_value(json!({
            "userEmail": "vendor@example.com",
            "SKU": "cafe-01",
            "productName": "Café Especial",
            "delta": -3,
        }))
        .expect("body to deserialize");

        let payload = request
            .into_payload(Some("cafe-01"))
            .expect("payload to build");

        assert_eq!(payload.candidates, vec!["cafe-01", "Café Especial"]);
        assert_eq!(payload.delta, -3);
    }

    #[test]
    fn manage_pause_duration_implies_hidden() {
        let request: ManageProductRequest = serde_json::from_value(json!({
            "userEmail": "vendor@example.com",
            "sku": "cafe-01",
            "pauseDurationMinutes": 30,
        }))
        .expect("body to deserialize");

        let payload = request.into_payload().expect("payload to build");

        assert!(!payload.visible);
        assert_eq!(payload.pause_duration_minutes, Some(30));
    }

    #[test]
    fn manage_requires_visible_without_duration() {
        let request: ManageProductRequest = serde_json::from_value(json!({
            "userEmail": "vendor@example.com",
            "sku": "cafe-01",
        }))
        .expect("body to deserialize");

        assert!(matches!(
            request.into_payload(),
            Err(ApiFormError::MissingField("visible"))
        ));
    }
}
