use serde::{Deserialize, Serialize};

use crate::ai::{GenerationClient, GenerationError, strip_code_fence};
use crate::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductListQuery};
use crate::repository::{ProductReader, ProfileReader, ProfileWriter};
use crate::services::main::ensure_profile;
use crate::services::{ServiceError, ServiceResult};

/// Message shown instead of calling the model when the vendor has no products.
pub const EMPTY_STORE_ANALYSIS: &str =
    "У вас пока нет товаров, поэтому анализ недоступен. Добавьте товары и попробуйте снова.";

/// Structured pricing suggestion produced by the model.
#[derive(Debug, Deserialize, Serialize)]
pub struct PricingSuggestion {
    /// Suggested selling price in currency units.
    pub suggested_price: f64,
    /// Short explanation of the suggestion.
    pub rationale: String,
}

impl PricingSuggestion {
    /// Suggested price converted to the smallest currency unit.
    pub fn suggested_price_cents(&self) -> i64 {
        (self.suggested_price * 100.0).round() as i64
    }
}

#[derive(Serialize)]
struct ProductFacts<'a> {
    name: &'a str,
    description: Option<&'a str>,
    price_cents: i64,
    cost_cents: i64,
    stock: i32,
}

impl<'a> ProductFacts<'a> {
    fn from_product(product: &'a Product) -> Self {
        Self {
            name: &product.name,
            description: product.description.as_deref(),
            price_cents: product.price_cents,
            cost_cents: product.cost_cents,
            stock: product.stock,
        }
    }
}

/// Asks the model for a pricing suggestion for one product.
pub async fn suggest_pricing<R>(
    repo: &R,
    client: &GenerationClient,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<(Product, PricingSuggestion)>
where
    R: ProfileReader + ProfileWriter + ProductReader + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let product = repo
        .get_product_by_id(product_id, profile.id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let facts = serde_json::to_string(&ProductFacts::from_product(&product))
        .map_err(|err| ServiceError::Upstream(err.to_string()))?;

    let system = "You are a pricing analyst for a small online store. \
        Answer with a single JSON object: \
        {\"suggested_price\": <number, currency units>, \"rationale\": <short string>}. \
        No markdown, no extra keys.";
    let prompt = format!("Suggest a selling price for this product: {facts}");

    let raw = client
        .complete(system, &prompt)
        .await
        .map_err(map_generation_error)?;

    let suggestion = parse_pricing_suggestion(&raw)?;

    Ok((product, suggestion))
}

/// Asks the model for a sales/inventory analysis over the whole store.
///
/// Skips the external call entirely when the vendor has no products.
pub async fn analyze_sales<R>(
    repo: &R,
    client: &GenerationClient,
    user: &AuthenticatedUser,
) -> ServiceResult<String>
where
    R: ProfileReader + ProfileWriter + ProductReader + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let (_, products) = repo
        .list_products(ProductListQuery::new(profile.id))
        .map_err(ServiceError::from)?;

    if products.is_empty() {
        return Ok(EMPTY_STORE_ANALYSIS.to_string());
    }

    let facts: Vec<ProductFacts> = products.iter().map(ProductFacts::from_product).collect();
    let facts = serde_json::to_string(&facts)
        .map_err(|err| ServiceError::Upstream(err.to_string()))?;

    let system = "You are an inventory analyst for a small online store. \
        Write a concise analysis in Markdown: stock risks, margin observations, \
        and concrete recommendations.";
    let prompt = format!("Analyze this product list: {facts}");

    client
        .complete(system, &prompt)
        .await
        .map_err(map_generation_error)
}

/// Asks the model to author a free-form report from the vendor's criteria.
pub async fn author_report<R>(
    repo: &R,
    client: &GenerationClient,
    user: &AuthenticatedUser,
    criteria: &str,
) -> ServiceResult<String>
where
    R: ProfileReader + ProfileWriter + ProductReader + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let (_, products) = repo
        .list_products(ProductListQuery::new(profile.id))
        .map_err(ServiceError::from)?;

    let facts: Vec<ProductFacts> = products.iter().map(ProductFacts::from_product).collect();
    let facts = serde_json::to_string(&facts)
        .map_err(|err| ServiceError::Upstream(err.to_string()))?;

    let system = "You write business reports for a small online store. \
        Answer in Markdown with a title and short sections.";
    let prompt = format!("Report criteria: {criteria}\n\nStore products: {facts}");

    client
        .complete(system, &prompt)
        .await
        .map_err(map_generation_error)
}

fn map_generation_error(err: GenerationError) -> ServiceError {
    ServiceError::Upstream(err.to_string())
}

fn parse_pricing_suggestion(raw: &str) -> ServiceResult<PricingSuggestion> {
    let suggestion: PricingSuggestion = serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| ServiceError::Upstream(format!("unparseable suggestion: {err}")))?;

    if !suggestion.suggested_price.is_finite() || suggestion.suggested_price <= 0.0 {
        return Err(ServiceError::Upstream(format!(
            "implausible suggested price {}",
            suggestion.suggested_price
        )));
    }

    Ok(suggestion)
}
