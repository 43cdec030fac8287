use std::future::{Ready, ready};

use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, Responder, dev::Payload, get,
    patch, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::config::ServerConfig;
use crate::forms::api::{ManageProductRequest, StockAdjustRequest, UpsertProductRequest};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, api};

/// Marker extracted when the request carries the expected bearer token.
///
/// Every automation handler takes it, so the token is revalidated on each
/// call; there is no session state on this surface.
pub struct ApiToken;

impl FromRequest for ApiToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let authorized = req
            .app_data::<web::Data<ServerConfig>>()
            .zip(bearer_token(req))
            .is_some_and(|(config, token)| {
                !config.api_token.is_empty() && token == config.api_token
            });

        if authorized {
            ready(Ok(ApiToken))
        } else {
            ready(Err(ErrorUnauthorized("invalid api token")))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Debug switch accepted by every automation endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DebugQuery {
    #[serde(default)]
    pub debug: Option<u8>,
}

impl DebugQuery {
    fn verbose(&self) -> bool {
        self.debug == Some(1)
    }
}

fn error_response(err: ServiceError, verbose: bool) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({"error": "not found"})),
        ServiceError::Conflict(message) => {
            HttpResponse::Conflict().json(json!({"error": message}))
        }
        ServiceError::Form(message) => HttpResponse::BadRequest().json(json!({"error": message})),
        other => {
            log::error!("API request failed: {other}");
            let detail = if verbose {
                other.to_string()
            } else {
                "internal error".to_string()
            };
            HttpResponse::InternalServerError().json(json!({"error": detail}))
        }
    }
}

/// Health probe.
#[get("/products")]
pub async fn health(_token: ApiToken) -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

#[post("/products")]
pub async fn upsert_product(
    _token: ApiToken,
    repo: web::Data<DieselRepository>,
    query: web::Query<DebugQuery>,
    body: web::Json<UpsertProductRequest>,
) -> impl Responder {
    let payload = match body.into_inner().into_payload() {
        Ok(payload) => payload,
        Err(err) => {
            return HttpResponse::BadRequest().json(json!({"error": err.to_string()}));
        }
    };

    match api::upsert_product(repo.get_ref(), payload) {
        Ok((product, true)) => HttpResponse::Created().json(product),
        Ok((product, false)) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, query.verbose()),
    }
}

#[patch("/products/stock")]
pub async fn adjust_stock(
    _token: ApiToken,
    repo: web::Data<DieselRepository>,
    query: web::Query<DebugQuery>,
    body: web::Json<StockAdjustRequest>,
) -> impl Responder {
    run_stock_adjust(repo.get_ref(), body.into_inner(), None, query.verbose())
}

/// Path-parameterized variant kept for older integrations.
#[patch("/products/{sku}/stock")]
pub async fn adjust_stock_by_sku(
    _token: ApiToken,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    query: web::Query<DebugQuery>,
    body: web::Json<StockAdjustRequest>,
) -> impl Responder {
    let sku = path.into_inner();
    run_stock_adjust(repo.get_ref(), body.into_inner(), Some(sku), query.verbose())
}

fn run_stock_adjust(
    repo: &DieselRepository,
    request: StockAdjustRequest,
    path_sku: Option<String>,
    verbose: bool,
) -> HttpResponse {
    let payload = match request.into_payload(path_sku.as_deref()) {
        Ok(payload) => payload,
        Err(err) => {
            return HttpResponse::BadRequest().json(json!({"error": err.to_string()}));
        }
    };

    match api::adjust_stock(repo, payload) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, verbose),
    }
}

#[patch("/manage-product")]
pub async fn manage_product(
    _token: ApiToken,
    repo: web::Data<DieselRepository>,
    query: web::Query<DebugQuery>,
    body: web::Json<ManageProductRequest>,
) -> impl Responder {
    let payload = match body.into_inner().into_payload() {
        Ok(payload) => payload,
        Err(err) => {
            return HttpResponse::BadRequest().json(json!({"error": err.to_string()}));
        }
    };

    match api::manage_product(repo.get_ref(), payload) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, query.verbose()),
    }
}

/// Query accepted by the owner-scoped report endpoints.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(alias = "userEmail", alias = "email")]
    pub user_email: Option<String>,
    #[serde(default)]
    pub debug: Option<u8>,
}

impl ReportQuery {
    fn verbose(&self) -> bool {
        self.debug == Some(1)
    }
}

#[get("/reports/sales")]
pub async fn sales_report(
    _token: ApiToken,
    repo: web::Data<DieselRepository>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    let Some(user_email) = query.user_email.as_deref() else {
        return HttpResponse::BadRequest()
            .json(json!({"error": "missing required field `userEmail`"}));
    };

    match api::inventory_valuation(repo.get_ref(), user_email) {
        Ok(valuation) => HttpResponse::Ok().json(valuation),
        Err(err) => error_response(err, query.verbose()),
    }
}

#[get("/reports/stock-alert")]
pub async fn stock_alert(
    _token: ApiToken,
    repo: web::Data<DieselRepository>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    let Some(user_email) = query.user_email.as_deref() else {
        return HttpResponse::BadRequest()
            .json(json!({"error": "missing required field `userEmail`"}));
    };

    match api::stock_alert(repo.get_ref(), user_email) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err, query.verbose()),
    }
}
