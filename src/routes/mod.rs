use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;

pub mod api;
pub mod catalogs;
pub mod main;
pub mod products;
pub mod reports;
pub mod storefront;

/// Flash message flattened for the templates.
#[derive(Serialize)]
struct Alert {
    level: String,
    message: String,
}

/// Builds the context shared by every authenticated page.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    auth_service_url: &str,
) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| {
            let level = match message.level() {
                Level::Debug => "debug",
                Level::Info => "info",
                Level::Success => "success",
                Level::Warning => "warning",
                Level::Error => "error",
            };
            Alert {
                level: level.to_string(),
                message: message.content().to_string(),
            }
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("auth_service_url", auth_service_url);
    context
}

/// 303 redirect to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders a template or logs and answers 500.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render {name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
