use actix_web::{HttpResponse, Responder, get, web};
use tera::{Context, Tera};

use crate::repository::DieselRepository;
use crate::routes::render_template;
use crate::services::{ServiceError, storefront};

/// Public storefront page. No session, no token; the only unauthenticated
/// route besides the assets.
#[get("/s/{profile_id}")]
pub async fn show_storefront(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match storefront::load_storefront(repo.get_ref(), path.into_inner()) {
        Ok(data) => {
            let mut context = Context::new();
            context.insert("profile", &data.profile);
            context.insert("catalogs", &data.catalogs);
            render_template(&tera, "storefront/index.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load a storefront: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
