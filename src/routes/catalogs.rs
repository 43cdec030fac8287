use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::catalogs::SaveCatalogForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, catalogs};

#[get("/catalogs")]
pub async fn show_catalogs(
    params: web::Query<catalogs::CatalogsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match catalogs::load_catalogs_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "catalogs",
                &server_config.auth_service_url,
            );
            context.insert("profile", &data.profile);
            context.insert("catalogs", &data.catalogs);
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            render_template(&tera, "catalogs/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list catalogs: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Body parsed with `serde_html_form` because `product_ids` arrives as a
/// repeated urlencoded key, which `web::Form` does not support.
#[post("/catalogs/save")]
pub async fn save_catalog(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: SaveCatalogForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse the catalog form: {err}");
            FlashMessage::error("Некорректная форма каталога.").send();
            return redirect("/catalogs");
        }
    };

    match catalogs::save_catalog(repo.get_ref(), &user, form) {
        Ok(catalog) => {
            FlashMessage::success(format!("Каталог «{}» сохранён.", catalog.name)).send();
            redirect("/catalogs")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/catalogs")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Каталог или товар не найден.").send();
            redirect("/catalogs")
        }
        Err(err) => {
            log::error!("Failed to save a catalog: {err}");
            FlashMessage::error("Ошибка при сохранении каталога").send();
            redirect("/catalogs")
        }
    }
}

#[post("/catalogs/{catalog_id}/delete")]
pub async fn delete_catalog(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalogs::remove_catalog(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Каталог удалён.").send();
            redirect("/catalogs")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Каталог не найден.").send();
            redirect("/catalogs")
        }
        Err(err) => {
            log::error!("Failed to delete a catalog: {err}");
            FlashMessage::error("Ошибка при удалении каталога").send();
            redirect("/catalogs")
        }
    }
}
