use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::ai::GenerationClient;
use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::products::{
    AddProductForm, AdjustStockForm, EditProductForm, PauseProductForm,
};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, insights, products};

#[get("/products")]
pub async fn show_products(
    params: web::Query<products::ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products::load_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            context.insert("profile", &data.profile);
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!("Товар «{}» добавлен.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to add a product: {err}");
            FlashMessage::error("Ошибка при добавлении товара").send();
            redirect("/products")
        }
    }
}

#[post("/products/edit")]
pub async fn edit_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditProductForm>,
) -> impl Responder {
    match products::modify_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!("Товар «{}» обновлён.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to update a product: {err}");
            FlashMessage::error("Ошибка при обновлении товара").send();
            redirect("/products")
        }
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::remove_product(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Товар удалён.").send();
            redirect("/products")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to delete a product: {err}");
            FlashMessage::error("Ошибка при удалении товара").send();
            redirect("/products")
        }
    }
}

#[post("/products/stock")]
pub async fn adjust_stock(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AdjustStockForm>,
) -> impl Responder {
    match products::change_stock(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!(
                "Остаток «{}»: {} шт.",
                product.name, product.stock
            ))
            .send();
            redirect("/products")
        }
        Err(ServiceError::Conflict(_)) => {
            FlashMessage::error("Остаток не может стать отрицательным.").send();
            redirect("/products")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to adjust stock: {err}");
            FlashMessage::error("Ошибка при изменении остатка").send();
            redirect("/products")
        }
    }
}

#[post("/products/pause")]
pub async fn pause_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PauseProductForm>,
) -> impl Responder {
    match products::pause_product(repo.get_ref(), &user, form) {
        Ok(product) if product.is_visible => {
            FlashMessage::success(format!("Товар «{}» снова виден.", product.name)).send();
            redirect("/products")
        }
        Ok(product) => {
            FlashMessage::success(format!("Товар «{}» скрыт.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to change visibility: {err}");
            FlashMessage::error("Ошибка при изменении видимости").send();
            redirect("/products")
        }
    }
}

/// JSON endpoint behind the pricing-suggestion modal.
#[post("/products/{product_id}/pricing")]
pub async fn suggest_price(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    client: web::Data<GenerationClient>,
) -> impl Responder {
    match insights::suggest_pricing(repo.get_ref(), client.get_ref(), &user, path.into_inner())
        .await
    {
        Ok((_, suggestion)) => HttpResponse::Ok().json(suggestion),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Upstream(err)) => {
            log::error!("Pricing suggestion failed: {err}");
            HttpResponse::BadGateway().finish()
        }
        Err(err) => {
            log::error!("Failed to suggest a price: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
