use std::env;

use actix_files::Files;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use vitrina::ai::GenerationClient;
use vitrina::config::{GenerationConfig, ServerConfig};
use vitrina::db::establish_connection_pool;
use vitrina::middleware::RedirectUnauthorized;
use vitrina::repository::DieselRepository;
use vitrina::routes::api::{
    adjust_stock as api_adjust_stock, adjust_stock_by_sku, health, manage_product,
    sales_report, stock_alert, upsert_product,
};
use vitrina::routes::catalogs::{delete_catalog, save_catalog, show_catalogs};
use vitrina::routes::main::{show_index, show_settings, update_settings};
use vitrina::routes::products::{
    add_product, adjust_stock, delete_product, edit_product, pause_product, show_products,
    suggest_price,
};
use vitrina::routes::reports::{
    accept_report, analyze_sales, author_report, delete_report, show_reports,
};
use vitrina::routes::storefront::show_storefront;

fn required_env(name: &str) -> String {
    match env::var(name) {
        Ok(value) => value,
        Err(_) => {
            log::error!("{name} environment variable not set");
            std::process::exit(1);
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let server_config = ServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url: required_env("AUTH_SERVICE_URL"),
        api_token: required_env("API_TOKEN"),
    };

    let generation_config = GenerationConfig {
        api_url: required_env("AI_API_URL"),
        api_key: required_env("AI_API_KEY"),
        model: env::var("AI_MODEL").unwrap_or("gpt-4o-mini".to_string()),
    };
    let generation_client = GenerationClient::new(&generation_config);

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_storefront)
            .service(
                web::scope("/api")
                    .service(health)
                    .service(upsert_product)
                    .service(api_adjust_stock)
                    .service(adjust_stock_by_sku)
                    .service(manage_product)
                    .service(sales_report)
                    .service(stock_alert),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(show_settings)
                    .service(update_settings)
                    .service(show_products)
                    .service(add_product)
                    .service(edit_product)
                    .service(delete_product)
                    .service(adjust_stock)
                    .service(pause_product)
                    .service(suggest_price)
                    .service(show_catalogs)
                    .service(save_catalog)
                    .service(delete_catalog)
                    .service(show_reports)
                    .service(author_report)
                    .service(analyze_sales)
                    .service(accept_report)
                    .service(delete_report),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(generation_client.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
