use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::ai::GenerationClient;
use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::reports::{AcceptReportForm, AuthorReportForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::reports::ReportsQuery;
use crate::services::{ServiceError, insights, reports};

#[get("/reports")]
pub async fn show_reports(
    params: web::Query<ReportsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match reports::load_reports_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "reports",
                &server_config.auth_service_url,
            );
            context.insert("profile", &data.profile);
            context.insert("reports", &data.reports);
            render_template(&tera, "reports/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list reports: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Generates a draft report from the vendor's criteria and shows it for
/// acceptance. Nothing is persisted until the vendor accepts the draft.
#[post("/reports/author")]
pub async fn author_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    client: web::Data<GenerationClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<AuthorReportForm>,
) -> impl Responder {
    let criteria = match form.into_criteria() {
        Ok(criteria) => criteria,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/reports");
        }
    };

    let content =
        match insights::author_report(repo.get_ref(), client.get_ref(), &user, &criteria).await {
            Ok(content) => content,
            Err(ServiceError::Upstream(err)) => {
                log::error!("Report generation failed: {err}");
                FlashMessage::error("Сервис генерации недоступен, попробуйте позже.").send();
                return redirect("/reports");
            }
            Err(err) => {
                log::error!("Failed to author a report: {err}");
                return HttpResponse::InternalServerError().finish();
            }
        };

    render_draft(
        &user,
        repo.get_ref(),
        &flash_messages,
        &server_config,
        &tera,
        "custom",
        &criteria,
        &content,
    )
}

/// Generates a sales/inventory analysis draft over the whole store.
#[post("/reports/analyze")]
pub async fn analyze_sales(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    client: web::Data<GenerationClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let content = match insights::analyze_sales(repo.get_ref(), client.get_ref(), &user).await {
        Ok(content) => content,
        Err(ServiceError::Upstream(err)) => {
            log::error!("Sales analysis failed: {err}");
            FlashMessage::error("Сервис генерации недоступен, попробуйте позже.").send();
            return redirect("/reports");
        }
        Err(err) => {
            log::error!("Failed to analyze sales: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    render_draft(
        &user,
        repo.get_ref(),
        &flash_messages,
        &server_config,
        &tera,
        "sales",
        "",
        &content,
    )
}

#[post("/reports/accept")]
pub async fn accept_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AcceptReportForm>,
) -> impl Responder {
    match reports::accept_report(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Отчёт сохранён.").send();
            redirect("/reports")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/reports")
        }
        Err(err) => {
            log::error!("Failed to accept a report: {err}");
            FlashMessage::error("Ошибка при сохранении отчёта").send();
            redirect("/reports")
        }
    }
}

#[post("/reports/{report_id}/delete")]
pub async fn delete_report(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match reports::remove_report(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Отчёт удалён.").send();
            redirect("/reports")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Отчёт не найден.").send();
            redirect("/reports")
        }
        Err(err) => {
            log::error!("Failed to delete a report: {err}");
            FlashMessage::error("Ошибка при удалении отчёта").send();
            redirect("/reports")
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_draft(
    user: &AuthenticatedUser,
    repo: &DieselRepository,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
    kind: &str,
    criteria: &str,
    content: &str,
) -> HttpResponse {
    match reports::load_reports_page(repo, user, ReportsQuery::default()) {
        Ok(data) => {
            let mut context =
                base_context(flash_messages, user, "reports", &server_config.auth_service_url);
            context.insert("profile", &data.profile);
            context.insert("reports", &data.reports);
            context.insert("draft_kind", kind);
            context.insert("draft_criteria", criteria);
            context.insert("draft_content", content);
            render_template(tera, "reports/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to reload the reports page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
