use actix_web::{web, HttpResponse};
use teamdesk_api_structs::get_service_health::*;
use teamdesk_infra::TeamdeskContext;

async fn status(ctx: web::Data<TeamdeskContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        reminder_secret_configured: ctx.config.task_reminder_secret.is_some(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
