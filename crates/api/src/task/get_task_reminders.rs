use crate::error::TeamdeskError;
use crate::shared::{
    auth::protect_internal_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use teamdesk_api_structs::get_task_reminders::*;
use teamdesk_api_structs::PathParams;
use teamdesk_domain::{TaskReminder, ID};
use teamdesk_infra::TeamdeskContext;

pub async fn get_task_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TeamdeskContext>,
) -> Result<HttpResponse, TeamdeskError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = GetTaskRemindersUseCase {
        task_id: path_params.task_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(|e| match e {
            UseCaseErrors::StorageError => TeamdeskError::InternalError,
        })
}

#[derive(Debug)]
pub struct GetTaskRemindersUseCase {
    pub task_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTaskRemindersUseCase {
    type Response = Vec<TaskReminder>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetTaskReminders";

    async fn execute(&mut self, ctx: &TeamdeskContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .reminders
            .find_by_task(&self.task_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
