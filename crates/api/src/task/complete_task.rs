use super::subscribers::RetireRemindersOnTaskCompleted;
use crate::error::TeamdeskError;
use crate::shared::{
    auth::protect_internal_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use teamdesk_api_structs::complete_task::*;
use teamdesk_api_structs::PathParams;
use teamdesk_domain::{Task, ID};
use teamdesk_infra::TeamdeskContext;

pub async fn complete_task_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TeamdeskContext>,
) -> Result<HttpResponse, TeamdeskError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = CompleteTaskUseCase {
        task_id: path_params.task_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Ok().json(APIResponse::new(task)))
        .map_err(|e| match e {
            UseCaseErrors::TaskNotFound => TeamdeskError::NotFound(format!(
                "The task with id: {}, was not found.",
                path_params.task_id
            )),
            UseCaseErrors::StorageError => TeamdeskError::InternalError,
        })
}

/// Marks the `Task` as completed, which stops every reminder about it
#[derive(Debug)]
pub struct CompleteTaskUseCase {
    pub task_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    TaskNotFound,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CompleteTaskUseCase {
    type Response = Task;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CompleteTask";

    async fn execute(&mut self, ctx: &TeamdeskContext) -> Result<Self::Response, Self::Errors> {
        let mut task = match ctx.repos.tasks.find(&self.task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => return Err(UseCaseErrors::TaskNotFound),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };

        if task.complete(ctx.sys.get_timestamp_millis()) {
            ctx.repos
                .tasks
                .save(&task)
                .await
                .map_err(|_| UseCaseErrors::StorageError)?;
        }

        Ok(task)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RetireRemindersOnTaskCompleted)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use teamdesk_domain::TaskReminder;
    use teamdesk_infra::StaticTimeSys;

    #[actix_web::test]
    async fn completing_a_task_retires_its_reminders() {
        let mut ctx = TeamdeskContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(1000));
        let task = Task::new("Water the plants".into(), 0);
        ctx.repos.tasks.insert(&task).await.unwrap();
        let reminder = TaskReminder::new(
            task.id.clone(),
            ID::new(),
            Default::default(),
            &ctx.config.reminder_policy,
            0,
        );
        ctx.repos.reminders.upsert(&reminder).await.unwrap();

        let usecase = CompleteTaskUseCase {
            task_id: task.id.clone(),
        };
        let completed = execute(usecase, &ctx).await.unwrap();
        assert_eq!(completed.completed_at, Some(1000));

        let reminders = ctx.repos.reminders.find_by_task(&task.id).await.unwrap();
        assert_eq!(reminders[0].completed_at, Some(1000));
        assert_eq!(reminders[0].next_reminder_at, None);

        // Completing again keeps the original completion time
        ctx.sys = Arc::new(StaticTimeSys(2000));
        let usecase = CompleteTaskUseCase {
            task_id: task.id.clone(),
        };
        let completed = execute(usecase, &ctx).await.unwrap();
        assert_eq!(completed.completed_at, Some(1000));
        let reminders = ctx.repos.reminders.find_by_task(&task.id).await.unwrap();
        assert_eq!(reminders[0].completed_at, Some(1000));
    }

    #[actix_web::test]
    async fn unknown_task_is_not_found() {
        let ctx = TeamdeskContext::create_inmemory();
        let mut usecase = CompleteTaskUseCase { task_id: ID::new() };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseErrors::TaskNotFound)
        ));
    }
}
