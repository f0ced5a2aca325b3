use super::subscribers::{NotifyAssigneesOnTaskAssigned, ScheduleRemindersOnTaskAssigned};
use crate::error::TeamdeskError;
use crate::shared::{
    auth::protect_internal_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use teamdesk_api_structs::assign_task::*;
use teamdesk_api_structs::PathParams;
use teamdesk_domain::{ReminderMetadata, Task, ID};
use teamdesk_infra::TeamdeskContext;
use tracing::warn;

pub async fn assign_task_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TeamdeskContext>,
) -> Result<HttpResponse, TeamdeskError> {
    protect_internal_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = AssignTaskUseCase {
        task_id: path_params.task_id.clone(),
        user_ids: body.user_ids,
        assigner_name: body.assigner_name,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.task)))
        .map_err(|e| match e {
            UseCaseErrors::EmptyAssignees => {
                TeamdeskError::BadClientData("At least one user id must be given".into())
            }
            UseCaseErrors::TaskNotFound => TeamdeskError::NotFound(format!(
                "The task with id: {}, was not found.",
                path_params.task_id
            )),
            UseCaseErrors::TaskCompleted => TeamdeskError::Conflict(
                "The task is already completed and can not be assigned".into(),
            ),
            UseCaseErrors::StorageError => TeamdeskError::InternalError,
        })
}

#[derive(Debug)]
pub struct AssignTaskUseCase {
    pub task_id: ID,
    pub user_ids: Vec<ID>,
    pub assigner_name: Option<String>,
}

#[derive(Debug)]
pub struct TaskAssignment {
    pub task: Task,
    /// Users that were not assigned to the task before
    pub new_assignee_ids: Vec<ID>,
    /// Snapshot handed to the reminders of the new assignees
    pub metadata: ReminderMetadata,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    EmptyAssignees,
    TaskNotFound,
    TaskCompleted,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for AssignTaskUseCase {
    type Response = TaskAssignment;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "AssignTask";

    async fn execute(&mut self, ctx: &TeamdeskContext) -> Result<Self::Response, Self::Errors> {
        if self.user_ids.is_empty() {
            return Err(UseCaseErrors::EmptyAssignees);
        }

        let mut task = match ctx.repos.tasks.find(&self.task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => return Err(UseCaseErrors::TaskNotFound),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };
        if task.is_completed() {
            return Err(UseCaseErrors::TaskCompleted);
        }

        if let Some(assigner_name) = self
            .assigner_name
            .as_ref()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
        {
            task.assigned_by_name = Some(assigner_name.to_string());
        }

        let now = ctx.sys.get_timestamp_millis();
        let new_assignee_ids = task.assign(&self.user_ids, now);
        ctx.repos
            .tasks
            .save(&task)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let metadata = reminder_metadata(&task, ctx).await;
        Ok(TaskAssignment {
            task,
            new_assignee_ids,
            metadata,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![
            Box::new(NotifyAssigneesOnTaskAssigned),
            Box::new(ScheduleRemindersOnTaskAssigned),
        ]
    }
}

async fn reminder_metadata(task: &Task, ctx: &TeamdeskContext) -> ReminderMetadata {
    let assignees = match ctx.repos.users.find_many(&task.assignee_ids).await {
        Ok(users) => users,
        Err(e) => {
            warn!(
                "Unable to load the assignees of task: {}. Error: {:?}",
                task.id, e
            );
            Vec::new()
        }
    };
    let assignee_names = task
        .assignee_ids
        .iter()
        .filter_map(|id| assignees.iter().find(|user| user.id == *id))
        .filter_map(|user| user.display_name.clone())
        .collect();

    ReminderMetadata {
        task_title: Some(task.title.clone()),
        priority: task.priority.clone(),
        project_name: task.project_name.clone(),
        assignee_names,
        assigned_by_name: task.assigned_by_name.clone(),
        due_date: task.due_date.clone(),
    }
}
