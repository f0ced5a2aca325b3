use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use std::sync::Arc;
use teamdesk_api_structs::*;
use teamdesk_domain::ID;

#[derive(Clone)]
pub struct TaskClient {
    base: Arc<BaseClient>,
}

pub struct AssignTaskInput {
    pub task_id: ID,
    pub user_ids: Vec<ID>,
    pub assigner_name: Option<String>,
}

impl TaskClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn assign(&self, input: AssignTaskInput) -> APIResponse<assign_task::APIResponse> {
        let body = assign_task::RequestBody {
            user_ids: input.user_ids,
            assigner_name: input.assigner_name,
        };
        self.base
            .post(
                body,
                format!("tasks/{}/assign", input.task_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn complete(&self, task_id: ID) -> APIResponse<complete_task::APIResponse> {
        self.base
            .post((), format!("tasks/{}/complete", task_id), StatusCode::OK)
            .await
    }

    pub async fn get_reminders(
        &self,
        task_id: ID,
    ) -> APIResponse<get_task_reminders::APIResponse> {
        self.base
            .get(format!("tasks/{}/reminders", task_id), StatusCode::OK)
            .await
    }

    /// Runs one sweep over the due reminders. The secret is sent in the
    /// `x-task-reminder-secret` header.
    pub async fn process_reminders(
        &self,
        secret: Option<String>,
    ) -> APIResponse<process_task_reminders::APIResponse> {
        let headers: Vec<_> = secret
            .into_iter()
            .map(|secret| ("x-task-reminder-secret", secret))
            .collect();
        self.base
            .post_with_headers(
                (),
                "tasks/reminders/process".into(),
                &headers,
                StatusCode::OK,
            )
            .await
    }
}
