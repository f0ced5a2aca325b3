use crate::dtos::{TaskDTO, TaskReminderDTO};
use serde::{Deserialize, Serialize};
use teamdesk_domain::{Task, TaskReminder, ID};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub task: TaskDTO,
}

impl TaskResponse {
    pub fn new(task: Task) -> Self {
        Self {
            task: TaskDTO::new(task),
        }
    }
}

#[derive(Deserialize)]
pub struct PathParams {
    pub task_id: ID,
}

pub mod assign_task {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_ids: Vec<ID>,
        #[serde(default)]
        pub assigner_name: Option<String>,
    }

    pub type APIResponse = TaskResponse;
}

pub mod complete_task {
    use super::*;

    pub type APIResponse = TaskResponse;
}

pub mod get_task_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<TaskReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<TaskReminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(TaskReminderDTO::new).collect(),
            }
        }
    }
}

pub mod process_task_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct QueryParams {
        #[serde(default)]
        pub secret: Option<String>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub success: bool,
        pub processed: usize,
    }

    impl APIResponse {
        pub fn new(processed: usize) -> Self {
            Self {
                success: true,
                processed,
            }
        }
    }
}
