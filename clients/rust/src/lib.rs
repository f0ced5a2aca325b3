mod base;
mod status;
mod task;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use status::StatusClient;
use std::sync::Arc;
use task::TaskClient;
pub use task::AssignTaskInput;
pub use teamdesk_api_structs::dtos::*;
pub use teamdesk_domain::{ReminderMetadata, ID};

// Domain
pub use teamdesk_api_structs::dtos::TaskDTO as Task;
pub use teamdesk_api_structs::dtos::TaskReminderDTO as TaskReminder;

/// Teamdesk Server SDK
///
/// The SDK contains methods for interacting with the task reminder
/// API of the Teamdesk server.
#[derive(Clone)]
pub struct TeamdeskSDK {
    pub status: StatusClient,
    pub task: TaskClient,
}

impl TeamdeskSDK {
    /// `address` is the base url of the server, e.g. `http://localhost:5000`
    pub fn new<T: Into<String>>(address: String, api_key: T) -> Self {
        let mut base = BaseClient::new(format!("{}/api", address));
        base.set_api_key(api_key.into());
        let base = Arc::new(base);
        let status = StatusClient::new(base.clone());
        let task = TaskClient::new(base);

        Self { status, task }
    }
}
