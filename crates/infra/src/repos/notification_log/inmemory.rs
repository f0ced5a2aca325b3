use super::INotificationLogRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use teamdesk_domain::{NotificationLog, ID};

pub struct InMemoryNotificationLogRepo {
    logs: Mutex<Vec<NotificationLog>>,
}

impl InMemoryNotificationLogRepo {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for InMemoryNotificationLogRepo {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()> {
        insert(log, &self.logs);
        Ok(())
    }

    async fn find_by_task(&self, task_id: &ID) -> anyhow::Result<Vec<NotificationLog>> {
        Ok(find_by(&self.logs, |l| l.task_id == *task_id))
    }
}
