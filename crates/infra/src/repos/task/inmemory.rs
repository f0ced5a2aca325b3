use super::ITaskRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use teamdesk_domain::{Task, ID};

pub struct InMemoryTaskRepo {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryTaskRepo {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITaskRepo for InMemoryTaskRepo {
    async fn insert(&self, task: &Task) -> anyhow::Result<()> {
        insert(task, &self.tasks);
        Ok(())
    }

    async fn save(&self, task: &Task) -> anyhow::Result<()> {
        save(task, &self.tasks);
        Ok(())
    }

    async fn find(&self, task_id: &ID) -> anyhow::Result<Option<Task>> {
        Ok(find(task_id, &self.tasks))
    }
}
