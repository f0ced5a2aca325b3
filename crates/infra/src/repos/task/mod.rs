mod inmemory;
mod postgres;

pub use inmemory::InMemoryTaskRepo;
pub use postgres::PostgresTaskRepo;
use teamdesk_domain::{Task, ID};

#[async_trait::async_trait]
pub trait ITaskRepo: Send + Sync {
    async fn insert(&self, task: &Task) -> anyhow::Result<()>;
    async fn save(&self, task: &Task) -> anyhow::Result<()>;
    async fn find(&self, task_id: &ID) -> anyhow::Result<Option<Task>>;
}
