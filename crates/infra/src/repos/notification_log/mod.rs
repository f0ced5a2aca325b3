mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationLogRepo;
pub use postgres::PostgresNotificationLogRepo;
use teamdesk_domain::{NotificationLog, ID};

/// Append only audit trail of dispatched notifications
#[async_trait::async_trait]
pub trait INotificationLogRepo: Send + Sync {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()>;
    async fn find_by_task(&self, task_id: &ID) -> anyhow::Result<Vec<NotificationLog>>;
}
