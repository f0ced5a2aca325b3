mod notification_log;
mod reminder;
mod shared;
mod task;
mod user;

pub use notification_log::{
    INotificationLogRepo, InMemoryNotificationLogRepo, PostgresNotificationLogRepo,
};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use task::{ITaskRepo, InMemoryTaskRepo, PostgresTaskRepo};
use tracing::info;
pub use user::{IUserRepo, InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub tasks: Arc<dyn ITaskRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub notification_logs: Arc<dyn INotificationLogRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            tasks: Arc::new(PostgresTaskRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            notification_logs: Arc::new(PostgresNotificationLogRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            tasks: Arc::new(InMemoryTaskRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            notification_logs: Arc::new(InMemoryNotificationLogRepo::new()),
        }
    }
}
