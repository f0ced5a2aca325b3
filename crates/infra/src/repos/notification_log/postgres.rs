use super::INotificationLogRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use teamdesk_domain::{NotificationLog, ID};

pub struct PostgresNotificationLogRepo {
    pool: PgPool,
}

impl PostgresNotificationLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationLogRaw {
    log_uid: Uuid,
    reminder_uid: Option<Uuid>,
    task_uid: Uuid,
    user_uid: Uuid,
    kind: String,
    success_count: i64,
    fail_count: i64,
    created: i64,
}

impl TryFrom<NotificationLogRaw> for NotificationLog {
    type Error = anyhow::Error;

    fn try_from(raw: NotificationLogRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.log_uid.into(),
            reminder_id: raw.reminder_uid.map(|id| id.into()),
            task_id: raw.task_uid.into(),
            user_id: raw.user_uid.into(),
            kind: raw.kind.parse()?,
            success_count: raw.success_count,
            fail_count: raw.fail_count,
            created: raw.created,
        })
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for PostgresNotificationLogRepo {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_logs
            (log_uid, reminder_uid, task_uid, user_uid, kind, success_count, fail_count, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(log.id.inner_ref())
        .bind(log.reminder_id.as_ref().map(|id| *id.inner_ref()))
        .bind(log.task_id.inner_ref())
        .bind(log.user_id.inner_ref())
        .bind(log.kind.as_str())
        .bind(log.success_count)
        .bind(log.fail_count)
        .bind(log.created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_task(&self, task_id: &ID) -> anyhow::Result<Vec<NotificationLog>> {
        let logs: Vec<NotificationLogRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notification_logs AS l
            WHERE l.task_uid = $1
            ORDER BY l.created ASC
            "#,
        )
        .bind(task_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        logs.into_iter().map(NotificationLog::try_from).collect()
    }
}
