use super::IReminderRepo;
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use teamdesk_domain::{ReminderMetadata, TaskReminder, ID};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskReminderRaw {
    reminder_uid: Uuid,
    task_uid: Uuid,
    user_uid: Uuid,
    initial_notification_at: i64,
    next_reminder_at: Option<i64>,
    last_reminder_sent_at: Option<i64>,
    reminder_attempts: i64,
    reminder_interval_minutes: i64,
    max_reminders: i64,
    completed_at: Option<i64>,
    processing_until: Option<i64>,
    metadata: Json<ReminderMetadata>,
    created: i64,
    updated_at: i64,
}

impl From<TaskReminderRaw> for TaskReminder {
    fn from(raw: TaskReminderRaw) -> Self {
        Self {
            id: raw.reminder_uid.into(),
            task_id: raw.task_uid.into(),
            user_id: raw.user_uid.into(),
            initial_notification_at: raw.initial_notification_at,
            next_reminder_at: raw.next_reminder_at,
            last_reminder_sent_at: raw.last_reminder_sent_at,
            reminder_attempts: raw.reminder_attempts,
            reminder_interval_minutes: raw.reminder_interval_minutes,
            max_reminders: raw.max_reminders,
            completed_at: raw.completed_at,
            processing_until: raw.processing_until,
            metadata: raw.metadata.0,
            created: raw.created,
            updated_at: raw.updated_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn upsert(&self, reminder: &TaskReminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO task_reminders
            (reminder_uid, task_uid, user_uid, initial_notification_at, next_reminder_at,
             last_reminder_sent_at, reminder_attempts, reminder_interval_minutes, max_reminders,
             completed_at, processing_until, metadata, created, updated_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (task_uid, user_uid) DO UPDATE SET
                reminder_uid = EXCLUDED.reminder_uid,
                initial_notification_at = EXCLUDED.initial_notification_at,
                next_reminder_at = EXCLUDED.next_reminder_at,
                last_reminder_sent_at = EXCLUDED.last_reminder_sent_at,
                reminder_attempts = EXCLUDED.reminder_attempts,
                reminder_interval_minutes = EXCLUDED.reminder_interval_minutes,
                max_reminders = EXCLUDED.max_reminders,
                completed_at = EXCLUDED.completed_at,
                processing_until = EXCLUDED.processing_until,
                metadata = EXCLUDED.metadata,
                created = EXCLUDED.created,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.task_id.inner_ref())
        .bind(reminder.user_id.inner_ref())
        .bind(reminder.initial_notification_at)
        .bind(reminder.next_reminder_at)
        .bind(reminder.last_reminder_sent_at)
        .bind(reminder.reminder_attempts)
        .bind(reminder.reminder_interval_minutes)
        .bind(reminder.max_reminders)
        .bind(reminder.completed_at)
        .bind(reminder.processing_until)
        .bind(Json(&reminder.metadata))
        .bind(reminder.created)
        .bind(reminder.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn select_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<TaskReminder>> {
        let reminders: Vec<TaskReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM task_reminders AS r
            WHERE r.next_reminder_at <= $1 AND
            r.completed_at IS NULL
            ORDER BY r.next_reminder_at ASC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn claim(
        &self,
        reminder_id: &ID,
        now: i64,
        lease_until: i64,
    ) -> anyhow::Result<Option<TaskReminder>> {
        let reminder: Option<TaskReminderRaw> = sqlx::query_as(
            r#"
            UPDATE task_reminders AS r
            SET processing_until = $3
            WHERE r.reminder_uid = $1 AND
            r.completed_at IS NULL AND
            r.next_reminder_at <= $2 AND
            (r.processing_until IS NULL OR r.processing_until <= $2)
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(now)
        .bind(lease_until)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reminder.map(|r| r.into()))
    }

    async fn save(&self, reminder: &TaskReminder) -> anyhow::Result<()> {
        // Right hand sides see the stored row, so a completed reminder stays completed
        sqlx::query(
            r#"
            UPDATE task_reminders
            SET next_reminder_at = CASE WHEN completed_at IS NULL THEN $2 ELSE NULL END,
            last_reminder_sent_at = $3,
            reminder_attempts = $4,
            completed_at = COALESCE(completed_at, $5),
            processing_until = $6,
            metadata = $7,
            updated_at = $8
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.next_reminder_at)
        .bind(reminder.last_reminder_sent_at)
        .bind(reminder.reminder_attempts)
        .bind(reminder.completed_at)
        .bind(reminder.processing_until)
        .bind(Json(&reminder.metadata))
        .bind(reminder.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_task(&self, task_id: &ID) -> anyhow::Result<Vec<TaskReminder>> {
        let reminders: Vec<TaskReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM task_reminders AS r
            WHERE r.task_uid = $1
            ORDER BY r.created ASC
            "#,
        )
        .bind(task_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn complete_for_task(&self, task_id: &ID, now: i64) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE task_reminders
            SET completed_at = $2,
            next_reminder_at = NULL,
            processing_until = NULL,
            updated_at = $2
            WHERE task_uid = $1 AND
            completed_at IS NULL
            "#,
        )
        .bind(task_id.inner_ref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected())
    }
}
