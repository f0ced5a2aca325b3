use super::ITaskRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use teamdesk_domain::{Task, ID};

pub struct PostgresTaskRepo {
    pool: PgPool,
}

impl PostgresTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRaw {
    task_uid: Uuid,
    title: String,
    priority: Option<String>,
    project_name: Option<String>,
    due_date: Option<String>,
    assigned_by_name: Option<String>,
    assignee_uids: Vec<Uuid>,
    completed_at: Option<i64>,
    created: i64,
    updated: i64,
}

impl From<TaskRaw> for Task {
    fn from(raw: TaskRaw) -> Self {
        Self {
            id: raw.task_uid.into(),
            title: raw.title,
            priority: raw.priority,
            project_name: raw.project_name,
            due_date: raw.due_date,
            assigned_by_name: raw.assigned_by_name,
            assignee_ids: raw.assignee_uids.into_iter().map(|id| id.into()).collect(),
            completed_at: raw.completed_at,
            created: raw.created,
            updated: raw.updated,
        }
    }
}

fn assignee_uids(task: &Task) -> Vec<Uuid> {
    task.assignee_ids
        .iter()
        .map(|id| *id.inner_ref())
        .collect()
}

#[async_trait::async_trait]
impl ITaskRepo for PostgresTaskRepo {
    async fn insert(&self, task: &Task) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks
            (task_uid, title, priority, project_name, due_date, assigned_by_name,
             assignee_uids, completed_at, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(task.id.inner_ref())
        .bind(&task.title)
        .bind(&task.priority)
        .bind(&task.project_name)
        .bind(&task.due_date)
        .bind(&task.assigned_by_name)
        .bind(assignee_uids(task))
        .bind(task.completed_at)
        .bind(task.created)
        .bind(task.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, task: &Task) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2,
            priority = $3,
            project_name = $4,
            due_date = $5,
            assigned_by_name = $6,
            assignee_uids = $7,
            completed_at = $8,
            updated = $9
            WHERE task_uid = $1
            "#,
        )
        .bind(task.id.inner_ref())
        .bind(&task.title)
        .bind(&task.priority)
        .bind(&task.project_name)
        .bind(&task.due_date)
        .bind(&task.assigned_by_name)
        .bind(assignee_uids(task))
        .bind(task.completed_at)
        .bind(task.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, task_id: &ID) -> anyhow::Result<Option<Task>> {
        let task: Option<TaskRaw> = sqlx::query_as(
            r#"
            SELECT * FROM tasks AS t
            WHERE t.task_uid = $1
            "#,
        )
        .bind(task_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(task.map(|t| t.into()))
    }
}
