use super::IUserRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use teamdesk_domain::{User, ID};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    display_name: Option<String>,
    telegram_notifications_enabled: bool,
    telegram_chat_ids: Vec<String>,
    last_login_at: Option<i64>,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        Self {
            id: raw.user_uid.into(),
            display_name: raw.display_name,
            telegram_notifications_enabled: raw.telegram_notifications_enabled,
            telegram_chat_ids: raw.telegram_chat_ids,
            last_login_at: raw.last_login_at,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
            (user_uid, display_name, telegram_notifications_enabled, telegram_chat_ids, last_login_at)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.display_name)
        .bind(user.telegram_notifications_enabled)
        .bind(&user.telegram_chat_ids)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET display_name = $2,
            telegram_notifications_enabled = $3,
            telegram_chat_ids = $4,
            last_login_at = $5
            WHERE user_uid = $1
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.display_name)
        .bind(user.telegram_notifications_enabled)
        .bind(&user.telegram_chat_ids)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user: Option<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|u| u.into()))
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        let user_ids = user_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();

        let users: Vec<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = ANY($1)
            "#,
        )
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(|u| u.into()).collect())
    }
}
