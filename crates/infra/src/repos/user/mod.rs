mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
pub use postgres::PostgresUserRepo;
use teamdesk_domain::{NotificationTarget, User, ID};

/// Directory of the application's users
#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>>;
    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>>;

    async fn find_notification_target(
        &self,
        user_id: &ID,
    ) -> anyhow::Result<Option<NotificationTarget>> {
        Ok(self
            .find(user_id)
            .await?
            .map(|user| user.notification_target()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_notification_target_of_stored_user() {
        let repo = InMemoryUserRepo::new();
        let mut user = User::new();
        user.telegram_chat_ids = vec!["777".into()];
        repo.insert(&user).await.unwrap();

        let target = repo
            .find_notification_target(&user.id)
            .await
            .unwrap()
            .expect("To find target");
        assert!(target.is_deliverable());

        user.telegram_notifications_enabled = false;
        repo.save(&user).await.unwrap();
        let target = repo.find_notification_target(&user.id).await.unwrap().unwrap();
        assert!(!target.is_deliverable());

        assert!(repo
            .find_notification_target(&ID::new())
            .await
            .unwrap()
            .is_none());
    }
}
