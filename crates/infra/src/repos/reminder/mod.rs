mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use teamdesk_domain::{TaskReminder, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Inserts the `TaskReminder` or replaces the one stored for the same
    /// (task, user) pair.
    async fn upsert(&self, reminder: &TaskReminder) -> anyhow::Result<()>;
    /// Reminders that are due at `now` and not completed, oldest first
    async fn select_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<TaskReminder>>;
    /// Takes a lease on a reminder that is still due and not leased by another
    /// sweep. Returns the current state of the reminder if the claim succeeded.
    async fn claim(
        &self,
        reminder_id: &ID,
        now: i64,
        lease_until: i64,
    ) -> anyhow::Result<Option<TaskReminder>>;
    /// Writes the scheduling state. A stored completion time is never cleared.
    async fn save(&self, reminder: &TaskReminder) -> anyhow::Result<()>;
    async fn find_by_task(&self, task_id: &ID) -> anyhow::Result<Vec<TaskReminder>>;
    /// Completes every open reminder of a task and returns how many were completed
    async fn complete_for_task(&self, task_id: &ID, now: i64) -> anyhow::Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use teamdesk_domain::{ReminderMetadata, ReminderPolicy, MILLIS_PER_MINUTE};

    const NOW: i64 = 1_700_000_000_000;

    fn reminder(task_id: &ID, user_id: &ID, title: &str) -> TaskReminder {
        let metadata = ReminderMetadata {
            task_title: Some(title.into()),
            ..Default::default()
        };
        TaskReminder::new(
            task_id.clone(),
            user_id.clone(),
            metadata,
            &ReminderPolicy::default(),
            NOW,
        )
    }

    #[tokio::test]
    async fn upsert_replaces_reminder_of_same_pair() {
        let repo = InMemoryReminderRepo::new();
        let task_id = ID::new();
        let user_id = ID::new();

        let first = reminder(&task_id, &user_id, "First");
        repo.upsert(&first).await.unwrap();
        let mut second = reminder(&task_id, &user_id, "Second");
        second.max_reminders = 3;
        repo.upsert(&second).await.unwrap();
        repo.upsert(&reminder(&task_id, &ID::new(), "Other user")).await.unwrap();

        let stored = repo.find_by_task(&task_id).await.unwrap();
        assert_eq!(stored.len(), 2);
        let pair = stored.iter().find(|r| r.user_id == user_id).unwrap();
        assert_eq!(pair, &second);
    }

    #[tokio::test]
    async fn selects_only_due_open_reminders_oldest_first() {
        let repo = InMemoryReminderRepo::new();
        let task_id = ID::new();
        let due_at = NOW + 30 * MILLIS_PER_MINUTE;

        let mut later = reminder(&task_id, &ID::new(), "Later");
        later.next_reminder_at = Some(due_at - 10);
        let mut earlier = reminder(&task_id, &ID::new(), "Earlier");
        earlier.next_reminder_at = Some(due_at - 20);
        let mut completed = reminder(&task_id, &ID::new(), "Completed");
        completed.complete(NOW);
        let mut not_yet_due = reminder(&task_id, &ID::new(), "Not yet");
        not_yet_due.next_reminder_at = Some(due_at + 1);

        for r in [&later, &earlier, &completed, &not_yet_due] {
            repo.upsert(r).await.unwrap();
        }

        let due = repo.select_due(due_at, 10).await.unwrap();
        assert_eq!(
            due.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
            vec![earlier.id.clone(), later.id.clone()]
        );
        assert_eq!(repo.select_due(due_at, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn claimed_reminder_cannot_be_claimed_twice_within_lease() {
        let repo = InMemoryReminderRepo::new();
        let r = reminder(&ID::new(), &ID::new(), "Claim me");
        repo.upsert(&r).await.unwrap();
        let now = NOW + 30 * MILLIS_PER_MINUTE;
        let lease_until = now + 1000;

        let claimed = repo.claim(&r.id, now, lease_until).await.unwrap().unwrap();
        assert_eq!(claimed.processing_until, Some(lease_until));
        assert!(repo.claim(&r.id, now + 10, now + 2000).await.unwrap().is_none());
        assert!(repo
            .claim(&r.id, lease_until, lease_until + 1000)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn save_never_clears_completion() {
        let repo = InMemoryReminderRepo::new();
        let mut r = reminder(&ID::new(), &ID::new(), "Done");
        repo.upsert(&r).await.unwrap();
        assert_eq!(repo.complete_for_task(&r.task_id, NOW + 5).await.unwrap(), 1);
        assert_eq!(repo.complete_for_task(&r.task_id, NOW + 6).await.unwrap(), 0);

        // Stale copy written back by a slow sweep
        r.record_dispatch(NOW + 10);
        repo.save(&r).await.unwrap();

        let stored = repo.find_by_task(&r.task_id).await.unwrap().remove(0);
        assert_eq!(stored.completed_at, Some(NOW + 5));
        assert_eq!(stored.next_reminder_at, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn completion_survives_concurrent_saves() {
        let repo = Arc::new(InMemoryReminderRepo::new());
        for _ in 0..200 {
            let mut r = reminder(&ID::new(), &ID::new(), "Racy");
            repo.upsert(&r).await.unwrap();
            r.record_dispatch(NOW + 10);

            let completer = {
                let repo = repo.clone();
                let task_id = r.task_id.clone();
                tokio::spawn(async move { repo.complete_for_task(&task_id, NOW + 5).await })
            };
            let saver = {
                let repo = repo.clone();
                let r = r.clone();
                tokio::spawn(async move { repo.save(&r).await })
            };
            assert_eq!(completer.await.unwrap().unwrap(), 1);
            saver.await.unwrap().unwrap();

            let stored = repo.find_by_task(&r.task_id).await.unwrap().remove(0);
            assert_eq!(stored.completed_at, Some(NOW + 5));
            assert_eq!(stored.next_reminder_at, None);
        }
    }
}
