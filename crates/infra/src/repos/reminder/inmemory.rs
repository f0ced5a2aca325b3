use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use teamdesk_domain::{TaskReminder, ID};

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<TaskReminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn upsert(&self, reminder: &TaskReminder) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        match reminders
            .iter_mut()
            .find(|r| r.task_id == reminder.task_id && r.user_id == reminder.user_id)
        {
            Some(existing) => *existing = reminder.clone(),
            None => reminders.push(reminder.clone()),
        }
        Ok(())
    }

    async fn select_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<TaskReminder>> {
        let mut due = find_by(&self.reminders, |r| r.is_due(now));
        due.sort_by_key(|r| r.next_reminder_at);
        due.truncate(limit);
        Ok(due)
    }

    async fn claim(
        &self,
        reminder_id: &ID,
        now: i64,
        lease_until: i64,
    ) -> anyhow::Result<Option<TaskReminder>> {
        let mut reminders = self.reminders.lock().unwrap();
        let claimed = reminders
            .iter_mut()
            .find(|r| r.id == *reminder_id && r.is_claimable(now))
            .map(|r| {
                r.processing_until = Some(lease_until);
                r.clone()
            });
        Ok(claimed)
    }

    async fn save(&self, reminder: &TaskReminder) -> anyhow::Result<()> {
        // Held across the read and the write so a concurrent completion is never lost
        let mut reminders = self.reminders.lock().unwrap();
        if let Some(stored) = reminders.iter_mut().find(|r| r.id == reminder.id) {
            let completed_at = stored.completed_at;
            *stored = reminder.clone();
            if completed_at.is_some() {
                stored.completed_at = completed_at;
                stored.next_reminder_at = None;
            }
        }
        Ok(())
    }

    async fn find_by_task(&self, task_id: &ID) -> anyhow::Result<Vec<TaskReminder>> {
        Ok(find_by(&self.reminders, |r| r.task_id == *task_id))
    }

    async fn complete_for_task(&self, task_id: &ID, now: i64) -> anyhow::Result<u64> {
        Ok(update_many(
            &self.reminders,
            |r| r.task_id == *task_id && !r.is_completed(),
            |r| r.complete(now),
        ))
    }
}
