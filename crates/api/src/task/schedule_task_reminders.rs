use crate::shared::usecase::UseCase;
use teamdesk_domain::{ReminderMetadata, TaskReminder, ID};
use teamdesk_infra::TeamdeskContext;
use tracing::{error, info};

/// Writes one `TaskReminder` per assignee. Scheduling a pair again
/// replaces its previous reminder.
#[derive(Debug)]
pub struct ScheduleTaskRemindersUseCase {
    pub task_id: ID,
    pub user_ids: Vec<ID>,
    pub metadata: ReminderMetadata,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleTaskRemindersUseCase {
    /// Number of reminders that were written
    type Response = usize;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "ScheduleTaskReminders";

    async fn execute(&mut self, ctx: &TeamdeskContext) -> Result<Self::Response, Self::Errors> {
        if self.user_ids.is_empty() {
            return Ok(0);
        }

        let now = ctx.sys.get_timestamp_millis();
        let mut scheduled = 0;
        for user_id in &self.user_ids {
            let reminder = TaskReminder::new(
                self.task_id.clone(),
                user_id.clone(),
                self.metadata.clone(),
                &ctx.config.reminder_policy,
                now,
            );

            match ctx.repos.reminders.upsert(&reminder).await {
                Ok(_) => scheduled += 1,
                Err(e) => error!(
                    "Unable to schedule reminder for task: {} and user: {}. Error: {:?}",
                    self.task_id, user_id, e
                ),
            }
        }

        info!(
            "Scheduled {} reminder(s) for task: {}",
            scheduled, self.task_id
        );
        Ok(scheduled)
    }
}
