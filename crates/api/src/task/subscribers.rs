use super::{
    assign_task::{AssignTaskUseCase, TaskAssignment},
    complete_task::CompleteTaskUseCase,
    schedule_task_reminders::ScheduleTaskRemindersUseCase,
};
use crate::shared::usecase::{execute, Subscriber};
use teamdesk_domain::{MessageContext, NotificationLog, ReminderKind, Task};
use teamdesk_infra::TeamdeskContext;
use tracing::{debug, error, info, warn};

/// Sends the assignment notice to every user that was just assigned
pub struct NotifyAssigneesOnTaskAssigned;

#[async_trait::async_trait(?Send)]
impl Subscriber<AssignTaskUseCase> for NotifyAssigneesOnTaskAssigned {
    async fn notify(&self, e: &TaskAssignment, ctx: &TeamdeskContext) {
        let message = match MessageContext::resolve(&e.task.id, 0, Some(&e.task), &e.metadata) {
            Some(message_ctx) => message_ctx.render(ReminderKind::Assigned),
            None => return,
        };
        let now = ctx.sys.get_timestamp_millis();

        for user_id in &e.new_assignee_ids {
            let target = match ctx.repos.users.find_notification_target(user_id).await {
                Ok(Some(target)) if target.is_deliverable() => target,
                Ok(_) => {
                    debug!("User: {} can not be notified about task: {}", user_id, e.task.id);
                    continue;
                }
                Err(err) => {
                    error!("Unable to load user: {}. Error: {:?}", user_id, err);
                    continue;
                }
            };

            let outcome = ctx.dispatcher.send(&target.handles(), &message).await;
            if outcome.fail_count > 0 {
                warn!(
                    "Assignment notice for task: {} failed for {} chat(s) of user: {}",
                    e.task.id, outcome.fail_count, user_id
                );
            }

            let log = NotificationLog::new(
                None,
                e.task.id.clone(),
                user_id.clone(),
                ReminderKind::Assigned,
                &outcome,
                now,
            );
            if let Err(err) = ctx.repos.notification_logs.insert(&log).await {
                warn!("Unable to write notification log. Error: {:?}", err);
            }
        }
    }
}

pub struct ScheduleRemindersOnTaskAssigned;

#[async_trait::async_trait(?Send)]
impl Subscriber<AssignTaskUseCase> for ScheduleRemindersOnTaskAssigned {
    async fn notify(&self, e: &TaskAssignment, ctx: &TeamdeskContext) {
        let schedule_reminders = ScheduleTaskRemindersUseCase {
            task_id: e.task.id.clone(),
            user_ids: e.new_assignee_ids.clone(),
            metadata: e.metadata.clone(),
        };

        // Sideeffect, ignore result
        let _ = execute(schedule_reminders, ctx).await;
    }
}

pub struct RetireRemindersOnTaskCompleted;

#[async_trait::async_trait(?Send)]
impl Subscriber<CompleteTaskUseCase> for RetireRemindersOnTaskCompleted {
    async fn notify(&self, task: &Task, ctx: &TeamdeskContext) {
        let now = ctx.sys.get_timestamp_millis();
        match ctx.repos.reminders.complete_for_task(&task.id, now).await {
            Ok(retired) => info!("Retired {} reminder(s) of completed task: {}", retired, task.id),
            Err(e) => error!(
                "Unable to retire the reminders of completed task: {}. Error: {:?}",
                task.id, e
            ),
        }
    }
}
