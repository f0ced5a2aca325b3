use crate::error::TeamdeskError;
use crate::shared::{
    auth::protect_reminder_processing_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use teamdesk_api_structs::process_task_reminders::*;
use teamdesk_domain::{
    MessageContext, NotificationLog, ReminderDecision, ReminderKind, RetireReason, Task,
    TaskReminder, ID,
};
use teamdesk_infra::TeamdeskContext;
use tracing::{debug, error, info, warn};

pub async fn process_task_reminders_controller(
    http_req: HttpRequest,
    query: web::Query<QueryParams>,
    ctx: web::Data<TeamdeskContext>,
) -> Result<HttpResponse, TeamdeskError> {
    protect_reminder_processing_route(&http_req, query.secret.as_deref(), &ctx)?;

    let usecase = ProcessTaskRemindersUseCase {};
    execute(usecase, &ctx)
        .await
        .map(|processed| HttpResponse::Ok().json(APIResponse::new(processed)))
        .map_err(|e| match e {
            UseCaseErrors::StorageError => {
                TeamdeskError::StorageError("Failed to load reminders".into())
            }
        })
}

/// One sweep over the due `TaskReminder`s. Every reminder the sweep manages to
/// claim is either followed up on or retired.
#[derive(Debug)]
pub struct ProcessTaskRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessTaskRemindersUseCase {
    /// Number of reminders that were decided on
    type Response = usize;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "ProcessTaskReminders";

    async fn execute(&mut self, ctx: &TeamdeskContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .reminders
            .select_due(now, ctx.config.reminder_sweep_batch_size)
            .await
            .map_err(|e| {
                error!("Unable to load due task reminders: {:?}", e);
                UseCaseErrors::StorageError
            })?;

        let mut processed = 0;
        for reminder in &due {
            if process_reminder(&reminder.id, now, ctx).await {
                processed += 1;
            }
        }

        info!(
            "Processed {} of {} due task reminder(s)",
            processed,
            due.len()
        );
        Ok(processed)
    }
}

/// Returns false when the reminder was left untouched by this sweep
async fn process_reminder(reminder_id: &ID, now: i64, ctx: &TeamdeskContext) -> bool {
    let lease_until = now + ctx.config.reminder_claim_lease_millis;
    let mut reminder = match ctx.repos.reminders.claim(reminder_id, now, lease_until).await {
        Ok(Some(reminder)) => reminder,
        Ok(None) => {
            debug!(
                "Task reminder: {} was already claimed or is no longer due",
                reminder_id
            );
            return false;
        }
        Err(e) => {
            error!("Unable to claim task reminder: {}. Error: {:?}", reminder_id, e);
            return false;
        }
    };

    // Lookup failures keep the lease so the reminder is retried once it expires
    let target = match ctx
        .repos
        .users
        .find_notification_target(&reminder.user_id)
        .await
    {
        Ok(target) => target,
        Err(e) => {
            error!(
                "Unable to load user: {} for task reminder: {}. Error: {:?}",
                reminder.user_id, reminder.id, e
            );
            return false;
        }
    };

    match reminder.decide(target.as_ref()) {
        ReminderDecision::Retire(reason) => retire(&mut reminder, reason, now),
        ReminderDecision::Dispatch(handles) => {
            let live_task = match ctx.repos.tasks.find(&reminder.task_id).await {
                Ok(task) => task,
                Err(e) => {
                    error!(
                        "Unable to load task: {} for task reminder: {}. Error: {:?}",
                        reminder.task_id, reminder.id, e
                    );
                    return false;
                }
            };

            if live_task.as_ref().map_or(false, |task| task.is_completed()) {
                retire(&mut reminder, RetireReason::TaskCompleted, now);
            } else {
                follow_up(&mut reminder, &handles, live_task.as_ref(), now, ctx).await;
            }
        }
    }

    if let Err(e) = ctx.repos.reminders.save(&reminder).await {
        error!("Unable to save task reminder: {}. Error: {:?}", reminder.id, e);
    }
    true
}

async fn follow_up(
    reminder: &mut TaskReminder,
    handles: &[String],
    live_task: Option<&Task>,
    now: i64,
    ctx: &TeamdeskContext,
) {
    match MessageContext::resolve(
        &reminder.task_id,
        reminder.next_attempt(),
        live_task,
        &reminder.metadata,
    ) {
        Some(message_ctx) => {
            let message = message_ctx.render(ReminderKind::FollowUp);
            send_follow_up(reminder, handles, &message, now, ctx).await;
        }
        None => {
            warn!(
                "Task reminder: {} has no task data left to render a message from",
                reminder.id
            );
            retire(reminder, RetireReason::NothingToRender, now);
        }
    }
}

fn retire(reminder: &mut TaskReminder, reason: RetireReason, now: i64) {
    info!(
        "Retiring task reminder: {} for user: {}, reason: {:?}",
        reminder.id, reminder.user_id, reason
    );
    reminder.complete(now);
}

async fn send_follow_up(
    reminder: &mut TaskReminder,
    handles: &[String],
    message: &str,
    now: i64,
    ctx: &TeamdeskContext,
) {
    let outcome = ctx.dispatcher.send(handles, message).await;
    if outcome.is_complete_failure() {
        warn!(
            "Task reminder: {} could not be delivered to any of the {} chat(s) of user: {}",
            reminder.id, outcome.fail_count, reminder.user_id
        );
    } else if outcome.fail_count > 0 {
        warn!(
            "Task reminder: {} failed for {} of {} chat(s)",
            reminder.id,
            outcome.fail_count,
            handles.len()
        );
    }

    let log = NotificationLog::new(
        Some(reminder.id.clone()),
        reminder.task_id.clone(),
        reminder.user_id.clone(),
        ReminderKind::FollowUp,
        &outcome,
        now,
    );
    if let Err(e) = ctx.repos.notification_logs.insert(&log).await {
        warn!("Unable to write notification log for task reminder: {}. Error: {:?}", reminder.id, e);
    }

    reminder.record_dispatch(now);
}
