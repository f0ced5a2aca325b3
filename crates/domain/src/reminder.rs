use crate::{
    shared::entity::{Entity, ID},
    user::NotificationTarget,
};
use serde::{Deserialize, Serialize};

pub const MILLIS_PER_MINUTE: i64 = 1000 * 60;

/// Snapshot of the assignment context taken when the `TaskReminder`s are scheduled.
///
/// The live `Task` is preferred when rendering a reminder, these values only
/// fill in whatever the live data is missing (e.g. the task has been deleted).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderMetadata {
    #[serde(default)]
    pub task_title: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub assignee_names: Vec<String>,
    #[serde(default)]
    pub assigned_by_name: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl ReminderMetadata {
    pub fn is_empty(&self) -> bool {
        self.task_title.is_none()
            && self.priority.is_none()
            && self.project_name.is_none()
            && self.assignee_names.is_empty()
            && self.assigned_by_name.is_none()
            && self.due_date.is_none()
    }
}

/// `minutes` after `now`, saturating instead of overflowing
fn minutes_after(now: i64, minutes: i64) -> i64 {
    now.saturating_add(minutes.saturating_mul(MILLIS_PER_MINUTE))
}

/// How often and how many times an assignee is reminded about a task
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderPolicy {
    /// Delay between the assignment and the first follow up reminder
    pub first_reminder_delay_minutes: i64,
    /// Delay between two consecutive follow up reminders
    pub reminder_interval_minutes: i64,
    /// Maximum number of follow up reminders. Zero or negative means unlimited.
    pub max_reminders: i64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            first_reminder_delay_minutes: 30,
            reminder_interval_minutes: 60,
            max_reminders: 12,
        }
    }
}

/// A `TaskReminder` tracks the outstanding follow up notices one `User`
/// gets about one `Task` that was assigned to them.
///
/// There is at most one `TaskReminder` per (task, user) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReminder {
    pub id: ID,
    pub task_id: ID,
    pub user_id: ID,
    /// When the assignment notice was sent
    pub initial_notification_at: i64,
    /// When the processor should act on this reminder next. `None` means never.
    pub next_reminder_at: Option<i64>,
    pub last_reminder_sent_at: Option<i64>,
    /// Number of follow up reminders dispatched so far
    pub reminder_attempts: i64,
    pub reminder_interval_minutes: i64,
    pub max_reminders: i64,
    pub completed_at: Option<i64>,
    /// Lease held by the sweep currently acting on this reminder
    pub processing_until: Option<i64>,
    pub metadata: ReminderMetadata,
    pub created: i64,
    pub updated_at: i64,
}

/// Why a `TaskReminder` was retired without sending anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireReason {
    /// The user has notifications turned off or no chat to deliver to
    NoDeliverableTarget,
    /// The user logged in after the last notice was sent
    UserAlreadyActed,
    /// `max_reminders` follow ups have already been sent
    AttemptsExhausted,
    /// Not enough data left to render a message from
    NothingToRender,
    /// The task was completed but its reminders were not retired with it
    TaskCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderDecision {
    Retire(RetireReason),
    /// Send a follow up to these chat handles
    Dispatch(Vec<String>),
}

impl TaskReminder {
    pub fn new(
        task_id: ID,
        user_id: ID,
        metadata: ReminderMetadata,
        policy: &ReminderPolicy,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            task_id,
            user_id,
            initial_notification_at: now,
            next_reminder_at: Some(minutes_after(now, policy.first_reminder_delay_minutes)),
            last_reminder_sent_at: Some(now),
            reminder_attempts: 0,
            reminder_interval_minutes: policy.reminder_interval_minutes,
            max_reminders: policy.max_reminders,
            completed_at: None,
            processing_until: None,
            metadata,
            created: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_capped(&self) -> bool {
        self.max_reminders > 0
    }

    pub fn is_due(&self, now: i64) -> bool {
        !self.is_completed() && matches!(self.next_reminder_at, Some(at) if at <= now)
    }

    /// A due reminder can be claimed unless another sweep holds an unexpired lease on it
    pub fn is_claimable(&self, now: i64) -> bool {
        self.is_due(now) && !matches!(self.processing_until, Some(until) if until > now)
    }

    /// The most recent moment the user was told about the task
    pub fn last_notified_at(&self) -> i64 {
        match self.last_reminder_sent_at {
            Some(sent_at) => sent_at.max(self.initial_notification_at),
            None => self.initial_notification_at,
        }
    }

    /// The attempt number the next dispatched follow up will have
    pub fn next_attempt(&self) -> i64 {
        self.reminder_attempts + 1
    }

    /// Decides what a sweep should do with this reminder. The first matching rule wins.
    pub fn decide(&self, target: Option<&NotificationTarget>) -> ReminderDecision {
        let target = match target {
            Some(target) if target.is_deliverable() => target,
            _ => return ReminderDecision::Retire(RetireReason::NoDeliverableTarget),
        };

        if let Some(last_login_at) = target.last_login_at {
            if last_login_at > self.last_notified_at() {
                return ReminderDecision::Retire(RetireReason::UserAlreadyActed);
            }
        }

        if self.is_capped() && self.reminder_attempts >= self.max_reminders {
            return ReminderDecision::Retire(RetireReason::AttemptsExhausted);
        }

        ReminderDecision::Dispatch(target.handles())
    }

    /// Moves the reminder into its terminal state. Calling it on an
    /// already completed reminder keeps the original completion time.
    pub fn complete(&mut self, now: i64) {
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.next_reminder_at = None;
        self.processing_until = None;
        self.updated_at = now;
    }

    /// Books a dispatched follow up and schedules the next one, or completes
    /// the reminder when the attempt budget is used up.
    pub fn record_dispatch(&mut self, now: i64) {
        self.reminder_attempts += 1;
        self.last_reminder_sent_at = Some(now);
        self.processing_until = None;
        self.updated_at = now;

        if self.is_capped() && self.reminder_attempts >= self.max_reminders {
            self.complete(now);
        } else {
            // Sub minute intervals would make every sweep dispatch again
            let interval = self.reminder_interval_minutes.max(1);
            self.next_reminder_at = Some(minutes_after(now, interval));
        }
    }
}

impl Entity for TaskReminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn reminder(policy: &ReminderPolicy) -> TaskReminder {
        TaskReminder::new(ID::new(), ID::new(), Default::default(), policy, NOW)
    }

    fn target(user_id: &ID) -> NotificationTarget {
        NotificationTarget {
            user_id: user_id.clone(),
            display_name: Some("Jane".into()),
            notifications_enabled: true,
            chat_ids: vec!["1001".into()],
            last_login_at: None,
        }
    }

    #[test]
    fn schedules_first_reminder_after_delay() {
        let r = reminder(&ReminderPolicy::default());
        assert_eq!(r.next_reminder_at, Some(NOW + 30 * MILLIS_PER_MINUTE));
        assert_eq!(r.reminder_attempts, 0);
        assert_eq!(r.reminder_interval_minutes, 60);
        assert_eq!(r.max_reminders, 12);
        assert!(!r.is_due(NOW));
        assert!(r.is_due(NOW + 30 * MILLIS_PER_MINUTE));
    }

    #[test]
    fn retires_without_deliverable_target() {
        let r = reminder(&ReminderPolicy::default());
        assert_eq!(
            r.decide(None),
            ReminderDecision::Retire(RetireReason::NoDeliverableTarget)
        );

        let mut t = target(&r.user_id);
        t.notifications_enabled = false;
        assert_eq!(
            r.decide(Some(&t)),
            ReminderDecision::Retire(RetireReason::NoDeliverableTarget)
        );

        let mut t = target(&r.user_id);
        t.chat_ids = vec!["  ".into()];
        assert_eq!(
            r.decide(Some(&t)),
            ReminderDecision::Retire(RetireReason::NoDeliverableTarget)
        );
    }

    #[test]
    fn retires_when_user_logged_in_after_last_notice() {
        let r = reminder(&ReminderPolicy::default());
        let mut t = target(&r.user_id);

        t.last_login_at = Some(NOW);
        assert_eq!(r.decide(Some(&t)), ReminderDecision::Dispatch(vec!["1001".into()]));

        t.last_login_at = Some(NOW + 1);
        assert_eq!(
            r.decide(Some(&t)),
            ReminderDecision::Retire(RetireReason::UserAlreadyActed)
        );
    }

    #[test]
    fn target_check_wins_over_login_check() {
        let r = reminder(&ReminderPolicy::default());
        let mut t = target(&r.user_id);
        t.notifications_enabled = false;
        t.last_login_at = Some(NOW + 1);
        assert_eq!(
            r.decide(Some(&t)),
            ReminderDecision::Retire(RetireReason::NoDeliverableTarget)
        );
    }

    #[test]
    fn retires_when_attempt_budget_is_exhausted() {
        let mut r = reminder(&ReminderPolicy::default());
        r.max_reminders = 2;
        r.reminder_attempts = 2;
        let t = target(&r.user_id);
        assert_eq!(
            r.decide(Some(&t)),
            ReminderDecision::Retire(RetireReason::AttemptsExhausted)
        );
    }

    #[test]
    fn completes_when_last_allowed_reminder_is_dispatched() {
        let mut r = reminder(&ReminderPolicy {
            max_reminders: 1,
            ..Default::default()
        });
        let now = NOW + 30 * MILLIS_PER_MINUTE;
        r.record_dispatch(now);

        assert_eq!(r.reminder_attempts, 1);
        assert_eq!(r.last_reminder_sent_at, Some(now));
        assert_eq!(r.completed_at, Some(now));
        assert_eq!(r.next_reminder_at, None);
        assert!(!r.is_due(now + 1000 * MILLIS_PER_MINUTE));
    }

    #[test]
    fn unlimited_reminders_keep_rescheduling() {
        let mut r = reminder(&ReminderPolicy {
            max_reminders: 0,
            ..Default::default()
        });
        let t = target(&r.user_id);
        let mut now = NOW + 30 * MILLIS_PER_MINUTE;
        for _ in 0..100 {
            assert_eq!(r.decide(Some(&t)), ReminderDecision::Dispatch(vec!["1001".into()]));
            r.record_dispatch(now);
            assert_eq!(r.next_reminder_at, Some(now + 60 * MILLIS_PER_MINUTE));
            now += 60 * MILLIS_PER_MINUTE;
        }
        assert_eq!(r.reminder_attempts, 100);
        assert!(!r.is_completed());
    }

    #[test]
    fn completion_time_is_never_overwritten() {
        let mut r = reminder(&ReminderPolicy::default());
        r.complete(NOW + 5);
        r.complete(NOW + 10);
        assert_eq!(r.completed_at, Some(NOW + 5));
        assert_eq!(r.next_reminder_at, None);
        assert_eq!(r.updated_at, NOW + 10);
    }

    #[test]
    fn leased_reminder_is_not_claimable_until_lease_expires() {
        let mut r = reminder(&ReminderPolicy::default());
        let now = NOW + 30 * MILLIS_PER_MINUTE;
        assert!(r.is_claimable(now));
        r.processing_until = Some(now + 1000);
        assert!(!r.is_claimable(now));
        assert!(r.is_claimable(now + 1001));
    }

    #[test]
    fn huge_delays_saturate_instead_of_overflowing() {
        let policy = ReminderPolicy {
            first_reminder_delay_minutes: i64::MAX / 1000,
            reminder_interval_minutes: i64::MAX,
            max_reminders: 0,
        };
        let mut r = reminder(&policy);
        assert_eq!(r.next_reminder_at, Some(i64::MAX));
        assert!(!r.is_due(NOW));

        r.record_dispatch(NOW);
        assert_eq!(r.next_reminder_at, Some(i64::MAX));
        assert!(!r.is_due(NOW + 1000 * MILLIS_PER_MINUTE));
    }

    #[test]
    fn metadata_deserializes_with_missing_fields() {
        let metadata: ReminderMetadata =
            serde_json::from_str(r#"{"taskTitle":"Quarterly report"}"#).unwrap();
        assert_eq!(metadata.task_title.as_deref(), Some("Quarterly report"));
        assert!(metadata.assignee_names.is_empty());
        assert!(!metadata.is_empty());
        assert!(ReminderMetadata::default().is_empty());
    }
}
