use serde::{Deserialize, Serialize};
use teamdesk_domain::{ReminderMetadata, Task, TaskReminder, ID};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskDTO {
    pub id: ID,
    pub title: String,
    pub priority: Option<String>,
    pub project_name: Option<String>,
    pub due_date: Option<String>,
    pub assigned_by_name: Option<String>,
    pub assignee_ids: Vec<ID>,
    pub completed_at: Option<i64>,
}

impl TaskDTO {
    pub fn new(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            priority: task.priority,
            project_name: task.project_name,
            due_date: task.due_date,
            assigned_by_name: task.assigned_by_name,
            assignee_ids: task.assignee_ids,
            completed_at: task.completed_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskReminderDTO {
    pub id: ID,
    pub task_id: ID,
    pub user_id: ID,
    pub initial_notification_at: i64,
    pub next_reminder_at: Option<i64>,
    pub last_reminder_sent_at: Option<i64>,
    pub reminder_attempts: i64,
    pub reminder_interval_minutes: i64,
    pub max_reminders: i64,
    pub completed_at: Option<i64>,
    pub metadata: ReminderMetadata,
    pub updated_at: i64,
}

impl TaskReminderDTO {
    pub fn new(reminder: TaskReminder) -> Self {
        Self {
            id: reminder.id,
            task_id: reminder.task_id,
            user_id: reminder.user_id,
            initial_notification_at: reminder.initial_notification_at,
            next_reminder_at: reminder.next_reminder_at,
            last_reminder_sent_at: reminder.last_reminder_sent_at,
            reminder_attempts: reminder.reminder_attempts,
            reminder_interval_minutes: reminder.reminder_interval_minutes,
            max_reminders: reminder.max_reminders,
            completed_at: reminder.completed_at,
            metadata: reminder.metadata,
            updated_at: reminder.updated_at,
        }
    }
}
