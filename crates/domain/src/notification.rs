use crate::{
    reminder::ReminderMetadata,
    shared::entity::{Entity, ID},
    task::Task,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The kind of message sent to an assignee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// Sent right away when the task is assigned
    Assigned,
    /// Sent by the reminder processor until the assignee reacts
    FollowUp,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "task_assigned",
            Self::FollowUp => "task_reminder",
        }
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown reminder kind: {0}")]
pub struct InvalidReminderKindError(String);

impl FromStr for ReminderKind {
    type Err = InvalidReminderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task_assigned" => Ok(Self::Assigned),
            "task_reminder" => Ok(Self::FollowUp),
            _ => Err(InvalidReminderKindError(s.to_string())),
        }
    }
}

/// Result of sending one message to several chat handles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub success_count: usize,
    pub fail_count: usize,
}

impl DispatchOutcome {
    pub fn is_complete_failure(&self) -> bool {
        self.success_count == 0 && self.fail_count > 0
    }
}

/// Audit trail entry for every message that was dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationLog {
    pub id: ID,
    /// Not set for the notice sent at assignment time
    pub reminder_id: Option<ID>,
    pub task_id: ID,
    pub user_id: ID,
    pub kind: ReminderKind,
    pub success_count: i64,
    pub fail_count: i64,
    pub created: i64,
}

impl NotificationLog {
    pub fn new(
        reminder_id: Option<ID>,
        task_id: ID,
        user_id: ID,
        kind: ReminderKind,
        outcome: &DispatchOutcome,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            reminder_id,
            task_id,
            user_id,
            kind,
            success_count: outcome.success_count as i64,
            fail_count: outcome.fail_count as i64,
            created: now,
        }
    }
}

impl Entity for NotificationLog {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Everything a reminder message can mention
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageContext {
    pub task_id: ID,
    pub task_title: Option<String>,
    pub assigned_by_name: Option<String>,
    pub assignee_names: Vec<String>,
    pub project_name: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    /// Follow up number, starting at 1
    pub attempt: i64,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl MessageContext {
    /// Builds the context from the live `Task`, falling back to the metadata
    /// snapshot for every field the live data does not have.
    ///
    /// Returns `None` when there is nothing to say about the task: it no longer
    /// exists and nothing was captured when the reminder was scheduled.
    pub fn resolve(
        task_id: &ID,
        attempt: i64,
        live: Option<&Task>,
        metadata: &ReminderMetadata,
    ) -> Option<Self> {
        if live.is_none() && metadata.is_empty() {
            return None;
        }

        Some(Self {
            task_id: task_id.clone(),
            task_title: non_blank(live.map(|t| &t.title))
                .or_else(|| non_blank(metadata.task_title.as_ref())),
            assigned_by_name: non_blank(live.and_then(|t| t.assigned_by_name.as_ref()))
                .or_else(|| non_blank(metadata.assigned_by_name.as_ref())),
            assignee_names: metadata.assignee_names.clone(),
            project_name: non_blank(live.and_then(|t| t.project_name.as_ref()))
                .or_else(|| non_blank(metadata.project_name.as_ref())),
            priority: non_blank(live.and_then(|t| t.priority.as_ref()))
                .or_else(|| non_blank(metadata.priority.as_ref())),
            due_date: non_blank(live.and_then(|t| t.due_date.as_ref()))
                .or_else(|| non_blank(metadata.due_date.as_ref())),
            attempt,
        })
    }

    /// Renders the chat message. Lines for missing values are left out.
    pub fn render(&self, kind: ReminderKind) -> String {
        let title = match &self.task_title {
            Some(title) => format!("\"{}\"", title),
            None => "a task assigned to you".to_string(),
        };

        let mut lines = match kind {
            ReminderKind::Assigned => vec![format!("📌 New task: {}", title)],
            ReminderKind::FollowUp => vec![
                format!("⏰ Reminder #{}", self.attempt.max(1)),
                format!("You have not opened {} yet.", title),
            ],
        };

        if let Some(project_name) = &self.project_name {
            lines.push(format!("Project: {}", project_name));
        }
        if let Some(priority) = &self.priority {
            lines.push(format!("Priority: {}", priority));
        }
        if let Some(due_date) = &self.due_date {
            lines.push(format!("Due: {}", due_date));
        }
        if let Some(assigned_by_name) = &self.assigned_by_name {
            lines.push(format!("Assigned by: {}", assigned_by_name));
        }
        if !self.assignee_names.is_empty() {
            lines.push(format!("Assignees: {}", self.assignee_names.join(", ")));
        }
        lines.push(format!("Task ID: {}", self.task_id));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ReminderMetadata {
        ReminderMetadata {
            task_title: Some("Snapshot title".into()),
            priority: Some("high".into()),
            project_name: Some("Office move".into()),
            assignee_names: vec!["Ann".into(), "Bob".into()],
            assigned_by_name: Some("Carol".into()),
            due_date: Some("2024-05-31".into()),
        }
    }

    #[test]
    fn live_task_fields_take_priority_over_metadata() {
        let mut task = Task::new("Live title".into(), 0);
        task.priority = Some("low".into());

        let ctx = MessageContext::resolve(&task.id, 2, Some(&task), &metadata()).unwrap();
        assert_eq!(ctx.task_title.as_deref(), Some("Live title"));
        assert_eq!(ctx.priority.as_deref(), Some("low"));
        assert_eq!(ctx.project_name.as_deref(), Some("Office move"));
        assert_eq!(ctx.assigned_by_name.as_deref(), Some("Carol"));
        assert_eq!(ctx.assignee_names, vec!["Ann".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn blank_live_title_falls_back_to_metadata() {
        let task = Task::new("   ".into(), 0);
        let ctx = MessageContext::resolve(&task.id, 1, Some(&task), &metadata()).unwrap();
        assert_eq!(ctx.task_title.as_deref(), Some("Snapshot title"));
    }

    #[test]
    fn nothing_to_resolve_without_task_and_metadata() {
        let task_id = ID::new();
        assert!(MessageContext::resolve(&task_id, 1, None, &Default::default()).is_none());
        assert!(MessageContext::resolve(&task_id, 1, None, &metadata()).is_some());
    }

    #[test]
    fn renders_generic_wording_with_only_task_id() {
        let ctx = MessageContext {
            task_id: ID::new(),
            attempt: 1,
            ..Default::default()
        };
        let message = ctx.render(ReminderKind::FollowUp);
        assert_eq!(
            message,
            format!(
                "⏰ Reminder #1\nYou have not opened a task assigned to you yet.\nTask ID: {}",
                ctx.task_id
            )
        );
        assert_eq!(message, ctx.render(ReminderKind::FollowUp));
    }

    #[test]
    fn renders_all_known_fields() {
        let task_id = ID::new();
        let ctx = MessageContext::resolve(&task_id, 3, None, &metadata()).unwrap();
        let message = ctx.render(ReminderKind::FollowUp);
        assert!(message.starts_with("⏰ Reminder #3\n"));
        assert!(message.contains("\"Snapshot title\""));
        assert!(message.contains("Project: Office move"));
        assert!(message.contains("Priority: high"));
        assert!(message.contains("Due: 2024-05-31"));
        assert!(message.contains("Assigned by: Carol"));
        assert!(message.contains("Assignees: Ann, Bob"));

        let message = ctx.render(ReminderKind::Assigned);
        assert!(message.starts_with("📌 New task: \"Snapshot title\""));
    }

    #[test]
    fn reminder_kind_round_trips_through_its_name() {
        for kind in [ReminderKind::Assigned, ReminderKind::FollowUp] {
            assert_eq!(kind.as_str().parse::<ReminderKind>().unwrap(), kind);
        }
        assert!("webhook".parse::<ReminderKind>().is_err());
    }
}
