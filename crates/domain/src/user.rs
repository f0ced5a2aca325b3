use crate::shared::entity::{Entity, ID};

/// A `User` of the team management application as far as reminders
/// are concerned: who they are and where they can be reached.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub display_name: Option<String>,
    pub telegram_notifications_enabled: bool,
    pub telegram_chat_ids: Vec<String>,
    pub last_login_at: Option<i64>,
}

impl User {
    pub fn new() -> Self {
        Self {
            id: Default::default(),
            display_name: None,
            telegram_notifications_enabled: true,
            telegram_chat_ids: Vec::new(),
            last_login_at: None,
        }
    }

    pub fn notification_target(&self) -> NotificationTarget {
        NotificationTarget {
            user_id: self.id.clone(),
            display_name: self.display_name.clone(),
            notifications_enabled: self.telegram_notifications_enabled,
            chat_ids: self.telegram_chat_ids.clone(),
            last_login_at: self.last_login_at,
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Where and whether a `User` wants to receive notifications
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationTarget {
    pub user_id: ID,
    pub display_name: Option<String>,
    pub notifications_enabled: bool,
    pub chat_ids: Vec<String>,
    pub last_login_at: Option<i64>,
}

impl NotificationTarget {
    /// Chat handles that are actually set
    pub fn handles(&self) -> Vec<String> {
        self.chat_ids
            .iter()
            .map(|chat_id| chat_id.trim())
            .filter(|chat_id| !chat_id.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn is_deliverable(&self) -> bool {
        self.notifications_enabled && !self.handles().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_chat_ids_are_not_deliverable() {
        let mut user = User::new();
        assert!(!user.notification_target().is_deliverable());

        user.telegram_chat_ids = vec!["".into(), " 42 ".into()];
        let target = user.notification_target();
        assert_eq!(target.handles(), vec!["42".to_string()]);
        assert!(target.is_deliverable());

        user.telegram_notifications_enabled = false;
        assert!(!user.notification_target().is_deliverable());
    }
}
