use crate::shared::entity::{Entity, ID};

/// The parts of a team `Task` the reminder engine reads
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: ID,
    pub title: String,
    pub priority: Option<String>,
    pub project_name: Option<String>,
    /// Due date as entered by the task author, e.g. `2024-05-31`
    pub due_date: Option<String>,
    pub assigned_by_name: Option<String>,
    pub assignee_ids: Vec<ID>,
    pub completed_at: Option<i64>,
    pub created: i64,
    pub updated: i64,
}

impl Task {
    pub fn new(title: String, now: i64) -> Self {
        Self {
            id: Default::default(),
            title,
            priority: None,
            project_name: None,
            due_date: None,
            assigned_by_name: None,
            assignee_ids: Vec::new(),
            completed_at: None,
            created: now,
            updated: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Adds the given users as assignees and returns the ones that were not
    /// assigned before, in the order they were given.
    pub fn assign(&mut self, user_ids: &[ID], now: i64) -> Vec<ID> {
        let mut added = Vec::new();
        for user_id in user_ids {
            if !self.assignee_ids.contains(user_id) {
                self.assignee_ids.push(user_id.clone());
                added.push(user_id.clone());
            }
        }
        self.updated = now;
        added
    }

    /// Returns false if the task was already completed
    pub fn complete(&mut self, now: i64) -> bool {
        if self.is_completed() {
            return false;
        }
        self.completed_at = Some(now);
        self.updated = now;
        true
    }
}

impl Entity for Task {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_returns_only_new_assignees() {
        let mut task = Task::new("Order printer paper".into(), 0);
        let u1 = ID::new();
        let u2 = ID::new();

        assert_eq!(task.assign(&[u1.clone()], 10), vec![u1.clone()]);
        assert_eq!(task.assign(&[u1.clone(), u2.clone(), u2.clone()], 20), vec![u2.clone()]);
        assert_eq!(task.assignee_ids, vec![u1, u2]);
        assert_eq!(task.updated, 20);
    }

    #[test]
    fn completes_once() {
        let mut task = Task::new("Book the van".into(), 0);
        assert!(task.complete(5));
        assert!(!task.complete(9));
        assert_eq!(task.completed_at, Some(5));
    }
}
