use chrono::{DateTime, Utc};

use crate::filter::Where;
use crate::models::{Entity, Task, TaskPriority, TaskStatus};

entity_store!(TaskStore, Task);

impl TaskStore {
    pub fn by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.items().iter().filter(|t| t.status == status).collect()
    }

    pub fn by_priority(&self, priority: TaskPriority) -> Vec<&Task> {
        self.items().iter().filter(|t| t.priority == priority).collect()
    }

    pub fn by_assignee(&self, user_id: &str) -> Vec<&Task> {
        self.find(Where::new().eq("assigned_to_id", user_id))
    }

    pub fn by_property(&self, property_id: &str) -> Vec<&Task> {
        self.find(Where::new().eq("property_id", property_id))
    }

    /// Open tasks past their due date, most urgent first
    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<&Task> {
        let mut overdue: Vec<_> = self
            .items()
            .iter()
            .filter(|t| t.is_active() && t.is_overdue(now))
            .collect();
        overdue.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.due_date.cmp(&b.due_date)));
        overdue
    }

    pub fn due_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Task> {
        self.items()
            .iter()
            .filter(|t| t.due_date.is_some_and(|due| due >= start && due <= end))
            .collect()
    }

    pub fn complete_task(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        self.update_item(id, |task| {
            task.status = TaskStatus::Completed;
            task.completed_at = Some(at);
        })
    }

    pub fn active_tasks(&self) -> Vec<&Task> {
        self.active_items()
    }
}
