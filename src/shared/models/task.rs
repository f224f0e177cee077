use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{create_task_request::CreateTaskRequest, edit_task_request::EditTaskRequest, task_priority::TaskPriority, task_scope::TaskScope};

/// One user-owned unit of work. Stored as-is and returned as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub parent_task_id: Option<Uuid>,
    pub content: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub due_datetime: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    /// Only meaningful among siblings; ties fall back to `created_at`.
    pub order: i32,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(owner_id: Uuid, request: CreateTaskRequest, now: DateTime<Utc>) -> Self {
        Self {
            task_id: request.task_id,
            user_id: owner_id,
            project_id: request.project_id,
            parent_task_id: request.parent_task_id,
            content: request.content.trim().to_string(),
            description: request.description.unwrap_or_default(),
            due_date: request.due_date,
            due_datetime: request.due_datetime,
            priority: request.priority.unwrap_or_default(),
            is_completed: false,
            completed_at: None,
            order: request.order.unwrap_or(0),
            labels: request.labels,
            created_at: now,
        }
    }

    /// Replaces every client-editable field. Ownership, completion and order stay put.
    pub fn edit(self, request: EditTaskRequest) -> Self {
        Self {
            project_id: request.project_id,
            parent_task_id: request.parent_task_id,
            content: request.content.trim().to_string(),
            description: request.description.unwrap_or_default(),
            due_date: request.due_date,
            due_datetime: request.due_datetime,
            priority: request.priority.unwrap_or_default(),
            labels: request.labels,
            ..self
        }
    }

    pub fn toggle_completed(self, now: DateTime<Utc>) -> Self {
        let is_completed = !self.is_completed;
        Self {
            is_completed,
            completed_at: if is_completed { Some(now) } else { None },
            ..self
        }
    }

    pub fn scope(&self) -> TaskScope {
        TaskScope::new(self.project_id, self.parent_task_id)
    }
}
