use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::task_priority::TaskPriority;

/// Full replacement of the editable fields; `order` and completion are left alone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditTaskRequest {
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub parent_task_id: Option<Uuid>,
    #[validate(
        custom(function = "crate::validation::not_blank"),
        length(max = 500, message = "Content must be at most 500 characters")
    )]
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::valid_labels"))]
    pub labels: Vec<String>,
}
