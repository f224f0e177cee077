use serde::{Deserialize, Serialize};

/// One entry of a reorder request. The id stays a string until the reordering
/// service parses it, so a bad id is reported by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOrderUpdate {
    pub task_id: String,
    pub order: i32,
}

impl TaskOrderUpdate {
    pub fn new(task_id: impl Into<String>, order: i32) -> Self {
        Self { task_id: task_id.into(), order }
    }
}
