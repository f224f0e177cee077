use serde::{Deserialize, Serialize};

/// Task priority as exchanged with clients: 1 (lowest) to 4 (urgent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum TaskPriority {
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl TryFrom<i16> for TaskPriority {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskPriority::Low),
            2 => Ok(TaskPriority::Medium),
            3 => Ok(TaskPriority::High),
            4 => Ok(TaskPriority::Urgent),
            other => Err(format!("priority must be between 1 and 4, got {other}")),
        }
    }
}

impl From<TaskPriority> for i16 {
    fn from(priority: TaskPriority) -> Self {
        priority as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_a_number() {
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "3");
        let parsed: TaskPriority = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, TaskPriority::Urgent);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(serde_json::from_str::<TaskPriority>("0").is_err());
        assert!(serde_json::from_str::<TaskPriority>("5").is_err());
    }
}
