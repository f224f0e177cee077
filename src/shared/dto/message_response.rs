use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

impl MessageResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), data: None, rows_affected: None }
    }

    pub fn rows_affected(message: impl Into<String>, rows_affected: u64) -> Self {
        Self { message: message.into(), data: None, rows_affected: Some(rows_affected) }
    }
}

impl<T: Serialize> MessageResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self { message: message.into(), data: Some(data), rows_affected: None }
    }
}
