use axum::{extract::rejection::JsonRejection, http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

use crate::{
    data_access::data_error::DataError,
    error_response::ErrorResponse,
    services::task_reordering::ReorderError,
    shared::validation::FieldErrors,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input")]
    Validation(FieldErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut body = ErrorResponse::new(self.to_string());
        if let ApiError::Validation(errors) = self {
            body.fields = errors.into();
        }
        (status, Json(body)).into_response()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<DataError> for ApiError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::TaskNotFound(_) => ApiError::NotFound(e.to_string()),
            DataError::DuplicateTask(_) => ApiError::Conflict(e.to_string()),
            DataError::InvalidParent { .. } => ApiError::BadRequest(e.to_string()),
            DataError::Redb(_) | DataError::Encode(_) | DataError::Decode(_) => {
                ApiError::Internal(format!("Storage error: {e}"))
            }
        }
    }
}

impl From<ReorderError> for ApiError {
    fn from(e: ReorderError) -> Self {
        match e {
            ReorderError::NotFound(_) => ApiError::NotFound(e.to_string()),
            ReorderError::Storage(_) => ApiError::Internal(e.to_string()),
            ReorderError::Empty
            | ReorderError::MalformedTaskId(_)
            | ReorderError::DuplicateTaskId(_)
            | ReorderError::NegativeOrder { .. }
            | ReorderError::ScopeMismatch { .. } => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Worker failed: {e}"))
    }
}
