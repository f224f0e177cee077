use axum::{Extension, Json, extract::{Path, State}, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api_error::ApiError,
    app_state::SharedState,
    authentication::auth::AuthenticatedOwner,
    create_task_request::CreateTaskRequest,
    edit_task_request::EditTaskRequest,
    message_response::MessageResponse,
    reorder_tasks_request::TaskOrderUpdate,
    shared::validation::{validate_create_task, validate_edit_task},
    task::Task,
    web_api::json_body::JsonBody,
};

/// Store calls block on disk I/O, so they run off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

pub struct TaskController {}

impl TaskController {
    pub async fn get_all(
        State(state): State<SharedState>,
        Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
    ) -> Result<Json<Vec<Task>>, ApiError> {
        let tasks = blocking(move || Ok(state.data_context.list_tasks(owner_id)?)).await?;
        Ok(Json(tasks))
    }

    pub async fn get(
        State(state): State<SharedState>,
        Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
        Path(task_id): Path<Uuid>,
    ) -> Result<Json<Task>, ApiError> {
        blocking(move || {
            state.data_context.get_task(owner_id, task_id)?
                .map(Json)
                .ok_or_else(|| ApiError::NotFound(format!("task {task_id} not found")))
        }).await
    }

    pub async fn add(
        State(state): State<SharedState>,
        Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
        JsonBody(body): JsonBody<CreateTaskRequest>,
    ) -> Result<(StatusCode, Json<MessageResponse<Task>>), ApiError> {
        validate_create_task(&body)?;
        let task = Task::new(owner_id, body, Utc::now());
        let task = blocking(move || {
            state.data_context.create_task(&task)?;
            Ok(task)
        }).await?;

        tracing::info!(task_id = %task.task_id, owner_id = %owner_id, "task created");
        Ok((StatusCode::CREATED, Json(MessageResponse::with_data("Task added successfully", task))))
    }

    pub async fn edit(
        State(state): State<SharedState>,
        Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
        Path(task_id): Path<Uuid>,
        JsonBody(body): JsonBody<EditTaskRequest>,
    ) -> Result<Json<MessageResponse<Task>>, ApiError> {
        validate_edit_task(task_id, &body)?;
        let task = blocking(move || Ok(state.data_context.edit_task(owner_id, task_id, body)?)).await?;
        Ok(Json(MessageResponse::with_data("Task updated successfully", task)))
    }

    pub async fn toggle_complete(
        State(state): State<SharedState>,
        Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
        Path(task_id): Path<Uuid>,
    ) -> Result<Json<MessageResponse<Task>>, ApiError> {
        let task = blocking(move || Ok(state.data_context.toggle_task_completed(owner_id, task_id)?)).await?;
        Ok(Json(MessageResponse::with_data("Task status has been toggled", task)))
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
        Path(task_id): Path<Uuid>,
    ) -> Result<Json<MessageResponse<()>>, ApiError> {
        match blocking(move || Ok(state.data_context.delete_task(owner_id, task_id)?)).await? {
            0 => Err(ApiError::NotFound(format!("task {task_id} not found"))),
            removed => Ok(Json(MessageResponse::rows_affected("Task deleted successfully", removed))),
        }
    }

    pub async fn reorder(
        State(state): State<SharedState>,
        Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
        JsonBody(body): JsonBody<Vec<TaskOrderUpdate>>,
    ) -> Result<Json<MessageResponse<()>>, ApiError> {
        blocking(move || Ok(state.task_reordering.reorder_sibling_tasks(owner_id, &body)?)).await?;
        Ok(Json(MessageResponse::message("Task order updated successfully")))
    }
}
