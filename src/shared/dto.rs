// Requests
pub mod create_task_request;
pub mod edit_task_request;
pub mod reorder_tasks_request;


// Responses
pub mod message_response;
pub mod error_response;
