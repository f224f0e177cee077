use std::sync::Arc;
use crate::{data_access::data_context::DataContext, services::task_reordering::TaskReorderingService, settings::Settings};

pub struct AppState {
    pub data_context: DataContext,
    pub task_reordering: TaskReorderingService,
    pub settings: Settings,
}

impl AppState {
    pub fn new(data_context: DataContext, settings: Settings) -> Self {
        let task_reordering = TaskReorderingService::new(data_context.clone(), (&settings).into());
        Self { data_context, task_reordering, settings }
    }
}

pub type SharedState = Arc<AppState>;
