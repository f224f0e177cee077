//! Manual reordering of sibling tasks.
//!
//! A reorder request is a list of `(task id, new order)` pairs. It is applied
//! only when every listed task belongs to the caller and all of them share
//! the project and parent task of the first entry. Validation and the write
//! run inside one store transaction, so either every order changes or none.

use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use crate::{
    data_access::{data_context::DataContext, data_error::DataError, task_batch::TaskBatch},
    reorder_tasks_request::TaskOrderUpdate,
    settings::Settings,
    task_scope::{ScopeField, TaskScope},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReorderOptions {
    pub validate_non_negative_order: bool,
}

impl From<&Settings> for ReorderOptions {
    fn from(settings: &Settings) -> Self {
        Self { validate_non_negative_order: settings.validate_non_negative_order }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("nothing to reorder")]
    Empty,
    #[error("invalid task id '{0}'")]
    MalformedTaskId(String),
    #[error("task {0} is listed more than once")]
    DuplicateTaskId(Uuid),
    #[error("order {order} for task {task_id} must not be negative")]
    NegativeOrder { task_id: Uuid, order: i32 },
    #[error("task {0} not found")]
    NotFound(Uuid),
    #[error("task {task_id} does not share the {field} of the tasks being reordered")]
    ScopeMismatch { task_id: Uuid, field: ScopeField },
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<DataError> for ReorderError {
    fn from(e: DataError) -> Self {
        ReorderError::Storage(e.to_string())
    }
}

#[derive(Clone)]
pub struct TaskReorderingService {
    data_context: DataContext,
    options: ReorderOptions,
}

impl TaskReorderingService {
    pub fn new(data_context: DataContext, options: ReorderOptions) -> Self {
        Self { data_context, options }
    }

    /// Rewrites the order of the listed sibling tasks of `owner_id`, all or nothing.
    /// Returns how many tasks were updated.
    #[tracing::instrument(skip_all, fields(owner_id = %owner_id, count = updates.len()))]
    pub fn reorder_sibling_tasks(&self, owner_id: Uuid, updates: &[TaskOrderUpdate]) -> Result<usize, ReorderError> {
        let result = self.apply(owner_id, updates);
        match &result {
            Ok(updated) => tracing::info!(updated, "reordered sibling tasks"),
            Err(ReorderError::Storage(e)) => tracing::error!(error = %e, "task reorder failed"),
            Err(e) => tracing::warn!(reason = %e, "task reorder rejected"),
        }
        result
    }

    /// Parse, scope check and scoped write share one write transaction.
    ///
    /// The written-count comparison is a guard only: every row was checked
    /// against owner and scope earlier in the same transaction, so a short
    /// count means the store broke that invariant. The batch is then aborted
    /// and reported as a storage failure.
    fn apply(&self, owner_id: Uuid, updates: &[TaskOrderUpdate]) -> Result<usize, ReorderError> {
        let orders = parse_updates(updates, self.options)?;

        let batch = self.data_context.begin_task_batch()?;
        let scope = resolve_sibling_scope(&batch, owner_id, &orders)?;

        let written = batch.write_sibling_orders(owner_id, &scope, &orders)?;
        if written != orders.len() as u64 {
            batch.abort()?;
            return Err(ReorderError::Storage(format!(
                "order update matched {written} of {} tasks",
                orders.len()
            )));
        }

        batch.commit()?;
        Ok(orders.len())
    }
}

/// Input checks that need no storage: non-empty, well-formed and distinct ids,
/// and optionally non-negative orders.
pub fn parse_updates(updates: &[TaskOrderUpdate], options: ReorderOptions) -> Result<Vec<(Uuid, i32)>, ReorderError> {
    if updates.is_empty() {
        return Err(ReorderError::Empty);
    }

    let mut seen = HashSet::with_capacity(updates.len());
    let mut orders = Vec::with_capacity(updates.len());
    for update in updates {
        let task_id = Uuid::parse_str(update.task_id.trim())
            .map_err(|_| ReorderError::MalformedTaskId(update.task_id.clone()))?;
        if !seen.insert(task_id) {
            return Err(ReorderError::DuplicateTaskId(task_id));
        }
        if options.validate_non_negative_order && update.order < 0 {
            return Err(ReorderError::NegativeOrder { task_id, order: update.order });
        }
        orders.push((task_id, update.order));
    }
    Ok(orders)
}

/// The first task fixes the scope; every other task must be owned and match it.
fn resolve_sibling_scope(batch: &TaskBatch, owner_id: Uuid, orders: &[(Uuid, i32)]) -> Result<TaskScope, ReorderError> {
    let (first_id, _) = orders[0];
    let scope = batch
        .owned_task(owner_id, first_id)?
        .ok_or(ReorderError::NotFound(first_id))?
        .scope();

    for &(task_id, _) in &orders[1..] {
        let task = batch
            .owned_task(owner_id, task_id)?
            .ok_or(ReorderError::NotFound(task_id))?;
        if let Some(field) = scope.divergence(&task.scope()) {
            return Err(ReorderError::ScopeMismatch { task_id, field });
        }
    }
    Ok(scope)
}
