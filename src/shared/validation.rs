//! Field-level input checks. Request bodies derive [`Validate`]; the helpers
//! here fold validator's per-field error lists into one message per field
//! and add the checks that need the task id from the path.

use std::{borrow::Cow, collections::BTreeMap, fmt};

use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{create_task_request::CreateTaskRequest, edit_task_request::EditTaskRequest};

pub const MAX_CONTENT_LENGTH: usize = 500;
pub const MAX_LABEL_LENGTH: usize = 64;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Content is required"));
    }
    Ok(())
}

pub(crate) fn not_nil(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(invalid("required", "Task id is required"));
    }
    Ok(())
}

pub(crate) fn valid_labels(labels: &[String]) -> Result<(), ValidationError> {
    if labels.iter().any(|l| l.trim().is_empty()) {
        return Err(invalid("blank_label", "Labels must not be empty"));
    }
    if labels.iter().any(|l| l.chars().count() > MAX_LABEL_LENGTH) {
        return Err(invalid("label_length", "Labels must be at most 64 characters"));
    }
    Ok(())
}

/// Field -> message map, one message per field. The first message recorded
/// for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }

    fn check_parent(&mut self, task_id: Uuid, parent_task_id: Option<Uuid>) {
        if parent_task_id == Some(task_id) {
            self.add("parent_task_id", "A task cannot be its own parent");
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            if let Some(first) = list.first() {
                let message = first.message.as_ref().unwrap_or(&first.code);
                fields.add(field.to_string(), message.to_string());
            }
        }
        fields
    }
}

impl From<FieldErrors> for BTreeMap<String, String> {
    fn from(errors: FieldErrors) -> Self {
        errors.fields
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, message)| format!("{field}: {message}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

fn field_errors(result: Result<(), validator::ValidationErrors>) -> FieldErrors {
    result.err().map(FieldErrors::from).unwrap_or_default()
}

pub fn validate_create_task(request: &CreateTaskRequest) -> Result<(), FieldErrors> {
    let mut errors = field_errors(request.validate());
    errors.check_parent(request.task_id, request.parent_task_id);
    errors.into_result()
}

pub fn validate_edit_task(task_id: Uuid, request: &EditTaskRequest) -> Result<(), FieldErrors> {
    let mut errors = field_errors(request.validate());
    errors.check_parent(task_id, request.parent_task_id);
    errors.into_result()
}
