use std::fmt;
use uuid::Uuid;

/// Null-aware equality for optional references.
///
/// Two absent values are equal, an absent and a present value never are,
/// and two present values are equal when the values themselves are.
pub fn nullable_eq<T: PartialEq>(left: Option<&T>, right: Option<&T>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}

/// The sibling group a task lives in, below its owner: the project (none = inbox)
/// and the parent task (none = top level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskScope {
    pub project_id: Option<Uuid>,
    pub parent_task_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeField {
    Project,
    ParentTask,
}

impl fmt::Display for ScopeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeField::Project => write!(f, "project_id"),
            ScopeField::ParentTask => write!(f, "parent_task_id"),
        }
    }
}

impl TaskScope {
    pub fn new(project_id: Option<Uuid>, parent_task_id: Option<Uuid>) -> Self {
        Self { project_id, parent_task_id }
    }

    /// First field on which `other` leaves this scope, project checked before parent.
    pub fn divergence(&self, other: &TaskScope) -> Option<ScopeField> {
        if !nullable_eq(self.project_id.as_ref(), other.project_id.as_ref()) {
            return Some(ScopeField::Project);
        }
        if !nullable_eq(self.parent_task_id.as_ref(), other.parent_task_id.as_ref()) {
            return Some(ScopeField::ParentTask);
        }
        None
    }

    pub fn contains(&self, other: &TaskScope) -> bool {
        self.divergence(other).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_absent_are_equal() {
        assert!(nullable_eq::<Uuid>(None, None));
    }

    #[test]
    fn absent_and_present_differ_either_way() {
        let id = Uuid::new_v4();
        assert!(!nullable_eq(Some(&id), None));
        assert!(!nullable_eq(None, Some(&id)));
    }

    #[test]
    fn present_values_compare_by_value() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(nullable_eq(Some(&a), Some(&a.clone())));
        assert!(!nullable_eq(Some(&a), Some(&b)));
    }

    #[test]
    fn divergence_names_the_project_first() {
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let base = TaskScope::new(Some(p1), None);

        assert_eq!(base.divergence(&TaskScope::new(Some(p1), None)), None);
        assert_eq!(base.divergence(&TaskScope::new(Some(p2), Some(parent))), Some(ScopeField::Project));
        assert_eq!(base.divergence(&TaskScope::new(None, None)), Some(ScopeField::Project));
        assert_eq!(base.divergence(&TaskScope::new(Some(p1), Some(parent))), Some(ScopeField::ParentTask));
    }

    #[test]
    fn inbox_top_level_scope_contains_itself() {
        let inbox = TaskScope::new(None, None);
        assert!(inbox.contains(&TaskScope::new(None, None)));
    }
}
