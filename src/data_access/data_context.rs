//! Task Store on redb.
//!
//! `tasks` holds one postcard-encoded record per task id. `owner_tasks` is the
//! owner index (owner id -> task ids) used for listing and sub-task walks.
//! Every mutation is a single write transaction.

use chrono::Utc;
use redb::{Database, MultimapTableDefinition, ReadableMultimapTable, ReadableTable, TableDefinition};
use std::{collections::{HashMap, HashSet, VecDeque}, path::Path, sync::Arc};
use uuid::Uuid;

use crate::{data_access::{data_error::DataError, task_batch::TaskBatch}, edit_task_request::EditTaskRequest, task::Task};

pub(crate) const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");
pub(crate) const OWNER_TASKS_INDEX: MultimapTableDefinition<&[u8], &[u8]> = MultimapTableDefinition::new("owner_tasks");

#[derive(Clone)]
pub struct DataContext {
    db: Arc<Database>
}

impl DataContext {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let db = Database::create(path)?;
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TASKS_TABLE)?;
            let _ = write_txn.open_multimap_table(OWNER_TASKS_INDEX)?;
        }
        write_txn.commit()?;
        Ok(DataContext { db: Arc::new(db) })
    }

    pub fn create_task(&self, task: &Task) -> Result<(), DataError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let mut owner_index = write_txn.open_multimap_table(OWNER_TASKS_INDEX)?;

            if tasks_table.get(task.task_id.as_bytes().as_slice())?.is_some() {
                return Err(DataError::DuplicateTask(task.task_id));
            }
            if let Some(parent_task_id) = task.parent_task_id {
                if load_owned_task(&tasks_table, task.user_id, parent_task_id)?.is_none() {
                    return Err(DataError::InvalidParent { parent_task_id, reason: "parent task not found" });
                }
            }

            let task_bytes = encode_task(task)?;
            tasks_table.insert(task.task_id.as_bytes().as_slice(), task_bytes.as_slice())?;
            owner_index.insert(task.user_id.as_bytes().as_slice(), task.task_id.as_bytes().as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, DataError> {
        let read_txn = self.db.begin_read()?;
        let tasks_table = read_txn.open_table(TASKS_TABLE)?;
        load_owned_task(&tasks_table, owner_id, task_id)
    }

    /// All tasks of one owner, by `order` then `created_at`.
    pub fn list_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>, DataError> {
        let read_txn = self.db.begin_read()?;
        let tasks_table = read_txn.open_table(TASKS_TABLE)?;
        let owner_index = read_txn.open_multimap_table(OWNER_TASKS_INDEX)?;

        let mut tasks = Vec::new();
        for entry in owner_index.get(owner_id.as_bytes().as_slice())? {
            let task_id = decode_id(entry?.value())?;
            if let Some(task) = load_owned_task(&tasks_table, owner_id, task_id)? {
                tasks.push(task);
            }
        }

        tasks.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
        Ok(tasks)
    }

    pub fn edit_task(&self, owner_id: Uuid, task_id: Uuid, request: EditTaskRequest) -> Result<Task, DataError> {
        let write_txn = self.db.begin_write()?;
        let edited_task;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let task = load_owned_task(&tasks_table, owner_id, task_id)?
                .ok_or(DataError::TaskNotFound(task_id))?;

            if let Some(parent_task_id) = request.parent_task_id {
                check_parent(&tasks_table, owner_id, task_id, parent_task_id)?;
            }

            edited_task = task.edit(request);
            let task_bytes = encode_task(&edited_task)?;
            tasks_table.insert(task_id.as_bytes().as_slice(), task_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(edited_task)
    }

    pub fn toggle_task_completed(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, DataError> {
        let write_txn = self.db.begin_write()?;
        let toggled_task;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let task = load_owned_task(&tasks_table, owner_id, task_id)?
                .ok_or(DataError::TaskNotFound(task_id))?;

            toggled_task = task.toggle_completed(Utc::now());
            let task_bytes = encode_task(&toggled_task)?;
            tasks_table.insert(task_id.as_bytes().as_slice(), task_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(toggled_task)
    }

    /// Deletes the task and every sub-task below it. Returns how many rows went away.
    pub fn delete_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<u64, DataError> {
        let write_txn = self.db.begin_write()?;
        let deleted;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let mut owner_index = write_txn.open_multimap_table(OWNER_TASKS_INDEX)?;

            if load_owned_task(&tasks_table, owner_id, task_id)?.is_none() {
                return Ok(0);
            }

            let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
            for entry in owner_index.get(owner_id.as_bytes().as_slice())? {
                let id = decode_id(entry?.value())?;
                if let Some(task) = load_owned_task(&tasks_table, owner_id, id)? {
                    if let Some(parent) = task.parent_task_id {
                        children.entry(parent).or_default().push(id);
                    }
                }
            }

            let mut doomed = vec![task_id];
            let mut queue = VecDeque::from([task_id]);
            while let Some(id) = queue.pop_front() {
                for child in children.remove(&id).unwrap_or_default() {
                    doomed.push(child);
                    queue.push_back(child);
                }
            }

            let mut removed = 0;
            for id in doomed {
                if tasks_table.remove(id.as_bytes().as_slice())?.is_some() {
                    removed += 1;
                }
                owner_index.remove(owner_id.as_bytes().as_slice(), id.as_bytes().as_slice())?;
            }
            deleted = removed;
        }
        write_txn.commit()?;
        Ok(deleted)
    }

    /// Opens a write transaction for a multi-task operation. Dropping the batch
    /// without committing discards every write made through it.
    pub fn begin_task_batch(&self) -> Result<TaskBatch, DataError> {
        Ok(TaskBatch::new(self.db.begin_write()?))
    }
}

pub(crate) fn load_owned_task<T>(tasks_table: &T, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, DataError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    match tasks_table.get(task_id.as_bytes().as_slice())? {
        Some(data) => {
            let task = decode_task(data.value())?;
            Ok(Some(task).filter(|t| t.user_id == owner_id))
        }
        None => Ok(None),
    }
}

/// The new parent must be owned and must not sit below the task being moved.
fn check_parent<T>(tasks_table: &T, owner_id: Uuid, task_id: Uuid, parent_task_id: Uuid) -> Result<(), DataError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let mut visited = HashSet::new();
    let mut current = Some(parent_task_id);
    while let Some(id) = current {
        if id == task_id {
            return Err(DataError::InvalidParent { parent_task_id, reason: "parent task is a sub-task of this task" });
        }
        if !visited.insert(id) {
            break;
        }
        let ancestor = load_owned_task(tasks_table, owner_id, id)?;
        match ancestor {
            Some(ancestor) => current = ancestor.parent_task_id,
            None if id == parent_task_id => {
                return Err(DataError::InvalidParent { parent_task_id, reason: "parent task not found" });
            }
            None => current = None,
        }
    }
    Ok(())
}

pub(crate) fn encode_task(task: &Task) -> Result<Vec<u8>, DataError> {
    postcard::to_allocvec(task).map_err(|e| DataError::Encode(e.to_string()))
}

pub(crate) fn decode_task(bytes: &[u8]) -> Result<Task, DataError> {
    postcard::from_bytes(bytes).map_err(|e| DataError::Decode(e.to_string()))
}

fn decode_id(bytes: &[u8]) -> Result<Uuid, DataError> {
    Uuid::from_slice(bytes).map_err(|e| DataError::Decode(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{create_task_request::CreateTaskRequest, task_priority::TaskPriority};
    use std::fs;

    /// Temp store that removes its file on drop.
    pub(crate) struct TempStore {
        pub(crate) data_context: DataContext,
        path: std::path::PathBuf,
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.path);
        }
    }

    pub(crate) fn temp_store(name: &str) -> TempStore {
        let path = std::env::temp_dir().join(format!("yata_test_{name}_{}_{}.redb", std::process::id(), Uuid::new_v4()));
        let _ = fs::remove_file(&path);
        let data_context = DataContext::new(&path).unwrap();
        TempStore { data_context, path }
    }

    pub(crate) fn new_task(owner_id: Uuid, project_id: Option<Uuid>, parent_task_id: Option<Uuid>, order: i32) -> Task {
        let request = CreateTaskRequest {
            task_id: Uuid::new_v4(),
            project_id,
            content: format!("task {order}"),
            description: None,
            due_date: None,
            due_datetime: None,
            priority: None,
            parent_task_id,
            labels: Vec::new(),
            order: Some(order),
        };
        Task::new(owner_id, request, Utc::now())
    }

    fn edit_request(content: &str, parent_task_id: Option<Uuid>) -> EditTaskRequest {
        EditTaskRequest {
            project_id: None,
            parent_task_id,
            content: content.to_string(),
            description: None,
            due_date: None,
            due_datetime: None,
            priority: Some(TaskPriority::Medium),
            labels: vec!["home".to_string()],
        }
    }

    #[test]
    fn create_then_get() {
        let store = temp_store("create");
        let owner = Uuid::new_v4();
        let task = new_task(owner, None, None, 3);
        store.data_context.create_task(&task).unwrap();

        let fetched = store.data_context.get_task(owner, task.task_id).unwrap().unwrap();
        assert_eq!(fetched, task);
    }

    #[test]
    fn other_owners_do_not_see_the_task() {
        let store = temp_store("owner");
        let task = new_task(Uuid::new_v4(), None, None, 0);
        store.data_context.create_task(&task).unwrap();

        let stranger = Uuid::new_v4();
        assert!(store.data_context.get_task(stranger, task.task_id).unwrap().is_none());
        assert!(store.data_context.list_tasks(stranger).unwrap().is_empty());
        assert!(matches!(
            store.data_context.toggle_task_completed(stranger, task.task_id),
            Err(DataError::TaskNotFound(_))
        ));
        assert_eq!(store.data_context.delete_task(stranger, task.task_id).unwrap(), 0);
    }

    #[test]
    fn duplicate_task_id_is_rejected() {
        let store = temp_store("duplicate");
        let task = new_task(Uuid::new_v4(), None, None, 0);
        store.data_context.create_task(&task).unwrap();
        assert!(matches!(store.data_context.create_task(&task), Err(DataError::DuplicateTask(_))));
    }

    #[test]
    fn parent_must_belong_to_the_same_owner() {
        let store = temp_store("parent");
        let parent = new_task(Uuid::new_v4(), None, None, 0);
        store.data_context.create_task(&parent).unwrap();

        let child = new_task(Uuid::new_v4(), None, Some(parent.task_id), 0);
        assert!(matches!(store.data_context.create_task(&child), Err(DataError::InvalidParent { .. })));
    }

    #[test]
    fn list_sorts_by_order_then_creation() {
        let store = temp_store("list");
        let owner = Uuid::new_v4();
        let late = new_task(owner, None, None, 1);
        let mut early = new_task(owner, None, None, 1);
        early.created_at = late.created_at - chrono::Duration::seconds(5);
        let first = new_task(owner, None, None, 0);
        for task in [&late, &early, &first] {
            store.data_context.create_task(task).unwrap();
        }

        let ids: Vec<Uuid> = store.data_context.list_tasks(owner).unwrap().iter().map(|t| t.task_id).collect();
        assert_eq!(ids, vec![first.task_id, early.task_id, late.task_id]);
    }

    #[test]
    fn edit_replaces_fields_but_not_order() {
        let store = temp_store("edit");
        let owner = Uuid::new_v4();
        let task = new_task(owner, Some(Uuid::new_v4()), None, 4);
        store.data_context.create_task(&task).unwrap();

        let edited = store.data_context.edit_task(owner, task.task_id, edit_request("renamed", None)).unwrap();
        assert_eq!(edited.content, "renamed");
        assert_eq!(edited.project_id, None);
        assert_eq!(edited.order, 4);
        assert_eq!(store.data_context.get_task(owner, task.task_id).unwrap().unwrap(), edited);
    }

    #[test]
    fn edit_refuses_to_move_a_task_below_its_own_sub_task() {
        let store = temp_store("cycle");
        let owner = Uuid::new_v4();
        let parent = new_task(owner, None, None, 0);
        let child = new_task(owner, None, Some(parent.task_id), 0);
        store.data_context.create_task(&parent).unwrap();
        store.data_context.create_task(&child).unwrap();

        let result = store.data_context.edit_task(owner, parent.task_id, edit_request("loop", Some(child.task_id)));
        assert!(matches!(result, Err(DataError::InvalidParent { .. })));
    }

    #[test]
    fn toggle_round_trips() {
        let store = temp_store("toggle");
        let owner = Uuid::new_v4();
        let task = new_task(owner, None, None, 0);
        store.data_context.create_task(&task).unwrap();

        let done = store.data_context.toggle_task_completed(owner, task.task_id).unwrap();
        assert!(done.is_completed && done.completed_at.is_some());
        let reopened = store.data_context.toggle_task_completed(owner, task.task_id).unwrap();
        assert!(!reopened.is_completed && reopened.completed_at.is_none());
    }

    #[test]
    fn delete_takes_sub_tasks_along() {
        let store = temp_store("delete");
        let owner = Uuid::new_v4();
        let root = new_task(owner, None, None, 0);
        let child = new_task(owner, None, Some(root.task_id), 0);
        let grandchild = new_task(owner, None, Some(child.task_id), 0);
        let bystander = new_task(owner, None, None, 1);
        for task in [&root, &child, &grandchild, &bystander] {
            store.data_context.create_task(task).unwrap();
        }

        assert_eq!(store.data_context.delete_task(owner, root.task_id).unwrap(), 3);
        let remaining: Vec<Uuid> = store.data_context.list_tasks(owner).unwrap().iter().map(|t| t.task_id).collect();
        assert_eq!(remaining, vec![bystander.task_id]);
    }
}
