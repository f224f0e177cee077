use redb::{ReadableTable, WriteTransaction};
use uuid::Uuid;

use crate::{
    data_access::{data_context::{decode_task, encode_task, load_owned_task, TASKS_TABLE}, data_error::DataError},
    task::Task,
    task_scope::TaskScope,
};

/// One redb write transaction spanning the lookups and the write of a
/// multi-task operation. Reads see the transaction's own state; nothing is
/// visible to others until [`TaskBatch::commit`].
pub struct TaskBatch {
    txn: WriteTransaction,
}

impl TaskBatch {
    pub(crate) fn new(txn: WriteTransaction) -> Self {
        Self { txn }
    }

    /// The task, if it exists and belongs to `owner_id`.
    pub fn owned_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, DataError> {
        let tasks_table = self.txn.open_table(TASKS_TABLE)?;
        load_owned_task(&tasks_table, owner_id, task_id)
    }

    /// Rewrites `order` for every listed task in one pass over the table.
    ///
    /// A row is only written when it still belongs to `owner_id` and sits in
    /// `scope`; other rows are skipped. Returns the number of rows written.
    pub fn write_sibling_orders(&self, owner_id: Uuid, scope: &TaskScope, orders: &[(Uuid, i32)]) -> Result<u64, DataError> {
        let mut tasks_table = self.txn.open_table(TASKS_TABLE)?;
        let mut written = 0;
        for &(task_id, order) in orders {
            let key = task_id.as_bytes().as_slice();
            let stored = match tasks_table.get(key)? {
                Some(data) => decode_task(data.value())?,
                None => continue,
            };
            if stored.user_id != owner_id || !scope.contains(&stored.scope()) {
                continue;
            }

            let task_bytes = encode_task(&Task { order, ..stored })?;
            tasks_table.insert(key, task_bytes.as_slice())?;
            written += 1;
        }
        Ok(written)
    }

    pub fn commit(self) -> Result<(), DataError> {
        self.txn.commit()?;
        Ok(())
    }

    /// Discards every write made through this batch.
    pub fn abort(self) -> Result<(), DataError> {
        self.txn.abort()?;
        Ok(())
    }
}
