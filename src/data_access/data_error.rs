use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("redb: {0}")]
    Redb(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("task {0} not found")]
    TaskNotFound(Uuid),
    #[error("task {0} already exists")]
    DuplicateTask(Uuid),
    #[error("invalid parent task {parent_task_id}: {reason}")]
    InvalidParent { parent_task_id: Uuid, reason: &'static str },
}

// redb 2.x has many error types. Blanket them all into DataError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for DataError {
            fn from(e: $t) -> Self { DataError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);
