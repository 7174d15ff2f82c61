use diesel::{r2d2::PoolError, result::DatabaseErrorKind, result::Error as DieselError};

use crate::domain::errors::{DataAccessError, TransientKind};

/// Failing to check a connection out of the pool is always worth another try.
pub fn from_pool_error(err: PoolError) -> anyhow::Error {
    DataAccessError::transient(TransientKind::Connection, err.to_string())
}

/// Maps driver failures onto the retryable kinds. Anything not listed keeps
/// its diesel type and is treated as permanent.
pub fn from_query_error(err: DieselError) -> anyhow::Error {
    match transient_kind(&err) {
        Some(kind) => DataAccessError::transient(kind, err.to_string()),
        None => anyhow::Error::new(err),
    }
}

fn transient_kind(err: &DieselError) -> Option<TransientKind> {
    match err {
        DieselError::DatabaseError(kind, _) => match kind {
            DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand => {
                Some(TransientKind::DataAccessResource)
            }
            DatabaseErrorKind::SerializationFailure => Some(TransientKind::Transaction),
            _ => None,
        },
        DieselError::RollbackTransaction
        | DieselError::BrokenTransactionManager
        | DieselError::AlreadyInTransaction
        | DieselError::NotInTransaction
        | DieselError::RollbackErrorOnCommit { .. } => Some(TransientKind::Transaction),
        _ => None,
    }
}
