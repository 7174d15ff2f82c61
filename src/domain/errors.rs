use std::fmt;

use thiserror::Error;

/// The transient failure classes a datastore call can be retried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    Connection,
    Transaction,
    DataAccessResource,
}

impl fmt::Display for TransientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransientKind::Connection => "connection",
            TransientKind::Transaction => "transaction",
            TransientKind::DataAccessResource => "data access resource",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("transient {kind} failure: {message}")]
    Transient { kind: TransientKind, message: String },

    #[error("{context} ({message})")]
    Persistence { context: String, message: String },

    #[error("invalid activity update: {0}")]
    Validation(String),
}

impl DataAccessError {
    pub fn transient(kind: TransientKind, message: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(Self::Transient {
            kind,
            message: message.into(),
        })
    }

    pub fn persistence(context: impl Into<String>, message: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(Self::Persistence {
            context: context.into(),
            message: message.into(),
        })
    }

    pub fn validation(message: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(Self::Validation(message.into()))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, DataAccessError::Transient { .. })
    }
}

/// Only `DataAccessError::Transient` is retryable; any other error, including
/// foreign ones, is not.
pub fn is_retryable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DataAccessError>()
        .is_some_and(DataAccessError::is_transient)
}

pub fn is_validation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DataAccessError>(),
        Some(DataAccessError::Validation(_))
    )
}
