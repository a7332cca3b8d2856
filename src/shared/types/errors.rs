use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain or release an advisory file lock.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Timed out after {waited_ms}ms waiting for lock on {resource}")]
    Timeout { resource: String, waited_ms: u64 },

    #[error("Lock I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("Data file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    /// A booking overlaps an existing non-cancelled reservation.
    #[error("Time slot conflicts with reservation {reservation_id} ({start}-{end})")]
    Conflict {
        reservation_id: String,
        start: String,
        end: String,
    },

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Only timeouts should land here; see `From<LockError>`.
    #[error("Resource busy: {0}")]
    Lock(LockError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }

    /// Whether the operation may succeed if retried.
    ///
    /// Only lock timeouts qualify: the critical section never ran, so the
    /// caller can safely try again.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Lock(LockError::Timeout { .. }))
    }
}

/// A lock timeout is retryable; any other lock failure is a storage fault.
impl From<LockError> for DomainError {
    fn from(err: LockError) -> Self {
        match err {
            timeout @ LockError::Timeout { .. } => DomainError::Lock(timeout),
            io @ LockError::Io { .. } => DomainError::Storage(io.to_string()),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Lock(lock) => lock.into(),
            other => DomainError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lock_timeouts_are_transient() {
        let timeout = DomainError::Lock(LockError::Timeout {
            resource: "reservations.json".into(),
            waited_ms: 5000,
        });
        assert!(timeout.is_transient());

        let io = DomainError::Lock(LockError::Io {
            path: PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert!(!io.is_transient());
        assert!(!DomainError::Validation("bad".into()).is_transient());
    }

    #[test]
    fn lock_timeouts_stay_lock_errors() {
        let err: DomainError = StorageError::Lock(LockError::Timeout {
            resource: "members.json".into(),
            waited_ms: 10,
        })
        .into();
        assert!(matches!(err, DomainError::Lock(LockError::Timeout { .. })));
        assert!(err.is_transient());
    }

    #[test]
    fn lock_io_failures_are_storage_errors() {
        let denied = || LockError::Io {
            path: PathBuf::from("/srv/data/reservations.json.lock"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };

        let err: DomainError = StorageError::Lock(denied()).into();
        assert!(matches!(&err, DomainError::Storage(msg) if msg.contains("reservations.json.lock")));
        assert!(!err.is_transient());

        let err: DomainError = denied().into();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[test]
    fn other_storage_errors_map_to_storage() {
        let err: DomainError =
            StorageError::Io(std::io::Error::from(std::io::ErrorKind::Other)).into();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
