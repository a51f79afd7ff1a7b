//! Domain errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Version {version} not found for tender {tender_id}")]
    VersionNotFound { tender_id: Uuid, version: i32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Version conflict on tender {tender_id}: expected version {expected}")]
    VersionConflict { tender_id: Uuid, expected: i32 },

    #[error("Store failure while {context}: {message}")]
    StoreFailure { context: &'static str, message: String },
}

/// Failure category, for callers that map errors onto an external signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    VersionNotFound,
    InvalidInput,
    VersionConflict,
    StoreFailure,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Unauthorized(_) => ErrorKind::Unauthorized,
            DomainError::VersionNotFound { .. } => ErrorKind::VersionNotFound,
            DomainError::InvalidInput(_) => ErrorKind::InvalidInput,
            DomainError::VersionConflict { .. } => ErrorKind::VersionConflict,
            DomainError::StoreFailure { .. } => ErrorKind::StoreFailure,
        }
    }

    pub fn tender_not_found(id: &Uuid) -> Self {
        DomainError::NotFound { entity: "tender", id: id.to_string() }
    }

    pub fn bid_not_found(id: &Uuid) -> Self {
        DomainError::NotFound { entity: "bid", id: id.to_string() }
    }

    pub fn store(context: &'static str, message: impl Into<String>) -> Self {
        DomainError::StoreFailure { context, message: message.into() }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::InvalidInput(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_independent_of_message() {
        let id = Uuid::new_v4();
        assert_eq!(DomainError::tender_not_found(&id).kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::bid_not_found(&id).kind(), ErrorKind::NotFound);
        assert_eq!(
            DomainError::VersionNotFound { tender_id: id, version: 3 }.kind(),
            ErrorKind::VersionNotFound
        );
        assert_eq!(
            DomainError::store("inserting tender", "connection reset").kind(),
            ErrorKind::StoreFailure
        );
    }

    #[test]
    fn test_store_failure_carries_context() {
        let err = DomainError::store("updating bid status", "deadlock detected");
        assert_eq!(err.to_string(), "Store failure while updating bid status: deadlock detected");
    }
}
