use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Outcome kinds of the subscription operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::InvalidInput(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::DuplicateEntry(_) => 1002,
            ServiceError::Storage(_) => 1200,
            ServiceError::Cancelled(_) => 1300,
        }
    }

    /// Short label used as the metrics `outcome`.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::DuplicateEntry(_) => "duplicate_entry",
            ServiceError::Storage(_) => "storage_failure",
            ServiceError::Cancelled(_) => "cancelled",
        }
    }

    /// Caller mistakes and absent rows, as opposed to faults of the store itself.
    pub fn is_expected(&self) -> bool {
        matches!(self, ServiceError::InvalidInput(_) | ServiceError::NotFound(_) | ServiceError::DuplicateEntry(_))
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ServiceError::InvalidInput(msg),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ServiceError::DuplicateEntry(msg),
            _ => ServiceError::Storage(e.to_string()),
        }
    }
}
