//! Error types for the dream library

use thiserror::Error;

/// Stable error codes reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    NotAuthorized = 2,
    StorageFailure = 3,
    NoSuchEntry = 5,
    EntryNotAvailable = 7,
    BadValue = 18,
    StaleSnapshot = 22,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Snapshot changed underneath this session (expected version {expected}, found {found})")]
    StaleSnapshot { expected: u64, found: u64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Numeric code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::NotFound(_) => ErrorCode::NoSuchEntry,
            AppError::Conflict(_) => ErrorCode::EntryNotAvailable,
            AppError::Forbidden(_) => ErrorCode::NotAuthorized,
            AppError::StaleSnapshot { .. } => ErrorCode::StaleSnapshot,
            AppError::Storage(_) | AppError::Io(_) | AppError::Serialization(_) => {
                ErrorCode::StorageFailure
            }
        }
    }

    /// Persistence failures are fatal to the operation; everything else is
    /// a rejected command the caller is expected to display.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_) | AppError::Io(_) | AppError::Serialization(_)
        )
    }
}

/// Result type alias for library operations
pub type AppResult<T> = Result<T, AppError>;
