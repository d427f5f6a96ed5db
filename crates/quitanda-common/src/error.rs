//! Error types and error codes for Quitanda
//!
//! This module defines:
//! - `QuitandaError`: Application-specific error enum
//! - `ErrorCode`: Structured error codes for API responses
//! - Classification of database errors into retryable/non-retryable

use sea_orm::DbErr;
use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum QuitandaError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("order '{0}' not exist!")]
    OrderNotFound(String),

    #[error("inventory batch '{0}' not exist!")]
    BatchNotFound(String),

    #[error("no stock recorded for product '{0}'")]
    ProductNotFound(String),

    #[error("insufficient stock (requested: {requested}, available: {available})")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("concurrent modification: {0}")]
    ConcurrencyConflict(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl QuitandaError {
    /// Whether a retry of the failed operation may succeed.
    ///
    /// Only transient database conflicts qualify; domain failures such as
    /// insufficient stock are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuitandaError::ConcurrencyConflict(_))
    }
}

/// Classify a SeaORM error, mapping transient lock/serialization failures
/// to `ConcurrencyConflict` so callers can retry them.
pub fn classify_db_err(err: DbErr) -> QuitandaError {
    let message = err.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("deadlock")
        || lowered.contains("could not serialize")
        || lowered.contains("lock timeout")
        || lowered.contains("database is locked")
        || lowered.contains("database table is locked")
    {
        QuitandaError::ConcurrencyConflict(message)
    } else {
        QuitandaError::DatabaseError(message)
    }
}

/// Whether an error chain contains a retryable failure.
pub fn is_retryable(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<QuitandaError>()
            .map(QuitandaError::is_retryable)
            .unwrap_or(false)
    })
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

// General success and error codes
pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const INSUFFICIENT_STOCK: ErrorCode<'static> = ErrorCode {
    code: 21001,
    message: "insufficient stock",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrency_conflict_is_retryable() {
        assert!(QuitandaError::ConcurrencyConflict("deadlock".to_string()).is_retryable());
        assert!(!QuitandaError::DatabaseError("syntax error".to_string()).is_retryable());
        assert!(
            !QuitandaError::InsufficientStock {
                requested: 5,
                available: 1
            }
            .is_retryable()
        );
    }

    #[test]
    fn classify_db_err_detects_transient_failures() {
        let err = DbErr::Custom("deadlock detected".to_string());
        assert!(classify_db_err(err).is_retryable());

        let err = DbErr::Custom("database is locked".to_string());
        assert!(classify_db_err(err).is_retryable());

        let err = DbErr::Custom("relation \"orders\" does not exist".to_string());
        assert!(!classify_db_err(err).is_retryable());
    }

    #[test]
    fn is_retryable_walks_the_error_chain() {
        let inner = QuitandaError::ConcurrencyConflict("could not serialize".to_string());
        let err = anyhow::Error::new(inner).context("dispatching publication");
        assert!(is_retryable(&err));

        let err = anyhow::anyhow!("plain failure");
        assert!(!is_retryable(&err));
    }
}
