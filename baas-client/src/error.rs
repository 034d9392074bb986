//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing, expired or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Row-level policy or role rejected the call
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique violation or stale version
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend rejected the payload
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote procedure raised an error
    #[error("Remote procedure {function} failed: {message}")]
    Rpc { function: String, message: String },

    /// Storage bucket rejected the object
    #[error("Storage error: {0}")]
    Storage(String),

    /// Any other non-success status, with the backend's error code if it sent one
    #[error("Backend error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Transport-level failure where the backend could not be reached in time
    pub fn is_unavailable(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_connect() || e.is_timeout(),
            ClientError::Api { status, .. } => *status == 503 || *status == 504,
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Backend failures reach API callers with a generic message; the
/// underlying cause is logged here. Not-found and conflict keep their text.
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ClientError::Conflict(msg) => AppError::conflict(msg),
            ClientError::Unauthorized(msg) => {
                tracing::warn!(error = %msg, "Backend rejected credentials");
                AppError::new(ErrorCode::NotAuthenticated)
            }
            ClientError::Forbidden(msg) => {
                tracing::warn!(error = %msg, "Backend denied access");
                AppError::new(ErrorCode::PermissionDenied)
            }
            ClientError::Validation(msg) => {
                tracing::warn!(error = %msg, "Backend rejected payload");
                AppError::new(ErrorCode::BackendRejected)
            }
            ClientError::Rpc { function, message } => {
                tracing::error!(function = %function, error = %message, "Remote procedure failed");
                AppError::new(ErrorCode::RemoteProcedureFailed).with_detail("function", function)
            }
            ClientError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage upload failed");
                AppError::new(ErrorCode::StorageUploadFailed)
            }
            ClientError::Internal(msg) => {
                tracing::error!(error = %msg, "Backend client internal error");
                AppError::new(ErrorCode::InternalError)
            }
            other if other.is_unavailable() => {
                tracing::error!(error = %other, "Backend unavailable");
                AppError::new(ErrorCode::BackendUnavailable)
            }
            other => {
                tracing::error!(error = %other, "Backend request failed");
                AppError::new(ErrorCode::BackendError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_and_not_found_keep_message() {
        let err: AppError = ClientError::Conflict("Theater x was modified".into()).into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Theater x was modified");

        let err: AppError = ClientError::NotFound("Vendor y not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_backend_failures_are_generic() {
        let err: AppError = ClientError::Api {
            status: 500,
            code: Some("XX000".into()),
            message: "relation \"vendors\" does not exist".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::BackendError);
        assert!(!err.message.contains("relation"));

        let err: AppError = ClientError::Api {
            status: 503,
            code: None,
            message: "down".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::BackendUnavailable);
    }
}
