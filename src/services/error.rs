use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::JwtError;
use crate::database::DatabaseError;

/// Failures the auth and blog services report to their callers
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// No credential was presented at all
    #[error("{0}")]
    Unauthenticated(String),

    /// Credentials were presented and did not match
    #[error("{0}")]
    InvalidCredentials(String),

    /// Bad/expired token, or a valid principal acting on someone else's post
    #[error("{0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
            DatabaseError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenGeneration(msg) => ServiceError::Internal(msg),
            JwtError::Expired | JwtError::Invalid(_) => {
                ServiceError::Forbidden("Invalid or expired token".to_string())
            }
        }
    }
}
