//! Authentication error types.

use donelist_core::UsernameError;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password is wrong. Deliberately does not say which.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Username is already registered
    #[error("username is already taken")]
    UserAlreadyExists,

    /// Username failed validation
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Password does not meet requirements
    #[error("{0}")]
    WeakPassword(String),

    /// Password hashing failed
    #[error("password hashing failed")]
    PasswordHash,

    /// Database error
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
