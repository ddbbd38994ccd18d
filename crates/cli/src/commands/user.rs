//! User account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a user account
//! dl-cli user create -u alice -p secret123
//!
//! # Delete a user account and all of their todos
//! dl-cli user delete -u alice
//! ```
//!
//! Accounts created here go through the same validation and password
//! hashing as the signup form.

use donelist_core::{Username, UsernameError};
use thiserror::Error;

use donelist_web::config::{AppConfig, ConfigError};
use donelist_web::db::{self, RepositoryError, UserRepository};
use donelist_web::services::auth::{AuthError, AuthService};

/// Errors that can occur during user management.
#[derive(Debug, Error)]
pub enum UserCommandError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Signup validation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// No user with that username.
    #[error("No user named {0}")]
    NotFound(String),
}

/// Create a new user account.
///
/// # Errors
///
/// Returns an error if validation fails or the username is taken.
pub async fn create(username: &str, password: &str) -> Result<(), UserCommandError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    let auth = AuthService::new(&pool);
    let user = auth.signup(username, password).await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(())
}

/// Delete a user account. Their todos are removed with them.
///
/// # Errors
///
/// Returns an error if no such user exists.
pub async fn delete(username: &str) -> Result<(), UserCommandError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let username = Username::parse(username)?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    let users = UserRepository::new(&pool);
    if !users.delete(&username).await? {
        return Err(UserCommandError::NotFound(username.to_string()));
    }

    tracing::info!("User {} deleted, along with their todos", username);
    Ok(())
}
