//! User repository for database operations.

use chrono::{DateTime, Utc};
use donelist_core::{UserId, Username};
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::user::User;

/// Raw user row. The username is re-validated on the way out so a
/// manually edited database surfaces as corruption instead of
/// undefined behavior further up.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid username in database: {e}")))?;

        Ok(Self {
            id: UserId::new(row.id),
            username,
            created_at: row.created_at,
        })
    }
}

/// User row joined with its password hash, for authentication.
#[derive(Debug, sqlx::FromRow)]
struct UserAuthRow {
    id: i64,
    username: String,
    created_at: DateTime<Utc>,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository with a database pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password_hash, created_at)
             VALUES (?, ?, ?)
             RETURNING id, username, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                RepositoryError::Conflict("username already exists".to_string())
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.try_into()
    }

    /// Get a user and their password hash by username.
    ///
    /// Returns `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserAuthRow>(
            "SELECT id, username, created_at, password_hash
             FROM users
             WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let password_hash = row.password_hash;
                let user = UserRow {
                    id: row.id,
                    username: row.username,
                    created_at: row.created_at,
                }
                .try_into()?;
                Ok(Some((user, password_hash)))
            }
            None => Ok(None),
        }
    }

    /// Delete a user by username. Their todos go with them via the
    /// foreign key cascade.
    ///
    /// Returns `true` if a user was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn delete(&self, username: &Username) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
