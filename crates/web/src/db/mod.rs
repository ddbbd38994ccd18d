//! Database access layer.
//!
//! Repository pattern over SQLite: each repository borrows the shared
//! pool and owns the SQL for one aggregate. Queries that act on
//! another user's rows are written so they simply match nothing.

pub mod todos;
pub mod users;

use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use todos::TodoRepository;
pub use users::UserRepository;

/// Embedded database migrations, applied at startup and by the CLI.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Number of todos shown per list page.
pub const PAGE_SIZE: u64 = 10;

/// Repository errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data failed validation
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create the SQLite connection pool.
///
/// Creates the database file if it does not exist and enables foreign
/// key enforcement, which the todo ownership cascade relies on.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the database cannot be
/// opened.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// One page of results plus the numbers needed to render a pager.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number, already clamped into range.
    pub number: u64,
    /// Total number of pages, at least 1.
    pub total_pages: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
}

impl<T> Page<T> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Page number of the previous page.
    #[must_use]
    pub const fn prev_number(&self) -> u64 {
        self.number.saturating_sub(1)
    }

    /// Page number of the next page.
    #[must_use]
    pub const fn next_number(&self) -> u64 {
        self.number.saturating_add(1)
    }
}

/// Total number of pages for `total_items`. An empty list still has
/// one (empty) page.
pub(crate) const fn page_count(total_items: u64) -> u64 {
    let pages = total_items.div_ceil(PAGE_SIZE);
    if pages == 0 { 1 } else { pages }
}

/// Clamp a requested page number into `1..=total_pages`.
pub(crate) const fn clamp_page(requested: u64, total_pages: u64) -> u64 {
    if requested < 1 {
        1
    } else if requested > total_pages {
        total_pages
    } else {
        requested
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    /// Fresh in-memory database with migrations applied.
    ///
    /// A single connection keeps the in-memory database alive for the
    /// whole test.
    pub async fn test_pool() -> SqlitePool {
        let options = "sqlite::memory:"
            .parse::<SqliteConnectOptions>()
            .expect("options")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("in-memory pool");

        super::MIGRATOR.run(&pool).await.expect("migrations");
        pool
    }
}
