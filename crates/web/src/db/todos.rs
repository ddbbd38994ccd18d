//! Todo repository for database operations.
//!
//! Every query that touches an existing todo filters on `user_id` in
//! the same statement, so callers never observe another user's rows.

use chrono::{DateTime, Utc};
use donelist_core::{TodoId, UserId};
use sqlx::SqlitePool;

use super::{PAGE_SIZE, Page, RepositoryError, clamp_page, page_count};
use crate::models::todo::{Todo, TodoDraft};

const TODO_COLUMNS: &str = "id, user_id, title, memo, created_at, completed_at";

#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id: TodoId,
    user_id: UserId,
    title: String,
    memo: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            memo: row.memo,
            created_at: row.created_at,
            completed_at: row.completed_at,
        }
    }
}

/// Repository for todo database operations.
pub struct TodoRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TodoRepository<'a> {
    /// Create a new repository with a database pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a todo for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        draft: &TodoDraft,
    ) -> Result<Todo, RepositoryError> {
        let row = sqlx::query_as::<_, TodoRow>(
            "INSERT INTO todos (user_id, title, memo, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, user_id, title, memo, created_at, completed_at",
        )
        .bind(user_id)
        .bind(draft.title())
        .bind(draft.memo())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Fetch a todo by id, scoped to its owner.
    ///
    /// Returns `None` when the todo does not exist or belongs to a
    /// different user; the two cases are indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_owned(
        &self,
        todo_id: TodoId,
        user_id: UserId,
    ) -> Result<Option<Todo>, RepositoryError> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = ? AND user_id = ?"
        ))
        .bind(todo_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Todo::from))
    }

    /// List the user's open todos, oldest first, paginated.
    ///
    /// The requested page is clamped into range, so page 0 yields page
    /// 1 and a page past the end yields the last page.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list_open(
        &self,
        user_id: UserId,
        page: u64,
    ) -> Result<Page<Todo>, RepositoryError> {
        let total_items = self.count_where(user_id, "completed_at IS NULL").await?;
        let total_pages = page_count(total_items);
        let number = clamp_page(page, total_pages);

        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE user_id = ? AND completed_at IS NULL
             ORDER BY id ASC
             LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(limit_i64(PAGE_SIZE))
        .bind(limit_i64((number - 1) * PAGE_SIZE))
        .fetch_all(self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Todo::from).collect(),
            number,
            total_pages,
            total_items,
        })
    }

    /// List the user's completed todos, most recently completed
    /// first, paginated. Clamps the page like [`Self::list_open`].
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list_completed(
        &self,
        user_id: UserId,
        page: u64,
    ) -> Result<Page<Todo>, RepositoryError> {
        let total_items = self.count_where(user_id, "completed_at IS NOT NULL").await?;
        let total_pages = page_count(total_items);
        let number = clamp_page(page, total_pages);

        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE user_id = ? AND completed_at IS NOT NULL
             ORDER BY completed_at DESC, id DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(limit_i64(PAGE_SIZE))
        .bind(limit_i64((number - 1) * PAGE_SIZE))
        .fetch_all(self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Todo::from).collect(),
            number,
            total_pages,
            total_items,
        })
    }

    /// Update a todo's title and memo, scoped to its owner.
    ///
    /// Returns `true` if a row was updated, `false` if the todo does
    /// not exist or belongs to a different user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn update(
        &self,
        todo_id: TodoId,
        user_id: UserId,
        draft: &TodoDraft,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE todos SET title = ?, memo = ? WHERE id = ? AND user_id = ?")
            .bind(draft.title())
            .bind(draft.memo())
            .bind(todo_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark a todo complete at the given time, scoped to its owner.
    ///
    /// Completing an already-completed todo overwrites its completion
    /// time. Returns `true` if a row was updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn complete(
        &self,
        todo_id: TodoId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE todos SET completed_at = ? WHERE id = ? AND user_id = ?")
            .bind(at)
            .bind(todo_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a todo, scoped to its owner.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn delete(&self, todo_id: TodoId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(todo_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_where(
        &self,
        user_id: UserId,
        completed_filter: &str,
    ) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM todos WHERE user_id = ? AND {completed_filter}"
        ))
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

/// SQLite takes LIMIT/OFFSET as signed integers.
fn limit_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
