//! Todo item model and form validation.

use chrono::{DateTime, Utc};
use donelist_core::{TodoId, UserId};
use thiserror::Error;

/// Maximum length of a todo title, in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

/// A todo item owned by a single user.
#[derive(Debug, Clone)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    pub memo: String,
    pub created_at: DateTime<Utc>,
    /// Set when the todo is marked complete; `None` while open.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Whether this todo has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Todo form validation errors. Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoValidationError {
    /// Title is empty after trimming
    #[error("Title cannot be empty")]
    EmptyTitle,

    /// Title exceeds the maximum length
    #[error("Title cannot be longer than {max} characters")]
    TitleTooLong { max: usize },
}

/// Validated title and memo from the create/edit form.
#[derive(Debug, Clone)]
pub struct TodoDraft {
    title: String,
    memo: String,
}

impl TodoDraft {
    /// Validate form input into a draft.
    ///
    /// Both fields are trimmed. The title must be non-empty and at
    /// most [`MAX_TITLE_LENGTH`] characters; the memo is free-form.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty or too long.
    pub fn parse(title: &str, memo: &str) -> Result<Self, TodoValidationError> {
        let title = title.trim();

        if title.is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }

        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(TodoValidationError::TitleTooLong {
                max: MAX_TITLE_LENGTH,
            });
        }

        Ok(Self {
            title: title.to_string(),
            memo: memo.trim().to_string(),
        })
    }

    /// The validated title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The trimmed memo, possibly empty.
    #[must_use]
    pub fn memo(&self) -> &str {
        &self.memo
    }
}
