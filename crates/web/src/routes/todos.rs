//! Todo route handlers.
//!
//! Every handler resolves todos through the owner-scoped repository
//! queries, so a todo that belongs to someone else looks exactly like
//! one that does not exist.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::{DateTime, Utc};
use donelist_core::TodoId;
use serde::Deserialize;
use tracing::instrument;

use crate::db::{Page, TodoRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::todo::{Todo, TodoDraft};
use crate::state::AppState;

// ============================================================================
// Form and Query Types
// ============================================================================

/// Todo create/edit form data.
#[derive(Debug, Deserialize)]
pub struct TodoForm {
    pub title: String,
    #[serde(default)]
    pub memo: String,
}

/// Pagination query string.
///
/// The parameter stays a string so that junk input falls back to page 1
/// instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page number; anything unusable becomes page 1, and
    /// the repository clamps the upper end.
    fn number(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|p| p.parse::<u64>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

// ============================================================================
// View Types
// ============================================================================

/// Todo display data with preformatted timestamps.
pub struct TodoView {
    pub id: i64,
    pub title: String,
    pub memo: String,
    pub created: String,
    pub completed: Option<String>,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.as_i64(),
            title: todo.title.clone(),
            memo: todo.memo.clone(),
            created: format_timestamp(todo.created_at),
            completed: todo.completed_at.map(format_timestamp),
        }
    }
}

/// Pager display data.
pub struct PagerView {
    pub number: u64,
    pub total_pages: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_number: u64,
    pub next_number: u64,
}

impl<T> From<&Page<T>> for PagerView {
    fn from(page: &Page<T>) -> Self {
        Self {
            number: page.number,
            total_pages: page.total_pages,
            has_prev: page.has_prev(),
            has_next: page.has_next(),
            prev_number: page.prev_number(),
            next_number: page.next_number(),
        }
    }
}

/// Format a timestamp for display, e.g. "Aug 25, 2026 14:30".
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %H:%M").to_string()
}

// ============================================================================
// Templates
// ============================================================================

/// Open todos list template.
#[derive(Template, WebTemplate)]
#[template(path = "todos/current.html")]
pub struct CurrentTodosTemplate {
    pub username: String,
    pub todos: Vec<TodoView>,
    pub pager: PagerView,
}

/// Completed todos list template.
#[derive(Template, WebTemplate)]
#[template(path = "todos/completed.html")]
pub struct CompletedTodosTemplate {
    pub username: String,
    pub todos: Vec<TodoView>,
    pub pager: PagerView,
}

/// Todo creation form template.
#[derive(Template, WebTemplate)]
#[template(path = "todos/new.html")]
pub struct NewTodoTemplate {
    pub username: String,
    pub error: Option<String>,
    pub title: String,
    pub memo: String,
}

/// Todo view/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "todos/edit.html")]
pub struct EditTodoTemplate {
    pub username: String,
    pub error: Option<String>,
    pub todo: TodoView,
}

// ============================================================================
// Handlers
// ============================================================================

/// Display the user's open todos.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn current(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let todos = TodoRepository::new(state.pool());
    let page = todos.list_open(user.id, query.number()).await?;

    Ok(CurrentTodosTemplate {
        username: user.username.to_string(),
        todos: page.items.iter().map(TodoView::from).collect(),
        pager: PagerView::from(&page),
    }
    .into_response())
}

/// Display the user's completed todos.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn completed(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let todos = TodoRepository::new(state.pool());
    let page = todos.list_completed(user.id, query.number()).await?;

    Ok(CompletedTodosTemplate {
        username: user.username.to_string(),
        todos: page.items.iter().map(TodoView::from).collect(),
        pager: PagerView::from(&page),
    }
    .into_response())
}

/// Display the todo creation form.
pub async fn new_page(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    NewTodoTemplate {
        username: user.username.to_string(),
        error: None,
        title: String::new(),
        memo: String::new(),
    }
}

/// Handle todo creation.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<TodoForm>,
) -> Result<Response> {
    let draft = match TodoDraft::parse(&form.title, &form.memo) {
        Ok(draft) => draft,
        Err(e) => {
            return Ok(NewTodoTemplate {
                username: user.username.to_string(),
                error: Some(e.to_string()),
                title: form.title,
                memo: form.memo,
            }
            .into_response());
        }
    };

    let todos = TodoRepository::new(state.pool());
    let todo = todos.create(user.id, &draft).await?;
    tracing::info!(todo_id = %todo.id, "todo created");

    Ok(Redirect::to("/todos/current").into_response())
}

/// Display one todo with its edit form.
#[instrument(skip_all, fields(user_id = %user.id, todo_id = id))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let todos = TodoRepository::new(state.pool());
    let todo = todos
        .find_owned(TodoId::new(id), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("todo {id}")))?;

    Ok(EditTodoTemplate {
        username: user.username.to_string(),
        error: None,
        todo: TodoView::from(&todo),
    }
    .into_response())
}

/// Save edits to a todo's title and memo.
#[instrument(skip_all, fields(user_id = %user.id, todo_id = id))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<TodoForm>,
) -> Result<Response> {
    let todos = TodoRepository::new(state.pool());
    let todo = todos
        .find_owned(TodoId::new(id), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("todo {id}")))?;

    let draft = match TodoDraft::parse(&form.title, &form.memo) {
        Ok(draft) => draft,
        Err(e) => {
            // Re-render with the submitted values so nothing is lost
            let mut view = TodoView::from(&todo);
            view.title = form.title;
            view.memo = form.memo;
            return Ok(EditTodoTemplate {
                username: user.username.to_string(),
                error: Some(e.to_string()),
                todo: view,
            }
            .into_response());
        }
    };

    if !todos.update(todo.id, user.id, &draft).await? {
        return Err(AppError::NotFound(format!("todo {id}")));
    }
    tracing::info!(todo_id = %todo.id, "todo updated");

    Ok(Redirect::to("/todos/current").into_response())
}

/// Mark a todo complete. Completing again refreshes the timestamp.
#[instrument(skip_all, fields(user_id = %user.id, todo_id = id))]
pub async fn complete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let todos = TodoRepository::new(state.pool());

    if !todos.complete(TodoId::new(id), user.id, Utc::now()).await? {
        return Err(AppError::NotFound(format!("todo {id}")));
    }
    tracing::info!(todo_id = id, "todo completed");

    Ok(Redirect::to("/todos/current").into_response())
}

/// Delete a todo.
#[instrument(skip_all, fields(user_id = %user.id, todo_id = id))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let todos = TodoRepository::new(state.pool());

    if !todos.delete(TodoId::new(id), user.id).await? {
        return Err(AppError::NotFound(format!("todo {id}")));
    }
    tracing::info!(todo_id = id, "todo deleted");

    Ok(Redirect::to("/todos/current").into_response())
}
