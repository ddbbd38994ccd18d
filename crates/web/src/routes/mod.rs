//! HTTP route handlers for the donelist web application.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Landing page (redirects to the list when signed in)
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (verifies database)
//!
//! # Auth (rate limited)
//! GET  /login               - Login page
//! POST /login               - Login form submission
//! GET  /signup              - Signup page
//! POST /signup              - Signup form submission
//! POST /logout              - Logout, destroys the session
//!
//! # Todos (require a signed-in user)
//! GET  /todos/current       - Open todos, oldest first, paginated
//! GET  /todos/completed     - Completed todos, newest first, paginated
//! GET  /todos/new           - Creation form
//! POST /todos/new           - Create a todo
//! GET  /todos/{id}          - View/edit form for one todo
//! POST /todos/{id}          - Save title/memo edits
//! POST /todos/{id}/complete - Mark complete
//! POST /todos/{id}/delete   - Delete
//! ```

pub mod auth;
pub mod health;
pub mod home;
pub mod todos;

use axum::Router;
use axum::routing::{get, post};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the authentication routes router.
///
/// The whole group sits behind the auth rate limiter so password
/// guessing and bulk signup stay slow.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
        .route_layer(auth_rate_limiter())
}

/// Create the todo routes router.
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(todos::current))
        .route("/completed", get(todos::completed))
        .route("/new", get(todos::new_page).post(todos::create))
        .route("/{id}", get(todos::show).post(todos::update))
        .route("/{id}/complete", post(todos::complete))
        .route("/{id}/delete", post(todos::delete))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/todos", todo_routes())
        .merge(auth_routes())
}
