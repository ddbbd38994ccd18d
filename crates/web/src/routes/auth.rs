//! Authentication route handlers.
//!
//! Login, signup, and logout. Validation failures re-render the form
//! with a message; only unexpected failures become error responses.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use donelist_core::UsernameError;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{self, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// ============================================================================
// Form Types
// ============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Signup form data. The password is entered twice.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

// ============================================================================
// Templates
// ============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Display the login page.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate { error: None }
}

/// Handle login form submission.
///
/// Every failed attempt gets the same message, whether the username
/// exists or not.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> error::Result<Response> {
    let auth = AuthService::new(state.pool());

    let user = match auth.login(&form.username, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            return Ok(login_error("Invalid login/password"));
        }
        Err(e) => return Err(e.into()),
    };

    let current_user = CurrentUser::from(&user);
    if let Err(e) = set_current_user(&session, &current_user).await {
        tracing::error!("Failed to set session: {e}");
        return Ok(login_error("Something went wrong, please try again"));
    }
    set_sentry_user(&user.id, Some(user.username.as_str()));

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Redirect::to("/todos/current").into_response())
}

/// Display the signup page.
pub async fn signup_page() -> impl IntoResponse {
    SignupTemplate { error: None }
}

/// Handle signup form submission.
///
/// Checks run in the order the form presents the fields: matching
/// passwords, then password length, then username, then uniqueness.
/// A successful signup signs the user in immediately.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> error::Result<Response> {
    if form.password1 != form.password2 {
        return Ok(signup_error("Passwords did not match"));
    }

    let auth = AuthService::new(state.pool());

    let user = match auth.signup(&form.username, &form.password1).await {
        Ok(user) => user,
        Err(AuthError::WeakPassword(_)) => {
            return Ok(signup_error(
                "Length of the password has to be at least 6 symbols",
            ));
        }
        Err(AuthError::InvalidUsername(UsernameError::TooShort { .. })) => {
            return Ok(signup_error(
                "Length of the username should be at least 3 symbols",
            ));
        }
        Err(AuthError::InvalidUsername(e)) => {
            return Ok(signup_error(&e.to_string()));
        }
        Err(AuthError::UserAlreadyExists) => {
            return Ok(signup_error("That username has already been taken"));
        }
        Err(e) => return Err(e.into()),
    };

    let current_user = CurrentUser::from(&user);
    if let Err(e) = set_current_user(&session, &current_user).await {
        tracing::error!("Failed to set session: {e}");
        return Ok(signup_error("Something went wrong, please try again"));
    }
    set_sentry_user(&user.id, Some(user.username.as_str()));

    tracing::info!(user_id = %user.id, "user signed up");
    Ok(Redirect::to("/todos/current").into_response())
}

/// Handle logout: drop the user from the session and destroy it.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();

    Redirect::to("/").into_response()
}

fn login_error(message: &str) -> Response {
    LoginTemplate {
        error: Some(message.to_string()),
    }
    .into_response()
}

fn signup_error(message: &str) -> Response {
    SignupTemplate {
        error: Some(message.to_string()),
    }
    .into_response()
}
