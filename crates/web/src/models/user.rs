//! User account model.

use chrono::{DateTime, Utc};
use donelist_core::{UserId, Username};

/// A registered user account.
///
/// The password hash never leaves the database layer; authentication
/// goes through [`crate::services::auth::AuthService`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub created_at: DateTime<Utc>,
}
