//! Session data models.

use donelist_core::{UserId, Username};
use serde::{Deserialize, Serialize};

use super::user::User;

/// Signed-in user data stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: Username,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Session storage keys.
pub mod keys {
    /// Key for the signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}
