//! Domain models for the web application.

pub mod session;
pub mod todo;
pub mod user;

pub use session::CurrentUser;
pub use todo::{Todo, TodoDraft};
pub use user::User;
