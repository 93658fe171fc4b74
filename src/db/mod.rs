//! Persistence for users and their todos.
//!
//! SQLite through sqlx; the schema lives in `migrations/` and is applied on
//! connect.

pub mod models;
pub mod operations;

pub use models::{NewTodo, Todo, TodoChanges, TodoFilter, TodoId, User, UserId, UserProfile, DEFAULT_PRIORITY};
pub use operations::DbOperations;
