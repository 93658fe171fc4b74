use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type UserId = i64;
pub type TodoId = i64;

pub const DEFAULT_PRIORITY: &str = "medium";

/// A stored account. Never serialized directly; see [`UserProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public view of a user, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub priority: String,
    pub due_date: Option<String>,
    #[serde(skip)]
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    /// Unknown values fall back to `All`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("active") => TodoFilter::Active,
            Some("completed") => TodoFilter::Completed,
            _ => TodoFilter::All,
        }
    }

    /// Completion state a row must have to pass, `None` for no constraint.
    pub fn completed(self) -> Option<bool> {
        match self {
            TodoFilter::All => None,
            TodoFilter::Active => Some(false),
            TodoFilter::Completed => Some(true),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

/// Partial update; `None` fields are left as stored.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
}
