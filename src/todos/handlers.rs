use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::{NewTodo, TodoChanges, TodoFilter, TodoId};
use crate::error::AppError;
use crate::{AppState, Result};

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
}

/// Rejects whitespace-only titles. Accepted titles are stored as sent.
fn require_title(title: &str) -> Result<String> {
    if title.trim().is_empty() {
        return Err(AppError::ValidationError("title must not be empty".into()));
    }
    Ok(title.to_string())
}

/// First `filter` value in the query string; later repeats are ignored.
fn first_filter(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == "filter")
        .map(|(_, value)| value.as_str())
}

pub async fn list_todos(
    user: CurrentUser,
    query: web::Query<Vec<(String, String)>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let filter = TodoFilter::parse(first_filter(&query));
    let todos = state.db.list_todos(user.id, filter).await?;

    Ok(HttpResponse::Ok().json(todos))
}

pub async fn create_todo(
    user: CurrentUser,
    req: web::Json<CreateTodoRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let new_todo = NewTodo {
        title: require_title(&req.title)?,
        priority: req.priority,
        due_date: req.due_date,
    };

    let todo = state.db.create_todo(user.id, &new_todo).await?;
    info!("User {} created todo {}", user.id, todo.id);

    Ok(HttpResponse::Created().json(todo))
}

pub async fn update_todo(
    user: CurrentUser,
    path: web::Path<TodoId>,
    req: web::Json<UpdateTodoRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let req = req.into_inner();
    let changes = TodoChanges {
        title: req.title.as_deref().map(require_title).transpose()?,
        completed: req.completed,
        priority: req.priority,
    };

    let todo = state.db.update_todo(user.id, id, &changes).await?;
    info!("User {} updated todo {}", user.id, id);

    Ok(HttpResponse::Ok().json(todo))
}

pub async fn delete_todo(
    user: CurrentUser,
    path: web::Path<TodoId>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    state.db.delete_todo(user.id, id).await?;
    info!("User {} deleted todo {}", user.id, id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Todo deleted"
    })))
}
