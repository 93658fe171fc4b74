use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::db::models::{NewTodo, Todo, TodoChanges, TodoFilter, TodoId, User, UserId, DEFAULT_PRIORITY};
use crate::error::DatabaseError;
use crate::Result;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

const TODO_COLUMNS: &str = "id, title, completed, priority, due_date, user_id";
const USER_COLUMNS: &str = "id, username, email, password_hash";

/// Shared handle to the relational store holding users and todos.
#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<SqlitePool>,
}

impl DbOperations {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Open the database (creating the file if needed) and bring the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives only as long as its connection.
        let in_memory = config.url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(ACQUIRE_TIMEOUT);
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database ready at {}", config.url);

        Ok(Self::new(Arc::new(pool)))
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool.as_ref()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'_, Sqlite>> {
        Ok(self.pool.as_ref().begin().await?)
    }

    async fn create_user_with_transaction(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<User> {
        let taken: Option<(i64,)> = sqlx::query_as(r#"SELECT id FROM "user" WHERE username = ?"#)
            .bind(username)
            .fetch_optional(&mut **transaction)
            .await?;
        if taken.is_some() {
            return Err(DatabaseError::Duplicate("username already exists".into()).into());
        }

        let taken: Option<(i64,)> = sqlx::query_as(r#"SELECT id FROM "user" WHERE email = ?"#)
            .bind(email)
            .fetch_optional(&mut **transaction)
            .await?;
        if taken.is_some() {
            return Err(DatabaseError::Duplicate("email already registered".into()).into());
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO "user" (username, email, password_hash) VALUES (?, ?, ?) RETURNING {USER_COLUMNS}"#
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut **transaction)
        .await?;

        Ok(user)
    }

    /// Insert a user, failing with `Duplicate` if the username or email is taken.
    pub async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let mut transaction = self.begin_transaction().await?;

        let result = self
            .create_user_with_transaction(username, email, password_hash, &mut transaction)
            .await;

        match result {
            Ok(user) => {
                transaction.commit().await?;
                Ok(user)
            }
            Err(e) => {
                transaction.rollback().await?;
                Err(e)
            }
        }
    }

    pub async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(r#"SELECT {USER_COLUMNS} FROM "user" WHERE id = ?"#))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(r#"SELECT {USER_COLUMNS} FROM "user" WHERE username = ?"#))
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }

    /// Todos owned by `owner`, newest first.
    pub async fn list_todos(&self, owner: UserId, filter: TodoFilter) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todo \
             WHERE user_id = ?1 AND (?2 IS NULL OR completed = ?2) \
             ORDER BY id DESC"
        ))
        .bind(owner)
        .bind(filter.completed())
        .fetch_all(self.pool())
        .await?;

        Ok(todos)
    }

    pub async fn create_todo(&self, owner: UserId, todo: &NewTodo) -> Result<Todo> {
        let priority = todo.priority.as_deref().unwrap_or(DEFAULT_PRIORITY);

        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todo (title, completed, priority, due_date, user_id) \
             VALUES (?, 0, ?, ?, ?) RETURNING {TODO_COLUMNS}"
        ))
        .bind(&todo.title)
        .bind(priority)
        .bind(&todo.due_date)
        .bind(owner)
        .fetch_one(self.pool())
        .await?;

        Ok(todo)
    }

    /// Apply `changes` to a todo owned by `owner`. Fails with `NotFound` when the
    /// row does not exist or belongs to someone else.
    pub async fn update_todo(&self, owner: UserId, id: TodoId, changes: &TodoChanges) -> Result<Todo> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todo SET \
                title = COALESCE(?1, title), \
                completed = COALESCE(?2, completed), \
                priority = COALESCE(?3, priority) \
             WHERE id = ?4 AND user_id = ?5 \
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(&changes.title)
        .bind(changes.completed)
        .bind(&changes.priority)
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool())
        .await?;

        todo.ok_or_else(|| DatabaseError::NotFound.into())
    }

    pub async fn delete_todo(&self, owner: UserId, id: TodoId) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM todo WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner)
            .execute(self.pool())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(DatabaseError::NotFound.into());
        }

        Ok(())
    }
}
