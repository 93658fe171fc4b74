pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod todos;

use std::sync::Arc;
use actix_web::{web, HttpResponse};

pub use error::{AppError, DatabaseError};
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, CurrentUser, TokenService};
pub use db::{DbOperations, Todo, User};

/// Liveness probe, no authentication.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    }))
}

/// Register every `/api` route plus the extractor error handlers, so body,
/// path and query failures all answer with the `{message}` shape.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        // A non-integer or out-of-range id can never name a todo.
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::DatabaseError(DatabaseError::NotFound).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/test", web::get().to(health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::handlers::register))
                    .route("/login", web::post().to(auth::handlers::login))
                    .route("/me", web::get().to(auth::handlers::me)),
            )
            .service(
                web::scope("/todos")
                    .service(
                        web::resource("")
                            .route(web::get().to(todos::handlers::list_todos))
                            .route(web::post().to(todos::handlers::create_todo)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(todos::handlers::update_todo))
                            .route(web::delete().to(todos::handlers::delete_todo)),
                    ),
            ),
    );
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: DbOperations,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::connect(&config.database).await?;
        let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_expiry_hours);
        let auth_service = AuthService::new(db.clone(), tokens);

        Ok(Self {
            config: Arc::new(config),
            db,
            auth_service: Arc::new(auth_service),
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.db.close().await;
        Ok(())
    }
}
