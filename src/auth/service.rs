use actix_web::web;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::db::{DbOperations, User, UserId, UserProfile};
use crate::error::{AppError, AuthError, DatabaseError};
use crate::Result;

/// Credential store and token issuance for the HTTP layer.
pub struct AuthService {
    db: DbOperations,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(db: DbOperations, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserId> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError(
                "username, email and password are required".into(),
            ));
        }

        let password = password.to_string();
        let password_hash = web::block(move || hash_password(&password))
            .await
            .map_err(|e| AppError::InternalError(format!("password hashing was cancelled: {}", e)))??;
        let user = self.db.create_user(username, email, &password_hash).await?;
        info!("Registered user {} (id {})", user.username, user.id);

        Ok(user.id)
    }

    /// Checks a username/password pair. An unknown username and a wrong
    /// password are indistinguishable to the caller.
    pub async fn verify(&self, username: &str, password: &str) -> Result<UserId> {
        let user = self.db.get_user_by_username(username.trim()).await?;

        let verified = match user {
            Some(user) => {
                let password = password.to_string();
                let stored = user.password_hash.clone();
                let matches = web::block(move || verify_password(&password, &stored))
                    .await
                    .map_err(|e| AppError::InternalError(format!("password check was cancelled: {}", e)))?;
                matches.then_some(user.id)
            }
            None => None,
        };

        match verified {
            Some(user_id) => Ok(user_id),
            None => {
                warn!("Rejected credentials for username {}", username);
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    pub async fn get(&self, user_id: UserId) -> Result<UserProfile> {
        self.db
            .get_user_by_id(user_id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| DatabaseError::NotFound.into())
    }

    /// Verify credentials and mint a token for the account.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, UserProfile)> {
        let user_id = self.verify(username, password).await?;
        let profile = self.get(user_id).await?;
        let token = self.tokens.issue(user_id)?;

        Ok((token, profile))
    }

    /// Resolve a bearer token to the user it was issued for. A token naming a
    /// user that no longer exists is as invalid as a forged one.
    pub async fn authorize(&self, token: &str) -> Result<User> {
        let user_id = self.tokens.verify(token)?;

        self.db
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::InvalidToken.into())
    }
}
