//! Bearer-token gate for owner-scoped routes.
//!
//! A handler opts in by taking [`CurrentUser`] as an argument. Extraction walks
//! the request from unauthenticated to authorized: pull the token out of the
//! `Authorization` header, verify it, then load the user it names. Any failure
//! after the header is found is reported as the same "invalid token".

use std::ops::Deref;

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use tracing::warn;

use crate::db::User;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// The authenticated account behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken);
    }

    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(token.to_string()),
        (None, _) => Err(AuthError::MissingToken),
        (Some(_), Some(_)) => Err(AuthError::InvalidToken),
    }
}

async fn authenticate(
    state: Option<web::Data<AppState>>,
    token: Result<String, AuthError>,
    path: String,
) -> Result<CurrentUser, AppError> {
    let state = state
        .ok_or_else(|| AppError::InternalError("application state is not registered".into()))?;

    let token = token.map_err(|e| {
        warn!("Rejected request to {}: {}", path, e);
        e
    })?;

    match state.auth_service.authorize(&token).await {
        Ok(user) => Ok(CurrentUser(user)),
        Err(AppError::AuthError(e)) => {
            warn!("Rejected request to {}: {}", path, e);
            Err(AuthError::InvalidToken.into())
        }
        Err(e) => Err(e),
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);
        let path = req.path().to_string();

        Box::pin(authenticate(state, token, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn request_with(value: &str) -> HttpRequest {
        TestRequest::default()
            .insert_header((header::AUTHORIZATION, value))
            .to_http_request()
    }

    #[test]
    fn test_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&request_with("Bearer abc.def.ghi")), Ok("abc.def.ghi".to_string()));
        assert_eq!(bearer_token(&request_with("bearer abc")), Ok("abc".to_string()));
    }

    #[test]
    fn test_empty_token_is_missing() {
        assert_eq!(bearer_token(&request_with("Bearer")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(&request_with("Bearer   ")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(&request_with("")), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_malformed_header_is_invalid() {
        assert_eq!(bearer_token(&request_with("Basic dXNlcjpwdw==")), Err(AuthError::InvalidToken));
        assert_eq!(bearer_token(&request_with("Bearer a b")), Err(AuthError::InvalidToken));
        assert_eq!(bearer_token(&request_with("abc.def.ghi")), Err(AuthError::InvalidToken));
    }

    #[actix_rt::test]
    async fn test_unregistered_state_is_internal_error() {
        let req = request_with("Bearer abc");
        let result = CurrentUser::extract(&req).await;
        assert!(matches!(result, Err(AppError::InternalError(_))));
    }
}
