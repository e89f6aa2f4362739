use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::auth::TokenError;
use crate::database::models::User;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::state::AppState;

pub const MISSING_TOKEN_MESSAGE: &str = "Not authorized. Please login to access this resource.";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token or token expired";
pub const UNKNOWN_USER_MESSAGE: &str = "User not found";

/// Why a request could not be tied to a user
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("missing bearer token")]
    MissingToken,

    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("token subject does not exist")]
    UnknownUser,

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        match failure {
            AuthFailure::MissingToken => ApiError::unauthorized(MISSING_TOKEN_MESSAGE),
            AuthFailure::InvalidToken(_) => ApiError::unauthorized(INVALID_TOKEN_MESSAGE),
            AuthFailure::UnknownUser => ApiError::unauthorized(UNKNOWN_USER_MESSAGE),
            AuthFailure::Store(e) => e.into(),
        }
    }
}

/// The authenticated caller, placed in the request extensions by the auth
/// middleware. Usable as an extractor on routes behind `require_auth`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The caller on `optional_auth` routes, `None` when anonymous
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

/// Resolve the bearer token in `headers` to a stored user
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, AuthFailure> {
    let token = extract_bearer_token(headers).ok_or(AuthFailure::MissingToken)?;
    let user_id = state.tokens.verify(token)?;

    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AuthFailure::UnknownUser)
}

/// Rejects the request with 401 unless it carries a valid token for an existing user
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers()).await.map_err(|failure| {
        match &failure {
            AuthFailure::Store(e) => tracing::error!("Authentication lookup failed: {}", e),
            other => tracing::debug!("Rejected request: {}", other),
        }
        ApiError::from(failure)
    })?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Attaches the user when the token checks out, otherwise continues anonymously
pub async fn optional_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match authenticate(&state, request.headers()).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
        }
        Err(AuthFailure::MissingToken) => {}
        Err(failure) => {
            tracing::warn!("Continuing anonymously: {}", failure);
        }
    }

    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized(MISSING_TOKEN_MESSAGE))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<CurrentUser>().map(|c| c.0.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FixedClock;
    use crate::auth::{Registration, TokenService};
    use crate::config::AppConfig;
    use crate::database::Database;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use uuid::Uuid;

    async fn state() -> AppState {
        let config = AppConfig::for_tests();
        let db = Database::connect(&config.database).await.unwrap();
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.jwt_expiry_days);
        AppState::new(config, db, tokens).unwrap()
    }

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn alice(state: &AppState) -> User {
        state
            .credentials
            .create(Registration {
                username: Some("alice".into()),
                email: Some("alice@x.com".into()),
                password: Some("secret1".into()),
            })
            .await
            .unwrap()
    }

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(extract_bearer_token(&bearer("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&bearer("Bearer   ")), None);
        assert_eq!(extract_bearer_token(&bearer("Basic abc")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let state = state().await;
        let user = alice(&state).await;
        let token = state.tokens.issue(user.id).unwrap();

        let resolved = authenticate(&state, &bearer(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn failures_are_classified() {
        let state = state().await;

        let missing = authenticate(&state, &HeaderMap::new()).await.unwrap_err();
        assert!(matches!(missing, AuthFailure::MissingToken));

        let garbage = authenticate(&state, &bearer("Bearer nonsense")).await.unwrap_err();
        assert!(matches!(garbage, AuthFailure::InvalidToken(TokenError::Malformed)));

        let ghost = state.tokens.issue(Uuid::new_v4()).unwrap();
        let unknown = authenticate(&state, &bearer(&format!("Bearer {ghost}"))).await.unwrap_err();
        assert!(matches!(unknown, AuthFailure::UnknownUser));
        assert_eq!(ApiError::from(unknown).message(), UNKNOWN_USER_MESSAGE);
    }

    #[tokio::test]
    async fn expired_token_is_invalid() {
        let state = state().await;
        let user = alice(&state).await;

        let past = Utc::now() - Duration::days(31);
        let old = TokenService::with_clock(
            &state.config.security.jwt_secret,
            30,
            Arc::new(FixedClock(past)),
        );
        let token = old.issue(user.id).unwrap();

        let failure = authenticate(&state, &bearer(&format!("Bearer {token}"))).await.unwrap_err();
        assert!(matches!(failure, AuthFailure::InvalidToken(TokenError::Expired)));
        assert_eq!(ApiError::from(failure).message(), INVALID_TOKEN_MESSAGE);
    }
}
