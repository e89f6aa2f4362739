// handlers/public/auth.rs - POST /api/auth/register, POST /api/auth/login

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::Registration;
use crate::handlers::ApiJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/register - create an account and receive a token
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<Value> {
    let user = state
        .credentials
        .create(Registration {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;
    let token = state.tokens.issue(user.id)?;

    Ok(ApiResponse::created(json!({
        "user": user.summary(),
        "token": token,
    })))
}

/// POST /api/auth/login - exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Value> {
    let user = state
        .credentials
        .verify(body.email.as_deref(), body.password.as_deref())
        .await?;
    let token = state.tokens.issue(user.id)?;

    info!("User {} logged in", user.id);
    Ok(ApiResponse::success(json!({
        "user": user.summary(),
        "token": token,
    })))
}
