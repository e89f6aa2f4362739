// handlers/protected/profile.rs - GET/PUT /api/auth/profile

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::CredentialError;
use crate::database::models::song::non_blank;
use crate::database::models::{ProfileChanges, UserProfile};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

/// GET /api/auth/profile - the caller with playlists and liked songs populated
pub async fn show(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<Value> {
    let playlists = state.playlists.for_user_profile(user.id).await?;
    let liked_songs = state.songs.liked_by(user.id).await?;

    Ok(ApiResponse::success(json!({
        "user": UserProfile::new(user, playlists, liked_songs),
    })))
}

/// PUT /api/auth/profile - change username and/or profile image
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Value> {
    let changes = ProfileChanges {
        username: non_blank(body.username),
        profile_image: non_blank(body.profile_image),
    };

    if let Some(username) = &changes.username {
        if username.chars().count() < 3 {
            return Err(CredentialError::UsernameTooShort.into());
        }
        if state.users.username_taken_by_other(username, user.id).await? {
            return Err(CredentialError::AlreadyExists.into());
        }
    }

    if changes.is_empty() {
        return Ok(ApiResponse::success(json!({ "user": user.summary() })));
    }

    let updated = state
        .users
        .update_profile(user.id, changes)
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => ApiError::from(CredentialError::AlreadyExists),
            other => other.into(),
        })?;

    Ok(ApiResponse::success(json!({ "user": updated.summary() })))
}
