// handlers/protected/users.rs - Liked songs of the caller

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::{parse_id, SONG_NOT_FOUND};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// POST /api/users/like/:songId - like or unlike
pub async fn toggle_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(song_id): Path<String>,
) -> ApiResult<Value> {
    let song_id = parse_id(&song_id, SONG_NOT_FOUND)?;
    if !state.songs.exists(song_id).await? {
        return Err(ApiError::not_found(SONG_NOT_FOUND));
    }

    let is_liked = state.users.toggle_liked_song(user.id, song_id).await?;
    let liked_songs = state.users.liked_song_ids(user.id).await?;

    Ok(ApiResponse::success(json!({
        "isLiked": is_liked,
        "likedSongs": liked_songs,
    })))
}

/// GET /api/users/liked-songs
pub async fn liked_songs(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<Value> {
    let songs = state.songs.liked_by(user.id).await?;
    let count = songs.len();
    Ok(ApiResponse::success(json!({ "songs": songs })).with_results(count))
}
