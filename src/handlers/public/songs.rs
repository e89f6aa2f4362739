// handlers/public/songs.rs - Catalogue reads and play counting

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::{parse_id, SONG_NOT_FOUND};
use crate::middleware::{ApiResponse, ApiResult, MaybeUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/songs - every song, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let songs = state.songs.list().await?;
    let count = songs.len();
    Ok(ApiResponse::success(json!({ "songs": songs })).with_results(count))
}

/// GET /api/songs/search?q= - substring search, most played first
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Value> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Search query is required"))?;

    let songs = state.songs.search(q).await?;
    let count = songs.len();
    Ok(ApiResponse::success(json!({ "songs": songs })).with_results(count))
}

/// GET /api/songs/:id - a song; authenticated callers also learn whether they liked it
pub async fn show(
    State(state): State<AppState>,
    caller: MaybeUser,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, SONG_NOT_FOUND)?;
    let song = state
        .songs
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(SONG_NOT_FOUND))?;

    let mut data = json!({ "song": song });
    if let Some(user) = caller.user() {
        data["isLiked"] = json!(user.liked_songs.contains(&id));
    }
    Ok(ApiResponse::success(data))
}

/// POST /api/songs/:id/play - bump the play counter
pub async fn play(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id, SONG_NOT_FOUND)?;
    let plays = state
        .songs
        .increment_plays(id)
        .await?
        .ok_or_else(|| ApiError::not_found(SONG_NOT_FOUND))?;

    Ok(ApiResponse::success(json!({ "plays": plays })))
}
