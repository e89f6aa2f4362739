use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::{parse_id, PLAYLIST_NOT_FOUND};
use crate::middleware::{ensure_can_view, ApiResponse, ApiResult, MaybeUser};
use crate::state::AppState;

/// GET /api/playlists/:id - public playlists for anyone, private ones for the owner
pub async fn show(
    State(state): State<AppState>,
    caller: MaybeUser,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, PLAYLIST_NOT_FOUND)?;
    let playlist = state
        .playlists
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(PLAYLIST_NOT_FOUND))?;

    ensure_can_view(&playlist, caller.user())?;

    let owner = state.users.owner_summary(playlist.owner_id()).await?;
    let songs = state.songs.in_playlist(id).await?;
    let playlist = playlist.with_songs(songs).with_owner(owner);

    Ok(ApiResponse::success(json!({ "playlist": playlist })))
}
