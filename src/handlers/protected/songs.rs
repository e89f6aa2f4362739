// handlers/protected/songs.rs - Catalogue writes (any authenticated caller)

use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::{NewSong, SongChanges};
use crate::error::ApiError;
use crate::handlers::{parse_id, ApiJson, SONG_NOT_FOUND};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SongRequest {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub image: Option<String>,
    pub file: Option<String>,
    pub duration: Option<String>,
}

/// POST /api/songs
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<SongRequest>,
) -> ApiResult<Value> {
    let new_song = NewSong::from_parts(
        body.name,
        body.desc,
        body.album,
        body.artist,
        body.image,
        body.file,
        body.duration,
    )
    .ok_or_else(|| {
        ApiError::validation_error("Please provide all required fields: name, image, file, duration")
    })?;

    let song = state.songs.create(new_song, Some(user.id)).await?;
    info!("User {} uploaded song {}", user.id, song.id);

    Ok(ApiResponse::created(json!({ "song": song })))
}

/// PUT /api/songs/:id
pub async fn update(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SongRequest>,
) -> ApiResult<Value> {
    let id = parse_id(&id, SONG_NOT_FOUND)?;
    let changes = SongChanges {
        name: body.name,
        desc: body.desc,
        album: body.album,
        artist: body.artist,
        image: body.image,
    };

    let song = state
        .songs
        .update(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(SONG_NOT_FOUND))?;

    Ok(ApiResponse::success(json!({ "song": song })))
}

/// DELETE /api/songs/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, SONG_NOT_FOUND)?;
    if !state.songs.delete(id).await? {
        return Err(ApiError::not_found(SONG_NOT_FOUND));
    }

    info!("User {} deleted song {}", user.id, id);
    Ok(ApiResponse::message("Song deleted successfully"))
}
