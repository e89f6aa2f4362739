// handlers/protected/playlists.rs - The caller's playlists and owner-only mutations

use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::database::models::{NewPlaylist, Playlist, PlaylistChanges};
use crate::error::ApiError;
use crate::handlers::{parse_id, ApiJson, PLAYLIST_NOT_FOUND, SONG_NOT_FOUND};
use crate::middleware::{ensure_owner, ApiResponse, ApiResult, CurrentUser, OwnedAction};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongRequest {
    pub song_id: Option<String>,
}

/// Loads a playlist by raw path id, 404 when missing
async fn load(state: &AppState, raw_id: &str) -> Result<Playlist, ApiError> {
    let id = parse_id(raw_id, PLAYLIST_NOT_FOUND)?;
    state
        .playlists
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(PLAYLIST_NOT_FOUND))
}

/// Playlist with its songs populated, as returned after song changes
async fn populated(state: &AppState, id: Uuid) -> Result<Value, ApiError> {
    let playlist = state
        .playlists
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(PLAYLIST_NOT_FOUND))?;
    let songs = state.songs.in_playlist(id).await?;
    Ok(json!({ "playlist": playlist.with_songs(songs) }))
}

/// GET /api/playlists - the caller's playlists, newest first
pub async fn list(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<Value> {
    let mut playlists = Vec::new();
    for playlist in state.playlists.list_for_owner(user.id).await? {
        let songs = state.songs.in_playlist(playlist.id).await?;
        playlists.push(playlist.with_songs(songs));
    }

    let count = playlists.len();
    Ok(ApiResponse::success(json!({ "playlists": playlists })).with_results(count))
}

/// POST /api/playlists
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<PlaylistRequest>,
) -> ApiResult<Value> {
    let new_playlist = NewPlaylist::from_parts(body.name, body.description, body.cover_image, body.is_public)
        .ok_or_else(|| ApiError::validation_error("Playlist name is required"))?;

    let playlist = state.playlists.create(user.id, new_playlist).await?;
    info!("User {} created playlist {}", user.id, playlist.id);

    Ok(ApiResponse::created(json!({ "playlist": playlist })))
}

/// PUT /api/playlists/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<PlaylistRequest>,
) -> ApiResult<Value> {
    let playlist = load(&state, &id).await?;
    ensure_owner(playlist.owner_id(), &user, OwnedAction::Update)?;

    let changes = PlaylistChanges {
        name: body.name,
        description: body.description,
        cover_image: body.cover_image,
        is_public: body.is_public,
    };
    let updated = state
        .playlists
        .update(playlist.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(PLAYLIST_NOT_FOUND))?;

    Ok(ApiResponse::success(json!({ "playlist": updated })))
}

/// DELETE /api/playlists/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let playlist = load(&state, &id).await?;
    ensure_owner(playlist.owner_id(), &user, OwnedAction::Delete)?;

    if !state.playlists.delete(playlist.id).await? {
        return Err(ApiError::not_found(PLAYLIST_NOT_FOUND));
    }

    info!("User {} deleted playlist {}", user.id, playlist.id);
    Ok(ApiResponse::message("Playlist deleted successfully"))
}

/// POST /api/playlists/:id/songs
pub async fn add_song(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AddSongRequest>,
) -> ApiResult<Value> {
    let raw_song_id = body
        .song_id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::validation_error("Song ID is required"))?;

    let playlist = load(&state, &id).await?;
    ensure_owner(playlist.owner_id(), &user, OwnedAction::AddSong)?;

    let song_id = parse_id(raw_song_id.trim(), SONG_NOT_FOUND)?;
    if playlist.contains_song(&song_id) {
        return Err(ApiError::validation_error("Song already in playlist"));
    }
    if !state.songs.exists(song_id).await? {
        return Err(ApiError::not_found(SONG_NOT_FOUND));
    }

    state.playlists.add_song(playlist.id, song_id).await?;
    Ok(ApiResponse::success(populated(&state, playlist.id).await?))
}

/// DELETE /api/playlists/:id/songs/:songId
pub async fn remove_song(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, song_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let playlist = load(&state, &id).await?;
    ensure_owner(playlist.owner_id(), &user, OwnedAction::RemoveSong)?;

    // An id that is not a uuid cannot be in the playlist
    if let Ok(song_id) = Uuid::parse_str(&song_id) {
        state.playlists.remove_song(playlist.id, song_id).await?;
    }

    Ok(ApiResponse::success(populated(&state, playlist.id).await?))
}
