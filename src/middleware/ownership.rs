use uuid::Uuid;

use crate::database::models::{Playlist, User};
use crate::error::ApiError;

/// Mutations that only a playlist's owner may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedAction {
    Update,
    Delete,
    AddSong,
    RemoveSong,
}

impl OwnedAction {
    fn denied_message(self) -> &'static str {
        match self {
            OwnedAction::Update => "You can only update your own playlists",
            OwnedAction::Delete => "You can only delete your own playlists",
            OwnedAction::AddSong => "You can only add songs to your own playlists",
            OwnedAction::RemoveSong => "You can only remove songs from your own playlists",
        }
    }
}

/// 403 unless `user` owns the resource
pub fn ensure_owner(owner_id: Uuid, user: &User, action: OwnedAction) -> Result<(), ApiError> {
    if owner_id == user.id {
        Ok(())
    } else {
        tracing::debug!("User {} denied {:?} on resource owned by {}", user.id, action, owner_id);
        Err(ApiError::forbidden(action.denied_message()))
    }
}

/// Public playlists are readable by anyone, private ones only by their owner
pub fn ensure_can_view<S>(playlist: &Playlist<Uuid, S>, viewer: Option<&User>) -> Result<(), ApiError> {
    let is_owner = viewer.is_some_and(|user| user.id == playlist.user);
    if playlist.is_public || is_owner {
        Ok(())
    } else {
        Err(ApiError::forbidden("You do not have access to this playlist"))
    }
}
