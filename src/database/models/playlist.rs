use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::song::non_blank;

pub const DEFAULT_COVER_IMAGE: &str = "https://via.placeholder.com/300";

/// A playlist. `U` is the owner (an id, or a populated `PlaylistOwner`) and
/// `S` the song entries (ids, or populated `Song`s). Rows decode with the
/// owner id and no songs; the repository fills in the song ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Playlist<U = Uuid, S = Uuid> {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "user_id")]
    pub user: U,
    #[sqlx(skip)]
    pub songs: Vec<S>,
    pub cover_image: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    pub fn owner_id(&self) -> Uuid {
        self.user
    }

    pub fn contains_song(&self, song_id: &Uuid) -> bool {
        self.songs.contains(song_id)
    }
}

impl<U, S> Playlist<U, S> {
    /// Replaces the song entries, e.g. ids with populated songs
    pub fn with_songs<T>(self, songs: Vec<T>) -> Playlist<U, T> {
        Playlist {
            id: self.id,
            name: self.name,
            description: self.description,
            user: self.user,
            songs,
            cover_image: self.cover_image,
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Replaces the owner reference, e.g. an id with a `PlaylistOwner`
    pub fn with_owner<T>(self, owner: T) -> Playlist<T, S> {
        Playlist {
            id: self.id,
            name: self.name,
            description: self.description,
            user: owner,
            songs: self.songs,
            cover_image: self.cover_image,
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Owner fields exposed on a populated playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistOwner {
    pub id: Uuid,
    pub username: String,
    pub profile_image: String,
}

/// A validated playlist ready to be inserted
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub cover_image: String,
    pub is_public: bool,
}

impl NewPlaylist {
    /// Returns `None` when the name is missing or blank
    pub fn from_parts(
        name: Option<String>,
        description: Option<String>,
        cover_image: Option<String>,
        is_public: Option<bool>,
    ) -> Option<Self> {
        Some(Self {
            name: non_blank(name)?,
            description: description.map(|d| d.trim().to_string()).unwrap_or_default(),
            cover_image: non_blank(cover_image).unwrap_or_else(|| DEFAULT_COVER_IMAGE.to_string()),
            is_public: is_public.unwrap_or(true),
        })
    }
}

/// Partial update. Blank name/cover are ignored; description may be cleared.
#[derive(Debug, Clone, Default)]
pub struct PlaylistChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_public: Option<bool>,
}

impl PlaylistChanges {
    pub fn apply<U, S>(self, playlist: &mut Playlist<U, S>) {
        if let Some(name) = non_blank(self.name) {
            playlist.name = name;
        }
        if let Some(description) = self.description {
            playlist.description = description.trim().to_string();
        }
        if let Some(cover_image) = non_blank(self.cover_image) {
            playlist.cover_image = cover_image;
        }
        if let Some(is_public) = self.is_public {
            playlist.is_public = is_public;
        }
    }
}
