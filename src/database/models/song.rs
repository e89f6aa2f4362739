use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_ALBUM: &str = "Unknown Album";
pub const DEFAULT_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "description")]
    pub desc: String,
    pub album: String,
    pub artist: String,
    pub image: String,
    pub file: String,
    pub duration: String,
    pub plays: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Song {
    pub(crate) fn search_text(&self) -> String {
        search_text(&[self.name.as_str(), &self.artist, &self.album, &self.desc])
    }
}

/// A validated song ready to be inserted
#[derive(Debug, Clone)]
pub struct NewSong {
    pub name: String,
    pub desc: String,
    pub album: String,
    pub artist: String,
    pub image: String,
    pub file: String,
    pub duration: String,
}

impl NewSong {
    /// Returns `None` unless name, image, file and duration are all present.
    /// Album and artist fall back to their "Unknown" defaults.
    pub fn from_parts(
        name: Option<String>,
        desc: Option<String>,
        album: Option<String>,
        artist: Option<String>,
        image: Option<String>,
        file: Option<String>,
        duration: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            name: non_blank(name)?,
            desc: desc.map(|d| d.trim().to_string()).unwrap_or_default(),
            album: non_blank(album).unwrap_or_else(|| DEFAULT_ALBUM.to_string()),
            artist: non_blank(artist).unwrap_or_else(|| DEFAULT_ARTIST.to_string()),
            image: non_blank(image)?,
            file: non_blank(file)?,
            duration: non_blank(duration)?,
        })
    }

    pub(crate) fn search_text(&self) -> String {
        search_text(&[self.name.as_str(), &self.artist, &self.album, &self.desc])
    }
}

/// Partial update. Blank strings leave a field untouched, except `desc`
/// which may be cleared.
#[derive(Debug, Clone, Default)]
pub struct SongChanges {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub image: Option<String>,
}

impl SongChanges {
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            desc: self.desc.map(|d| d.trim().to_string()),
            album: non_blank(self.album),
            artist: non_blank(self.artist),
            image: non_blank(self.image),
        }
    }

    pub fn apply(self, song: &mut Song) {
        let changes = self.normalized();
        if let Some(name) = changes.name {
            song.name = name;
        }
        if let Some(desc) = changes.desc {
            song.desc = desc;
        }
        if let Some(album) = changes.album {
            song.album = album;
        }
        if let Some(artist) = changes.artist {
            song.artist = artist;
        }
        if let Some(image) = changes.image {
            song.image = image;
        }
    }
}

/// Lowercased searchable fields joined by a unit separator, so a match
/// never spans two fields
fn search_text(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| field.to_lowercase())
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
