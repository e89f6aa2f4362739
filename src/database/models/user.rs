use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Playlist, Song};

pub const DEFAULT_PROFILE_IMAGE: &str = "https://via.placeholder.com/150";

/// A user as seen by the rest of the application. The password hash lives
/// only in the users table and the credential store. Relation lists are
/// filled by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[sqlx(skip)]
    pub playlists: Vec<Uuid>,
    #[sqlx(skip)]
    pub liked_songs: Vec<Uuid>,
    pub is_premium: bool,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary::from(self)
    }
}

/// Compact user shape returned by register, login and profile update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_premium: bool,
    pub profile_image: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_premium: user.is_premium,
            profile_image: user.profile_image.clone(),
        }
    }
}

/// User with playlists and liked songs populated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub playlists: Vec<Playlist>,
    pub liked_songs: Vec<Song>,
    pub is_premium: bool,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user: User, playlists: Vec<Playlist>, liked_songs: Vec<Song>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            playlists,
            liked_songs,
            is_premium: user.is_premium,
            profile_image: user.profile_image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Fields a user may change on their own profile
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.profile_image.is_none()
    }
}
