use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{PlaylistOwner, ProfileChanges, User};

/// Stored password hash for a user, only handed to the credential store
#[derive(Debug, Clone, FromRow)]
pub struct StoredCredentials {
    #[sqlx(rename = "id")]
    pub user_id: Uuid,
    pub password_hash: String,
}

/// A user row about to be inserted; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image: String,
}

const USER_COLUMNS: &str =
    "id, username, email, is_premium, profile_image, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Full user record (without password hash) with playlist and liked-song ids
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(mut user) = user else {
            return Ok(None);
        };

        user.playlists = self.playlist_ids(id).await?;
        user.liked_songs = self.liked_song_ids(id).await?;
        Ok(Some(user))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match id {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, DatabaseError> {
        let credentials = sqlx::query_as("SELECT id, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(credentials)
    }

    pub async fn exists_with_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, DatabaseError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? OR username = ?")
                .bind(email)
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    pub async fn username_taken_by_other(
        &self,
        username: &str,
        user_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? AND id <> ?")
            .bind(username)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn insert(&self, record: NewUserRecord) -> Result<User, DatabaseError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, is_premium, profile_image, created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(id)
        .bind(&record.username)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.profile_image)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "user with this email or username"))?;

        Ok(User {
            id,
            username: record.username,
            email: record.email,
            playlists: Vec::new(),
            liked_songs: Vec::new(),
            is_premium: false,
            profile_image: record.profile_image,
            created_at,
            updated_at: created_at,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<User, DatabaseError> {
        let mut user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;

        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(profile_image) = changes.profile_image {
            user.profile_image = profile_image;
        }
        user.updated_at = Utc::now();

        sqlx::query("UPDATE users SET username = ?, profile_image = ?, updated_at = ? WHERE id = ?")
            .bind(&user.username)
            .bind(&user.profile_image)
            .bind(user.updated_at)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "username"))?;

        Ok(user)
    }

    pub async fn playlist_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let ids = sqlx::query_scalar(
            "SELECT playlist_id FROM user_playlists WHERE user_id = ? ORDER BY position",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    pub async fn liked_song_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let ids = sqlx::query_scalar(
            "SELECT song_id FROM user_liked_songs WHERE user_id = ? ORDER BY position",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// Like the song if it is not liked yet, unlike it otherwise.
    /// Returns whether the song is liked afterwards.
    pub async fn toggle_liked_song(&self, user_id: Uuid, song_id: Uuid) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM user_liked_songs WHERE user_id = ? AND song_id = ?")
            .bind(user_id)
            .bind(song_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                "INSERT INTO user_liked_songs (user_id, song_id, position)
                 SELECT ?, ?, COALESCE(MAX(position), 0) + 1 FROM user_liked_songs WHERE user_id = ?",
            )
            .bind(user_id)
            .bind(song_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed == 0)
    }

    pub async fn owner_summary(&self, user_id: Uuid) -> Result<Option<PlaylistOwner>, DatabaseError> {
        let owner = sqlx::query_as("SELECT id, username, profile_image FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }
}
