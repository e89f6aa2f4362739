use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewPlaylist, Playlist, PlaylistChanges};

const PLAYLIST_COLUMNS: &str =
    "p.id, p.name, p.description, p.user_id, p.cover_image, p.is_public, p.created_at, p.updated_at";

#[derive(Clone, Debug)]
pub struct PlaylistRepository {
    pool: SqlitePool,
}

impl PlaylistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Playlists owned by a user, newest first
    pub async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Playlist>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM playlists p WHERE p.user_id = ? ORDER BY p.created_at DESC, p.rowid DESC",
            PLAYLIST_COLUMNS
        );
        let playlists = sqlx::query_as(&sql).bind(owner).fetch_all(&self.pool).await?;
        self.with_song_ids(playlists).await
    }

    /// Playlists in the order they appear on the user's own list
    pub async fn for_user_profile(&self, user_id: Uuid) -> Result<Vec<Playlist>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM user_playlists up JOIN playlists p ON p.id = up.playlist_id
             WHERE up.user_id = ? ORDER BY up.position",
            PLAYLIST_COLUMNS
        );
        let playlists = sqlx::query_as(&sql).bind(user_id).fetch_all(&self.pool).await?;
        self.with_song_ids(playlists).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>, DatabaseError> {
        let sql = format!("SELECT {} FROM playlists p WHERE p.id = ?", PLAYLIST_COLUMNS);
        let playlist: Option<Playlist> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;

        match playlist {
            Some(mut playlist) => {
                playlist.songs = self.song_ids(id).await?;
                Ok(Some(playlist))
            }
            None => Ok(None),
        }
    }

    /// Inserts the playlist and appends it to the owner's list in one transaction
    pub async fn create(&self, owner: Uuid, playlist: NewPlaylist) -> Result<Playlist, DatabaseError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO playlists (id, name, description, user_id, cover_image, is_public, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(owner)
        .bind(&playlist.cover_image)
        .bind(playlist.is_public)
        .bind(created_at)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_playlists (user_id, playlist_id, position)
             SELECT ?, ?, COALESCE(MAX(position), 0) + 1 FROM user_playlists WHERE user_id = ?",
        )
        .bind(owner)
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Playlist {
            id,
            name: playlist.name,
            description: playlist.description,
            user: owner,
            songs: Vec::new(),
            cover_image: playlist.cover_image,
            is_public: playlist.is_public,
            created_at,
            updated_at: created_at,
        })
    }

    /// Applies the changes and saves. `None` when the playlist does not exist.
    pub async fn update(&self, id: Uuid, changes: PlaylistChanges) -> Result<Option<Playlist>, DatabaseError> {
        let Some(mut playlist) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        changes.apply(&mut playlist);
        playlist.updated_at = Utc::now();

        sqlx::query(
            "UPDATE playlists SET name = ?, description = ?, cover_image = ?, is_public = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(&playlist.cover_image)
        .bind(playlist.is_public)
        .bind(playlist.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(playlist))
    }

    /// Deletes the playlist together with its entry on the owner's list and
    /// its song entries. Returns false when nothing was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_playlists WHERE playlist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }

    /// Appends a song to the end of the playlist
    pub async fn add_song(&self, playlist_id: Uuid, song_id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO playlist_songs (playlist_id, song_id, position)
             SELECT ?, ?, COALESCE(MAX(position), 0) + 1 FROM playlist_songs WHERE playlist_id = ?",
        )
        .bind(playlist_id)
        .bind(song_id)
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Removes every occurrence of the song; absent songs are a no-op
    pub async fn remove_song(&self, playlist_id: Uuid, song_id: Uuid) -> Result<u64, DatabaseError> {
        let removed = sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
            .bind(playlist_id)
            .bind(song_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed > 0 {
            sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
                .bind(Utc::now())
                .bind(playlist_id)
                .execute(&self.pool)
                .await?;
        }
        Ok(removed)
    }

    async fn song_ids(&self, playlist_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let ids = sqlx::query_scalar(
            "SELECT song_id FROM playlist_songs WHERE playlist_id = ? ORDER BY position",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn with_song_ids(&self, mut playlists: Vec<Playlist>) -> Result<Vec<Playlist>, DatabaseError> {
        for playlist in &mut playlists {
            playlist.songs = self.song_ids(playlist.id).await?;
        }
        Ok(playlists)
    }
}
