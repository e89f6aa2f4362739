use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewSong, Song, SongChanges};

const SONG_COLUMNS: &str = "s.id, s.name, s.description, s.album, s.artist, s.image, s.file, \
                            s.duration, s.plays, s.uploaded_by, s.created_at, s.updated_at";

#[derive(Clone, Debug)]
pub struct SongRepository {
    pool: SqlitePool,
}

impl SongRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All songs, newest first
    pub async fn list(&self) -> Result<Vec<Song>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM songs s ORDER BY s.created_at DESC, s.rowid DESC",
            SONG_COLUMNS
        );
        let songs = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(songs)
    }

    /// Case-insensitive substring match on name, artist, album and description,
    /// most played first
    pub async fn search(&self, query: &str) -> Result<Vec<Song>, DatabaseError> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
        let sql = format!(
            "SELECT {} FROM songs s
             WHERE s.search_text LIKE ? ESCAPE '\\'
             ORDER BY s.plays DESC, s.created_at DESC",
            SONG_COLUMNS
        );
        let songs = sqlx::query_as(&sql).bind(pattern).fetch_all(&self.pool).await?;
        Ok(songs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Song>, DatabaseError> {
        let sql = format!("SELECT {} FROM songs s WHERE s.id = ?", SONG_COLUMNS);
        let song = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(song)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, song: NewSong, uploaded_by: Option<Uuid>) -> Result<Song, DatabaseError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO songs (id, name, description, album, artist, image, file, duration, plays, uploaded_by, search_text, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&song.name)
        .bind(&song.desc)
        .bind(&song.album)
        .bind(&song.artist)
        .bind(&song.image)
        .bind(&song.file)
        .bind(&song.duration)
        .bind(uploaded_by)
        .bind(song.search_text())
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Song {
            id,
            name: song.name,
            desc: song.desc,
            album: song.album,
            artist: song.artist,
            image: song.image,
            file: song.file,
            duration: song.duration,
            plays: 0,
            uploaded_by,
            created_at,
            updated_at: created_at,
        })
    }

    /// Applies the changes and saves. `None` when the song does not exist.
    pub async fn update(&self, id: Uuid, changes: SongChanges) -> Result<Option<Song>, DatabaseError> {
        let Some(mut song) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        changes.apply(&mut song);
        song.updated_at = Utc::now();

        sqlx::query(
            "UPDATE songs SET name = ?, description = ?, album = ?, artist = ?, image = ?, search_text = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&song.name)
        .bind(&song.desc)
        .bind(&song.album)
        .bind(&song.artist)
        .bind(&song.image)
        .bind(song.search_text())
        .bind(song.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(song))
    }

    /// Returns false when nothing was deleted. Playlist entries and likes
    /// referencing the song go with it.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes the whole catalogue (used by the seed command)
    pub async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM songs").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Atomically bumps the play counter, returning the new value
    pub async fn increment_plays(&self, id: Uuid) -> Result<Option<i64>, DatabaseError> {
        let plays: Option<i64> =
            sqlx::query_scalar("UPDATE songs SET plays = plays + 1 WHERE id = ? RETURNING plays")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(plays)
    }

    /// Songs of a playlist in playlist order
    pub async fn in_playlist(&self, playlist_id: Uuid) -> Result<Vec<Song>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM playlist_songs ps JOIN songs s ON s.id = ps.song_id
             WHERE ps.playlist_id = ? ORDER BY ps.position",
            SONG_COLUMNS
        );
        let songs = sqlx::query_as(&sql).bind(playlist_id).fetch_all(&self.pool).await?;
        Ok(songs)
    }

    /// Songs a user liked, in the order they were liked
    pub async fn liked_by(&self, user_id: Uuid) -> Result<Vec<Song>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM user_liked_songs l JOIN songs s ON s.id = l.song_id
             WHERE l.user_id = ? ORDER BY l.position",
            SONG_COLUMNS
        );
        let songs = sqlx::query_as(&sql).bind(user_id).fetch_all(&self.pool).await?;
        Ok(songs)
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
