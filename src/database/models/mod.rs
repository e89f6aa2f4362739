pub mod playlist;
pub mod song;
pub mod user;

pub use playlist::{NewPlaylist, Playlist, PlaylistChanges, PlaylistOwner};
pub use song::{NewSong, Song, SongChanges};
pub use user::{ProfileChanges, User, UserProfile, UserSummary};
