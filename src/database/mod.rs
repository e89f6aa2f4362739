pub mod manager;
pub mod models;
pub mod playlists;
pub mod songs;
pub mod users;

pub use manager::{Database, DatabaseError};
pub use playlists::PlaylistRepository;
pub use songs::SongRepository;
pub use users::{NewUserRecord, StoredCredentials, UserRepository};
