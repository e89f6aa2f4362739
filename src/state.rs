/// Shared application state
use std::sync::Arc;

use anyhow::Context;

use crate::auth::{CredentialStore, PasswordError, PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::{Database, PlaylistRepository, SongRepository, UserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub users: UserRepository,
    pub songs: SongRepository,
    pub playlists: PlaylistRepository,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wire repositories and auth services around an open database
    pub fn new(config: AppConfig, db: Database, tokens: TokenService) -> Result<Self, PasswordError> {
        let pool = db.pool().clone();
        let users = UserRepository::new(pool.clone());
        let hasher = PasswordHasher::new(config.security.password_hash)?;

        Ok(Self {
            credentials: Arc::new(CredentialStore::new(users.clone(), hasher)),
            tokens: Arc::new(tokens),
            songs: SongRepository::new(pool.clone()),
            playlists: PlaylistRepository::new(pool),
            users,
            db,
            config: Arc::new(config),
        })
    }

    /// Connect to the configured database and build the state with the system clock
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let db = Database::connect(&config.database)
            .await
            .context("failed to open database")?;
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.jwt_expiry_days);
        Self::new(config, db, tokens).context("invalid password hash configuration")
    }
}
