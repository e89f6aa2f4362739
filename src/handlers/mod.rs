// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth, or optional auth) → Protected (bearer token required).
// Which middleware guards which route is decided in `crate::app`.
pub mod protected;
pub mod public;

use axum::extract::FromRequest;
use uuid::Uuid;

use crate::error::ApiError;

/// `axum::Json` whose rejection is answered with the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path ids that are not UUIDs cannot name an existing resource
pub(crate) fn parse_id(raw: &str, not_found: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}

pub(crate) const SONG_NOT_FOUND: &str = "Song not found";
pub(crate) const PLAYLIST_NOT_FOUND: &str = "Playlist not found";

/// Fallback for every unmatched route
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
