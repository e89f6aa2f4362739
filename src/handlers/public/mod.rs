// handlers/public/mod.rs - Handlers reachable without a token
//
// `songs` and `playlists::show` run behind `optional_auth` and see the caller
// through `MaybeUser` when a valid token is sent.
pub mod auth;
pub mod health;
pub mod playlists;
pub mod songs;
