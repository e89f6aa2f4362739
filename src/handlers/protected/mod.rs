// handlers/protected/mod.rs - Handlers behind `require_auth`
//
// Every handler here takes `CurrentUser`; mutations on playlists additionally
// pass `ensure_owner` before touching the store.
pub mod playlists;
pub mod profile;
pub mod songs;
pub mod users;
