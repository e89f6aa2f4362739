pub mod auth;
pub mod ownership;
pub mod response;

pub use auth::{authenticate, optional_auth, require_auth, AuthFailure, CurrentUser, MaybeUser};
pub use ownership::{ensure_can_view, ensure_owner, OwnedAction};
pub use response::{ApiResponse, ApiResult};
