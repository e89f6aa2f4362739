pub mod credentials;
pub mod password;
pub mod token;

pub use credentials::{CredentialError, CredentialStore, Registration};
pub use password::{PasswordError, PasswordHasher};
pub use token::{Claims, Clock, FixedClock, SystemClock, TokenError, TokenService};
