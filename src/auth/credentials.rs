use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use super::password::{PasswordError, PasswordHasher};
use crate::database::models::user::DEFAULT_PROFILE_IMAGE;
use crate::database::models::User;
use crate::database::{DatabaseError, NewUserRecord, UserRepository};

const EMAIL_PATTERN: &str = r"^\S+@\S+\.\S+$";
const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Please provide all required fields")]
    MissingFields,

    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,

    #[error("Please provide a valid email")]
    InvalidEmail,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("User with this email or username already exists")]
    AlreadyExists,

    #[error("Please provide email and password")]
    MissingLogin,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Registration input as received; every field may be absent
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Creates users with hashed passwords and checks login attempts
#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: UserRepository,
    hasher: PasswordHasher,
    email: Regex,
}

impl CredentialStore {
    pub fn new(users: UserRepository, hasher: PasswordHasher) -> Self {
        Self {
            users,
            hasher,
            email: Regex::new(EMAIL_PATTERN).expect("email pattern is valid"),
        }
    }

    pub async fn create(&self, registration: Registration) -> Result<User, CredentialError> {
        let username = present(registration.username.as_deref());
        let email = present(registration.email.as_deref());
        let password = registration.password.filter(|p| !p.is_empty());

        let (Some(username), Some(email), Some(password)) = (username, email, password) else {
            return Err(CredentialError::MissingFields);
        };
        let email = email.to_lowercase();

        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(CredentialError::UsernameTooShort);
        }
        if !self.email.is_match(&email) {
            return Err(CredentialError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialError::PasswordTooShort);
        }
        if self.users.exists_with_email_or_username(&email, username).await? {
            return Err(CredentialError::AlreadyExists);
        }

        let password_hash = self.hasher.hash(&password)?;
        let record = NewUserRecord {
            username: username.to_string(),
            email,
            password_hash,
            profile_image: DEFAULT_PROFILE_IMAGE.to_string(),
        };

        // A concurrent registration may still win the unique index
        let user = self.users.insert(record).await.map_err(|e| match e {
            DatabaseError::Conflict(_) => CredentialError::AlreadyExists,
            other => CredentialError::Database(other),
        })?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Unknown email and wrong password fail identically
    pub async fn verify(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, CredentialError> {
        let (Some(email), Some(password)) = (present(email), password.filter(|p| !p.is_empty()))
        else {
            return Err(CredentialError::MissingLogin);
        };
        let email = email.to_lowercase();

        let Some(stored) = self.users.find_credentials_by_email(&email).await? else {
            self.hasher.verify_dummy(password);
            debug!("Login attempt for unknown email");
            return Err(CredentialError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &stored.password_hash) {
            debug!("Login attempt with wrong password for user {}", stored.user_id);
            return Err(CredentialError::InvalidCredentials);
        }

        self.users
            .find_by_id(stored.user_id)
            .await?
            .ok_or(CredentialError::InvalidCredentials)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
