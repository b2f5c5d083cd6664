//! Authentication service.
//!
//! Handles staff registration, login, and logout with argon2 password
//! hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tower_sessions::Session;

use gardu_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::error::{AppError, FieldError};
use crate::middleware::auth::clear_current_user;
use crate::models::session::CurrentUser;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new staff account.
    ///
    /// The password is stored only as an argon2id hash; the plaintext is
    /// never persisted or logged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the username is empty, the email is
    /// malformed, or the password is too short. Returns `AppError::Conflict`
    /// if the email is already registered.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let (username, email) =
            validate_registration(username, email, password).map_err(AppError::Validation)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&username, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) => AppError::Conflict(msg),
                other => AppError::Database(other),
            })?;

        tracing::info!(user_id = %user.id, "Staff account registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Unknown email and wrong password produce the same error, so callers
    /// cannot enumerate accounts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidCredentials` if no account matches or the
    /// password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AppError> {
        // A malformed email cannot belong to an account; keep the same
        // external shape as a failed hash comparison.
        let email = Email::parse(email).map_err(|_| AppError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            email: user.email,
        })
    }
}

/// Log out the current session.
///
/// Destroying the session is best effort: failures are logged and the
/// caller proceeds to a logged-out state regardless.
pub async fn logout(session: &Session) {
    if let Err(e) = clear_current_user(session).await {
        tracing::error!("Failed to clear session user: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }
}

/// Validate registration input, collecting every failure.
fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(String, Email), Vec<FieldError>> {
    let mut errors = Vec::new();

    let username = username.trim();
    if username.is_empty() {
        errors.push(FieldError::new("username", "Username is required"));
    }

    let email = match Email::parse(email.trim()) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push(FieldError::new("email", "Please enter a valid email"));
            None
        }
    };

    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        ));
    }

    match email {
        Some(email) if errors.is_empty() => Ok((username.to_owned(), email)),
        _ => Err(errors),
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AppError::Internal` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::Internal("password hashing failed".to_owned()))
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AppError::InvalidCredentials` if the hash is unreadable or the
/// password does not match.
fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)
}
