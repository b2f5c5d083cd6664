//! Staff account domain types.

use chrono::{DateTime, Utc};

use gardu_core::{Email, UserId};

/// A staff account (domain type).
///
/// The password is stored only as an argon2 hash and never appears on this
/// type.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Login email address; unique.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
