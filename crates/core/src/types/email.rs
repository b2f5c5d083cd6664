//! Email address types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    BadAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) has no interior dot.
    #[error("email domain must contain a dot")]
    BadDomain,
}

/// An email address.
///
/// This type provides basic validation for email addresses, ensuring they
/// have a `local@domain.tld` shape: a non-empty local part, exactly one
/// @ symbol, no whitespace, and a domain with at least one interior dot.
///
/// ## Examples
///
/// ```
/// use gardu_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());              // empty
/// assert!(Email::parse("no-at-symbol").is_err());  // missing @
/// assert!(Email::parse("@domain.com").is_err());   // empty local part
/// assert!(Email::parse("user@domain").is_err());   // no dot in domain
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty or longer than 254 characters
    /// - Contains whitespace
    /// - Does not contain exactly one @ symbol
    /// - Has an empty local part
    /// - Has a domain without an interior dot
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        if s.matches('@').count() != 1 {
            return Err(EmailError::BadAtSymbol);
        }

        let at_pos = s.find('@').ok_or(EmailError::BadAtSymbol)?;

        if at_pos == 0 {
            return Err(EmailError::EmptyLocalPart);
        }

        let domain = s.get(at_pos + 1..).unwrap_or("");
        if !has_interior_dot(domain) {
            return Err(EmailError::BadDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the local part of the email (before the @).
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

/// Whether `domain` contains a dot that is neither its first nor last character.
fn has_interior_dot(domain: &str) -> bool {
    let len = domain.len();
    len >= 3
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i < len - 1)
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing an [`EmailList`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailListError {
    /// The input contains no addresses.
    #[error("at least one email address is required")]
    Empty,
    /// One of the entries is not a valid address.
    #[error("invalid email address '{entry}': {source}")]
    InvalidEntry {
        /// The offending entry, trimmed.
        entry: String,
        /// Why it failed to parse.
        source: EmailError,
    },
}

/// A non-empty list of email addresses.
///
/// Customers may have several billing contacts; addresses are entered as a
/// comma-separated string and each entry must parse as an [`Email`].
///
/// ## Examples
///
/// ```
/// use gardu_core::EmailList;
///
/// let list = EmailList::parse("a@b.co, c@d.co").unwrap();
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.to_string(), "a@b.co, c@d.co");
///
/// assert!(EmailList::parse("").is_err());
/// assert!(EmailList::parse("a@b.co, not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailList(Vec<Email>);

impl EmailList {
    /// Parse a comma-separated list of email addresses.
    ///
    /// Entries are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `EmailListError::Empty` if the input contains no addresses,
    /// or `EmailListError::InvalidEntry` for the first entry that fails to
    /// parse.
    pub fn parse(s: &str) -> Result<Self, EmailListError> {
        if s.trim().is_empty() {
            return Err(EmailListError::Empty);
        }

        let addresses = s
            .split(',')
            .map(str::trim)
            .map(|entry| {
                Email::parse(entry).map_err(|source| EmailListError::InvalidEntry {
                    entry: entry.to_owned(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(addresses))
    }

    /// Returns the addresses as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Email] {
        &self.0
    }

    /// Returns the number of addresses in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list is empty (never true for a parsed list).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the addresses.
    pub fn iter(&self) -> std::slice::Iter<'_, Email> {
        self.0.iter()
    }
}

impl fmt::Display for EmailList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for email in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{email}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for EmailList {
    type Err = EmailListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a EmailList {
    type Item = &'a Email;
    type IntoIter = std::slice::Iter<'a, Email>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for EmailList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EmailList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        // TEXT or CITEXT - both work
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
