//! Customer installation number (IDPEL) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Idpel`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum IdpelError {
    /// The input string is empty.
    #[error("IDPEL cannot be empty")]
    Empty,
    /// The input contains whitespace.
    #[error("IDPEL cannot contain whitespace")]
    ContainsWhitespace,
}

/// A customer installation number (IDPEL).
///
/// IDPEL is the business identifier PLN assigns to each metered installation
/// and is the unique lookup key for customer records. It is immutable once
/// assigned.
///
/// ## Examples
///
/// ```
/// use gardu_core::Idpel;
///
/// assert!(Idpel::parse("521234567890").is_ok());
/// assert!(Idpel::parse("").is_err());
/// assert!(Idpel::parse("52 1234").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Idpel(String);

impl Idpel {
    /// Parse an `Idpel` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains whitespace.
    pub fn parse(s: &str) -> Result<Self, IdpelError> {
        if s.is_empty() {
            return Err(IdpelError::Empty);
        }

        if s.chars().any(char::is_whitespace) {
            return Err(IdpelError::ContainsWhitespace);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Idpel` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Idpel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Idpel {
    type Err = IdpelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Idpel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Idpel {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Idpel {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Idpel {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Idpel::parse("521234567890").is_ok());
        assert!(Idpel::parse("123").is_ok());
        // Non-numeric identifiers are accepted; some legacy records use them.
        assert!(Idpel::parse("LEGACY-42").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Idpel::parse(""), Err(IdpelError::Empty)));
    }

    #[test]
    fn test_parse_whitespace() {
        assert!(matches!(
            Idpel::parse("52 1234"),
            Err(IdpelError::ContainsWhitespace)
        ));
        assert!(matches!(
            Idpel::parse(" 123"),
            Err(IdpelError::ContainsWhitespace)
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        let idpel = Idpel::parse("123").unwrap();
        assert_eq!(idpel.to_string(), "123");
        assert_eq!(idpel.as_str(), "123");
    }

    #[test]
    fn test_serde_transparent() {
        let idpel = Idpel::parse("123").unwrap();
        let json = serde_json::to_string(&idpel).unwrap();
        assert_eq!(json, "\"123\"");
    }
}
