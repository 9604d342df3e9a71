//! Record identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Error};

/// An opaque, platform-assigned record identifier.
///
/// Creatio ids are typically UUID-shaped, but the platform treats them as
/// opaque strings and so does this type: the only validation is that the
/// value can appear inside the `Collection(<id>)` path grammar without
/// breaking it.
///
/// # Example
///
/// ```
/// use creatio_core::RecordId;
///
/// let id = RecordId::new("a2c63bf2-62f2-4bbd-9c61-1a9b0459d91a").unwrap();
/// assert_eq!(id.as_str(), "a2c63bf2-62f2-4bbd-9c61-1a9b0459d91a");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a new record id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or contains characters that
    /// cannot appear in a single-record path segment.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(ConfigError::RecordId {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        for c in s.chars() {
            if c == '(' || c == ')' || c == '/' || c == '?' || c.is_whitespace() {
                return Err(ConfigError::RecordId {
                    value: s.to_string(),
                    reason: format!("contains invalid character '{}'", c),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuid_shaped_id() {
        assert!(RecordId::new("a2c63bf2-62f2-4bbd-9c61-1a9b0459d91a").is_ok());
    }

    #[test]
    fn accepts_non_uuid_opaque_id() {
        // Ids are opaque; nothing requires UUID shape
        assert!(RecordId::new("42").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(RecordId::new("").is_err());
    }

    #[test]
    fn rejects_path_breaking_characters() {
        assert!(RecordId::new("abc)def").is_err());
        assert!(RecordId::new("abc/def").is_err());
        assert!(RecordId::new("abc def").is_err());
    }
}
