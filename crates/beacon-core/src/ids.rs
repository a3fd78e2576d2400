//! Strongly Typed Identifiers
//!
//! Tenant identifiers are externally assigned strings (e.g. `"acme"`), not
//! generated UUIDs: callers choose them when a tenant is provisioned and
//! they appear verbatim in blob-store keys and database rows. The newtype
//! prevents accidental mixups with other string parameters at compile time.
//!
//! # Example
//!
//! ```
//! use beacon_core::TenantId;
//!
//! let tenant: TenantId = "acme".parse().unwrap();
//! assert_eq!(tenant.as_str(), "acme");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Error type for tenant identifier parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTenantIdError {
    /// The identifier was empty or whitespace-only.
    #[error("tenant identifier must not be empty")]
    Empty,

    /// The identifier contains a character outside `[A-Za-z0-9._-]`.
    ///
    /// Tenant identifiers are embedded in blob-store keys
    /// (`"apns/<tenant>.p8"`) and URL paths, so the accepted alphabet is
    /// restricted to characters that are safe in both.
    #[error("tenant identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Strongly typed identifier for tenants.
///
/// All credentials, provider configuration, and device registrations are
/// scoped to exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Creates a tenant identifier, validating the raw string.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTenantIdError`] if the value is empty or contains a
    /// character outside `[A-Za-z0-9._-]`.
    pub fn new(raw: impl Into<String>) -> Result<Self, ParseTenantIdError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ParseTenantIdError::Empty);
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(ParseTenantIdError::InvalidCharacter(bad));
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = ParseTenantIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for TenantId {
    type Error = ParseTenantIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_new_accepts_typical_identifiers() {
        for raw in ["acme", "product-a", "org_7", "com.example.app"] {
            let id = TenantId::new(raw).unwrap();
            assert_eq!(id.as_str(), raw);
        }
    }

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(TenantId::new(""), Err(ParseTenantIdError::Empty));
        assert_eq!(TenantId::new("   "), Err(ParseTenantIdError::Empty));
    }

    #[test]
    fn test_new_rejects_unsafe_characters() {
        assert_eq!(
            TenantId::new("acme/evil"),
            Err(ParseTenantIdError::InvalidCharacter('/'))
        );
        assert_eq!(
            TenantId::new("a b"),
            Err(ParseTenantIdError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_from_str_roundtrip() {
        let id: TenantId = "acme".parse().unwrap();
        assert_eq!(id.to_string(), "acme");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = TenantId::new("acme").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"acme\"");

        let back: TenantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialization_validates() {
        let result: Result<TenantId, _> = serde_json::from_str("\"a/b\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_can_use_as_hashmap_key() {
        let mut map: HashMap<TenantId, u32> = HashMap::new();
        let a = TenantId::new("a").unwrap();
        let b = TenantId::new("b").unwrap();
        map.insert(a.clone(), 1);
        map.insert(b.clone(), 2);
        assert_eq!(map.get(&a), Some(&1));
        assert_eq!(map.get(&b), Some(&2));
    }

    #[test]
    fn test_error_display() {
        let err = TenantId::new("a/b").unwrap_err();
        assert!(err.to_string().contains("invalid character"));
    }
}
