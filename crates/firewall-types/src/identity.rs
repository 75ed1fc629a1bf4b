//! Identity types for the Action Firewall
//!
//! Engine objects are keyed by strongly typed wrappers around UUIDs to
//! prevent accidental mixing of different ID types. External parties
//! (agents, recipients) are named by opaque `Address` values.

use crate::error::{FirewallError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID types with common implementations
macro_rules! define_id_type {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse from a string (with or without prefix)
            pub fn parse(s: &str) -> Result<Self> {
                let s = s.strip_prefix(concat!($prefix, "_")).unwrap_or(s);
                let uuid = Uuid::parse_str(s).map_err(|_| FirewallError::InvalidInput {
                    field: stringify!($name).to_string(),
                    reason: format!("not a valid {} identifier", $prefix),
                })?;
                Ok(Self(uuid))
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id_type!(AdminCapId, "admin", "Unique identifier for an administrator credential");
define_id_type!(VaultId, "vault", "Unique identifier for a pooled-balance vault");
define_id_type!(PermissionId, "perm", "Unique identifier for a delegated spending permission");
define_id_type!(ProposalId, "prop", "Unique identifier for a transfer proposal");

/// Number of bytes in an external address.
pub const ADDRESS_BYTES: usize = 32;

/// An opaque 32-byte external address, hex-encoded with 0x prefix.
///
/// Addresses name parties outside the engine: the agent a permission is
/// granted to and the recipient of a transfer. The engine never interprets
/// them beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Generate a fresh random address.
    pub fn random() -> Self {
        let bytes: [u8; ADDRESS_BYTES] = rand::random();
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Parse and normalize an address string.
    ///
    /// Accepts exactly `0x` followed by 64 hex digits; uppercase hex is
    /// normalized to lowercase.
    pub fn parse(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix("0x")
            .ok_or_else(|| FirewallError::InvalidAddress { value: s.to_string() })?;
        if body.len() != ADDRESS_BYTES * 2 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FirewallError::InvalidAddress { value: s.to_string() });
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        let id = PermissionId::new();
        let s = id.to_string();
        assert!(s.starts_with("perm_"));
        assert_eq!(PermissionId::parse(&s).unwrap(), id);
    }

    #[test]
    fn test_id_parse_without_prefix() {
        let id = VaultId::new();
        let bare = id.as_uuid().to_string();
        assert_eq!(VaultId::parse(&bare).unwrap(), id);
    }

    #[test]
    fn test_id_parse_rejects_garbage() {
        assert!(AdminCapId::parse("not-an-id").is_err());
    }

    #[test]
    fn test_address_random_shape() {
        let addr = Address::random();
        assert!(addr.as_str().starts_with("0x"));
        assert_eq!(addr.as_str().len(), 2 + ADDRESS_BYTES * 2);
    }

    #[test]
    fn test_address_parse_normalizes_case() {
        let addr = Address::random();
        let upper = format!("0x{}", addr.as_str()[2..].to_ascii_uppercase());
        assert_eq!(Address::parse(&upper).unwrap(), addr);
    }

    #[test]
    fn test_address_serializes_as_plain_string() {
        let addr = Address::random();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.as_str()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        assert!(Address::parse("abcdef").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse(&format!("0x{}", "zz".repeat(32))).is_err());
    }
}
