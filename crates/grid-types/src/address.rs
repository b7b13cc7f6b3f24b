use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;

/// Canonicalized wallet address.
///
/// Addresses arrive from collaborators in mixed case. The marketplace
/// compares addresses constantly (transaction history, compensation
/// lookups), so canonicalization to lowercase happens once, here at the
/// boundary, instead of at every call site.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse and canonicalize an address.
    ///
    /// Leading/trailing whitespace is trimmed and the result is
    /// lowercased. Empty or internally-whitespaced input is rejected.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyAddress);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TypeError::AddressContainsWhitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// The canonical (lowercase) string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for log output (prefix + first 8 characters).
    pub fn short(&self) -> String {
        let head: String = self.0.chars().take(10).collect();
        format!("{head}\u{2026}")
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Deserialization goes through `parse` so a deserialized address is
// always canonical, same as one built in process.
impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lowercases() {
        let addr = Address::parse("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").unwrap();
        assert_eq!(addr.as_str(), "0x742d35cc6634c0532925a3b8d4c9db96c4b4d8b6");
    }

    #[test]
    fn parse_trims_whitespace() {
        let addr = Address::parse("  0xABC  ").unwrap();
        assert_eq!(addr.as_str(), "0xabc");
    }

    #[test]
    fn empty_address_rejected() {
        assert_eq!(Address::parse("").unwrap_err(), TypeError::EmptyAddress);
        assert_eq!(Address::parse("   ").unwrap_err(), TypeError::EmptyAddress);
    }

    #[test]
    fn interior_whitespace_rejected() {
        let err = Address::parse("0xab cd").unwrap_err();
        assert!(matches!(err, TypeError::AddressContainsWhitespace(_)));
    }

    #[test]
    fn mixed_case_addresses_compare_equal() {
        let a = Address::parse("0xAbCd").unwrap();
        let b = Address::parse("0xabcd").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn serde_roundtrip_is_canonical() {
        let json = "\"0xDeAdBeEf\"";
        let addr: Address = serde_json::from_str(json).unwrap();
        assert_eq!(addr.as_str(), "0xdeadbeef");
        let out = serde_json::to_string(&addr).unwrap();
        assert_eq!(out, "\"0xdeadbeef\"");
    }

    #[test]
    fn short_form() {
        let addr = Address::parse("0x742d35cc6634c0532925a3b8d4c9db96c4b4d8b6").unwrap();
        assert!(addr.short().starts_with("0x742d35cc"));
    }
}
