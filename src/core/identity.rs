//! Assessment identity using prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Prefix for persisted assessment records
const PREFIX: &str = "ASMT";

/// A unique assessment identifier: `ASMT-<ULID>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssessmentId(Ulid);

impl AssessmentId {
    /// Create a fresh id
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Get the ULID component
    pub fn ulid(&self) -> Ulid {
        self.0
    }

    /// Parse an id from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", PREFIX, self.0)
    }
}

impl FromStr for AssessmentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        if prefix.to_uppercase() != PREFIX {
            return Err(IdParseError::InvalidPrefix(prefix.to_string()));
        }
        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self(ulid))
    }
}

impl Serialize for AssessmentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssessmentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing assessment IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid id prefix: '{0}' (expected ASMT)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in id: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = AssessmentId::new();
        let s = id.to_string();
        assert!(s.starts_with("ASMT-"));
        let parsed: AssessmentId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_bad_prefix() {
        let err = "RISK-01HC2JB7SMQX7RS1Y0GFKBHPTD".parse::<AssessmentId>();
        assert!(matches!(err, Err(IdParseError::InvalidPrefix(_))));
    }

    #[test]
    fn test_parse_rejects_missing_delimiter() {
        let err = "ASMT01HC2JB7SMQX7RS1Y0GFKBHPTD".parse::<AssessmentId>();
        assert!(matches!(err, Err(IdParseError::MissingDelimiter(_))));
    }

    #[test]
    fn test_parse_rejects_bad_ulid() {
        let err = "ASMT-notaulid".parse::<AssessmentId>();
        assert!(matches!(err, Err(IdParseError::InvalidUlid(_, _))));
    }

    #[test]
    fn test_serde_as_string() {
        let id = AssessmentId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("ASMT-"));
        let parsed: AssessmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
