//! Entity identity system using type-prefixed ULIDs
//!
//! Generated ids look like `PRJ-01HQ3K4N5M6P7R8S9T0VWXYZAB`. Ids are opaque
//! strings though: the seeded sample records keep their literal ids (`"1"`,
//! `"2"`, ...) and any non-blank string is accepted as a reference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefixes used when generating ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityPrefix {
    /// Client (customer)
    Cli,
    /// Seller (sales representative)
    Sel,
    /// Project
    Prj,
    /// Extra item on a project
    Ext,
    /// Measurement on a project
    Mea,
    /// Image attached to a project
    Img,
    /// File attached to a project
    File,
}

impl EntityPrefix {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Cli => "CLI",
            EntityPrefix::Sel => "SEL",
            EntityPrefix::Prj => "PRJ",
            EntityPrefix::Ext => "EXT",
            EntityPrefix::Mea => "MEA",
            EntityPrefix::Img => "IMG",
            EntityPrefix::File => "FILE",
        }
    }

    /// Get all valid prefixes
    pub fn all() -> &'static [EntityPrefix] {
        &[
            EntityPrefix::Cli,
            EntityPrefix::Sel,
            EntityPrefix::Prj,
            EntityPrefix::Ext,
            EntityPrefix::Mea,
            EntityPrefix::Img,
            EntityPrefix::File,
        ]
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CLI" => Ok(EntityPrefix::Cli),
            "SEL" => Ok(EntityPrefix::Sel),
            "PRJ" => Ok(EntityPrefix::Prj),
            "EXT" => Ok(EntityPrefix::Ext),
            "MEA" => Ok(EntityPrefix::Mea),
            "IMG" => Ok(EntityPrefix::Img),
            "FILE" => Ok(EntityPrefix::File),
            _ => Err(IdParseError::InvalidPrefix(s.to_string())),
        }
    }
}

/// A unique, opaque entity identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh id with the given prefix
    pub fn new(prefix: EntityPrefix) -> Self {
        Self::from_parts(prefix, Ulid::new())
    }

    /// Create an EntityId from a prefix and existing ULID
    pub fn from_parts(prefix: EntityPrefix, ulid: Ulid) -> Self {
        Self(format!("{}-{}", prefix, ulid))
    }

    /// Parse an EntityId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    /// The prefix, if this id was generated (seeded ids have none)
    pub fn prefix(&self) -> Option<EntityPrefix> {
        let (prefix, ulid) = self.0.split_once('-')?;
        Ulid::from_string(ulid).ok()?;
        prefix.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdParseError::Blank);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(IdParseError::Whitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for EntityId {
    /// Wrap a literal id without validation (seed data and tests)
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing entity IDs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("invalid entity prefix: '{0}' (valid: CLI, SEL, PRJ, EXT, MEA, IMG, FILE)")]
    InvalidPrefix(String),

    #[error("entity ID must not be blank")]
    Blank,

    #[error("entity ID must not contain whitespace: '{0}'")]
    Whitespace(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id = EntityId::new(EntityPrefix::Prj);
        assert!(id.to_string().starts_with("PRJ-"));
        assert_eq!(id.to_string().len(), 30); // PRJ- (4) + ULID (26) = 30
        assert_eq!(id.prefix(), Some(EntityPrefix::Prj));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = EntityId::new(EntityPrefix::Cli);
        let b = EntityId::new(EntityPrefix::Cli);
        assert_ne!(a, b);
    }

    #[test]
    fn test_seed_ids_are_opaque() {
        let id = EntityId::parse("1").unwrap();
        assert_eq!(id, "1");
        assert_eq!(id.prefix(), None);
    }

    #[test]
    fn test_entity_id_roundtrip() {
        let original = EntityId::new(EntityPrefix::File);
        let parsed = EntityId::parse(&original.to_string()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_entity_id_blank() {
        assert_eq!(EntityId::parse("   ").unwrap_err(), IdParseError::Blank);
    }

    #[test]
    fn test_entity_id_whitespace() {
        let err = EntityId::parse("PRJ 1").unwrap_err();
        assert!(matches!(err, IdParseError::Whitespace(_)));
    }

    #[test]
    fn test_all_prefixes_parse() {
        for prefix in EntityPrefix::all() {
            let id = EntityId::new(*prefix);
            assert_eq!(id.prefix(), Some(*prefix));
            assert_eq!(prefix.as_str().parse::<EntityPrefix>().unwrap(), *prefix);
        }
    }
}
