//! Document-store style object identifiers.
//!
//! An identifier is 12 bytes rendered as 24 hexadecimal characters: 4 bytes of
//! big-endian seconds since the Unix epoch followed by 8 random bytes.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Error, Result};
use crate::validation::is_object_id;

/// A validated 24-character hexadecimal identifier, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh identifier stamped with the current time
    pub fn generate() -> Self {
        let seconds = chrono::Utc::now().timestamp().clamp(0, i64::from(u32::MAX)) as u32;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        rand::thread_rng().fill_bytes(&mut bytes[4..]);

        Self(hex::encode(bytes))
    }

    /// Parse an identifier, accepting either hex case
    pub fn parse(value: &str) -> Result<Self> {
        if !is_object_id(value) {
            return Err(Error::validation_field(
                format!("'{}' is not a valid object identifier", value),
                "id",
            ));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
