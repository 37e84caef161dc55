use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Document-style identifier: 24 lowercase hex characters encoding 12 bytes,
/// a 4-byte big-endian unix-timestamp prefix followed by 8 random bytes.
///
/// Generated by the application, never by the database; stored as TEXT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        let secs = chrono::Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        rand::rng().fill(&mut bytes[4..]);

        let mut hex = String::with_capacity(24);
        for b in bytes {
            hex.push(HEX[(b >> 4) as usize] as char);
            hex.push(HEX[(b & 0x0f) as usize] as char);
        }
        Self(hex)
    }

    /// Accepts exactly 24 hex characters; uppercase input is normalized to
    /// lowercase so equal identifiers compare equal.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        if input.len() == 24 && input.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(input.to_ascii_lowercase()))
        } else {
            Err(CoreError::InvalidId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creation time recovered from the timestamp prefix.
    pub fn timestamp(&self) -> Option<Timestamp> {
        let secs = u32::from_str_radix(self.0.get(..8)?, 16).ok()?;
        chrono::DateTime::from_timestamp(i64::from(secs), 0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Work state shared by projects and tasks. The wire strings are the exact
/// client-facing values ("In Progress" keeps its space); stored as TEXT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Status {
    #[default]
    #[sqlx(rename = "Pending")]
    Pending,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    #[sqlx(rename = "Completed")]
    Completed,
}

/// User role, serialized uppercase on the wire and in token claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    #[sqlx(rename = "USER")]
    User,
    #[sqlx(rename = "MANAGER")]
    Manager,
    #[sqlx(rename = "ADMIN")]
    Admin,
}
