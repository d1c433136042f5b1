//! Shared newtypes and serde helpers used across the domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize
//! identically to the raw format the feed sends, so they can be used
//! directly in wire types without conversion overhead.

pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── ListenKey ───────────────────────────────────────────────────────────────

/// Newtype for the user-data stream's connection identity.
///
/// The transport obtains it out of band (REST); this crate treats it as
/// an opaque token used to build the stream URL and to tag log output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenKey(String);

impl ListenKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ListenKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ListenKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for ListenKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ListenKey(s.to_string()))
    }
}

impl Serialize for ListenKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ListenKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ListenKey(s))
    }
}

// ─── Side ────────────────────────────────────────────────────────────────────

/// Order side as the feed spells it: `BUY` or `SELL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Parse the wire spelling. `None` for anything unlisted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
