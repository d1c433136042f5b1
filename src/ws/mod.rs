//! WebSocket layer — event classification, dispatch, native transport.
//!
//! The user-data stream is receive-only: the feed pushes tagged JSON
//! frames and this layer turns them into typed events. The dispatcher
//! (dispatcher.rs) is pure and synchronous; the `ws-native` feature adds
//! the `tokio-tungstenite` transport (native.rs) that feeds it.

pub mod dispatcher;

#[cfg(feature = "ws-native")]
pub mod native;

use crate::domain::account::{self, AccountSnapshot};
use crate::domain::execution::{self, ExecutionReport};
use crate::error::MalformedEventError;

pub use dispatcher::{Dispatcher, UserStreamHandler};

// ─── EventKind ───────────────────────────────────────────────────────────────

/// The fixed discriminator → variant table.
///
/// Adding an event kind means adding a variant here; the compiler then
/// points at every match that needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AccountSnapshot,
    ExecutionReport,
}

impl EventKind {
    /// Look a discriminator tag up in the table. `None` for tags this
    /// adapter does not know — the caller decides what that means.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            account::DISCRIMINATOR => Some(Self::AccountSnapshot),
            execution::DISCRIMINATOR => Some(Self::ExecutionReport),
            _ => None,
        }
    }

    /// The wire tag this variant is keyed by.
    pub fn tag(self) -> &'static str {
        match self {
            Self::AccountSnapshot => account::DISCRIMINATOR,
            Self::ExecutionReport => execution::DISCRIMINATOR,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ─── UserStreamEvent ─────────────────────────────────────────────────────────

/// A fully constructed event, one variant per recognized discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserStreamEvent {
    AccountSnapshot(AccountSnapshot),
    ExecutionReport(ExecutionReport),
}

impl UserStreamEvent {
    /// Construct the variant matching `kind` from a decoded frame.
    pub fn from_message(
        kind: EventKind,
        message: &serde_json::Value,
    ) -> Result<Self, MalformedEventError> {
        match kind {
            EventKind::AccountSnapshot => {
                AccountSnapshot::from_message(message).map(Self::AccountSnapshot)
            }
            EventKind::ExecutionReport => {
                ExecutionReport::from_message(message).map(Self::ExecutionReport)
            }
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::AccountSnapshot(_) => EventKind::AccountSnapshot,
            Self::ExecutionReport(_) => EventKind::ExecutionReport,
        }
    }
}

// ─── WsConfig ────────────────────────────────────────────────────────────────

/// Configuration for the native stream client.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Base URL; the listen key is appended as `{base}/ws/{key}`.
    pub base_url: String,
    pub reconnect: bool,
    pub base_reconnect_delay_ms: u32,
    pub max_reconnect_attempts: u32,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_WS_URL.to_string(),
            reconnect: true,
            base_reconnect_delay_ms: 2000,
            max_reconnect_attempts: 10,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_table_roundtrip() {
        for kind in [EventKind::AccountSnapshot, EventKind::ExecutionReport] {
            assert_eq!(EventKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_tag_is_none() {
        assert_eq!(EventKind::from_tag("unknownEventXYZ"), None);
        assert_eq!(EventKind::from_tag(""), None);
        // Tags are case-sensitive on the wire.
        assert_eq!(EventKind::from_tag("ExecutionReport"), None);
    }

    #[test]
    fn test_event_kind_matches_construction() {
        let msg = serde_json::json!({
            "e": "executionReport",
            "s": "BTCUSDT", "S": "BUY", "o": "LIMIT", "X": "NEW",
            "q": "1.0", "z": "0.0"
        });
        let event = UserStreamEvent::from_message(EventKind::ExecutionReport, &msg).unwrap();
        assert_eq!(event.kind(), EventKind::ExecutionReport);
    }
}
