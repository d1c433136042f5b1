//! Network URL constants for the user-data stream.

/// Default WebSocket base URL (production).
pub const DEFAULT_WS_URL: &str = "wss://stream.binance.com:9443";

/// WebSocket base URL for the spot testnet.
pub const TESTNET_WS_URL: &str = "wss://stream.testnet.binance.vision";
