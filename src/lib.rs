//! # binance-userstream
//!
//! A typed adapter for the Binance user-data stream: raw WebSocket text
//! frames in, strongly typed account/order events out.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Shared newtypes, domain events, errors (always available)
//! 2. **Dispatch** — `Dispatcher` + `UserStreamHandler`: classify each
//!    frame by its `"e"` tag, build the typed event, invoke the handler.
//!    Pure and synchronous; every per-frame failure is logged and
//!    absorbed so the stream never dies over one bad frame.
//! 3. **Transport** — `UserStreamClient` (`ws-native` feature):
//!    `tokio-tungstenite` background task feeding the dispatcher in
//!    arrival order, with reconnect/backoff.
//!
//! Listen-key acquisition and keepalive (REST) are deliberately out of
//! scope; the transport takes the key as an opaque token.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use binance_userstream::prelude::*;
//!
//! struct Printer;
//!
//! impl UserStreamHandler for Printer {
//!     fn handle_account_snapshot(&mut self, ev: AccountSnapshot) -> Result<(), HandlerError> {
//!         println!("balances: {}", ev.balances.len());
//!         Ok(())
//!     }
//!     fn handle_execution_report(&mut self, ev: ExecutionReport) -> Result<(), HandlerError> {
//!         println!("{} {} {}", ev.symbol, ev.side, ev.status);
//!         Ok(())
//!     }
//! }
//!
//! let key = ListenKey::new(listen_key_from_rest);
//! let dispatcher = Dispatcher::new(key.clone(), Printer);
//! let mut client = UserStreamClient::new(key, WsConfig::default());
//! client.connect(dispatcher)?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): domain types, wire types, conversions.
pub mod domain;

/// Unified adapter error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layers 2–3: Dispatch + Transport ─────────────────────────────────────────

/// WebSocket layer: event classification, dispatcher, native transport.
pub mod ws;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{ListenKey, Side};

    // Domain events
    pub use crate::domain::account::{AccountSnapshot, AssetBalance};
    pub use crate::domain::execution::{
        ExecutionReport, OrderStatus, OrderType, TimeInForce,
    };

    // Errors
    pub use crate::error::{
        ClassificationError, DispatchError, HandlerError, MalformedEventError, WsError,
    };

    // Network
    pub use crate::network::{DEFAULT_WS_URL, TESTNET_WS_URL};

    // Dispatch
    pub use crate::ws::{Dispatcher, EventKind, UserStreamEvent, UserStreamHandler, WsConfig};

    // Transport
    #[cfg(feature = "ws-native")]
    pub use crate::ws::native::UserStreamClient;
}
