//! Wire types for the `executionReport` frame.
//!
//! Field names are the single-letter keys the feed sends. Side, order
//! type, and status arrive as raw strings and are validated during
//! conversion so a bad value can be reported by its wire key.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::shared::serde_util;

/// Raw `executionReport` payload.
#[derive(Deserialize, Debug, Clone)]
pub struct ExecutionReport {
    /// Symbol, e.g. `BTCUSDT`.
    #[serde(rename = "s")]
    pub symbol: String,

    /// Client order id. Defaults to absent.
    #[serde(rename = "c", default)]
    pub client_order_id: Option<String>,

    /// Exchange-assigned order id. Defaults to absent.
    #[serde(rename = "i", default)]
    pub order_id: Option<u64>,

    /// Side, `BUY` or `SELL`.
    #[serde(rename = "S")]
    pub side: String,

    /// Order type, e.g. `LIMIT`.
    #[serde(rename = "o")]
    pub order_type: String,

    /// Time in force, e.g. `GTC`. Defaults to absent.
    #[serde(rename = "f", default)]
    pub time_in_force: Option<String>,

    /// Current order status, e.g. `FILLED`.
    #[serde(rename = "X")]
    pub status: String,

    /// Original order quantity.
    #[serde(rename = "q")]
    pub orig_qty: Decimal,

    /// Cumulative filled quantity.
    #[serde(rename = "z")]
    pub executed_qty: Decimal,

    /// Cumulative quote quantity. Defaults to zero.
    #[serde(rename = "Z", default)]
    pub cum_quote_qty: Option<Decimal>,

    /// Order price. Defaults to zero (market orders carry none).
    #[serde(rename = "p", default)]
    pub price: Option<Decimal>,

    /// Event time. Defaults to absent.
    #[serde(rename = "E", default, with = "serde_util::timestamp_ms_opt")]
    pub event_time: Option<DateTime<Utc>>,

    /// Transaction time. Defaults to absent.
    #[serde(rename = "T", default, with = "serde_util::timestamp_ms_opt")]
    pub transaction_time: Option<DateTime<Utc>>,

    /// Reject reason. The feed sends the literal `NONE` when the order
    /// was not rejected; both that and omission map to absent.
    #[serde(rename = "r", default)]
    pub reject_reason: Option<String>,
}
