//! Wire types for the `outboundAccountInfo` frame.
//!
//! Field names are the single-letter keys the feed sends. Quantities
//! arrive as decimal strings, timestamps as epoch milliseconds.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::shared::serde_util;

/// Raw `outboundAccountInfo` payload.
#[derive(Deserialize, Debug, Clone)]
pub struct AccountInfo {
    /// Maker commission rate, basis points.
    #[serde(rename = "m")]
    pub maker_commission: i64,

    /// Taker commission rate, basis points.
    #[serde(rename = "t")]
    pub taker_commission: i64,

    /// Buyer commission rate, basis points.
    #[serde(rename = "b")]
    pub buyer_commission: i64,

    /// Seller commission rate, basis points.
    #[serde(rename = "s")]
    pub seller_commission: i64,

    /// Defaults to `false` when the feed omits it.
    #[serde(rename = "T", default)]
    pub can_trade: bool,

    /// Defaults to `false` when the feed omits it.
    #[serde(rename = "W", default)]
    pub can_withdraw: bool,

    /// Defaults to `false` when the feed omits it.
    #[serde(rename = "D", default)]
    pub can_deposit: bool,

    /// Time of the last account change.
    #[serde(rename = "u", with = "serde_util::timestamp_ms")]
    pub last_update: DateTime<Utc>,

    /// Event time. Not every frame carries it.
    #[serde(rename = "E", default, with = "serde_util::timestamp_ms_opt")]
    pub event_time: Option<DateTime<Utc>>,

    /// Per-asset balances, in feed order. Defaults to empty when omitted.
    #[serde(rename = "B", default)]
    pub balances: Vec<Balance>,
}

/// One `{a, f, l}` balance entry.
#[derive(Deserialize, Debug, Clone)]
pub struct Balance {
    #[serde(rename = "a")]
    pub asset: String,

    #[serde(rename = "f")]
    pub free: Decimal,

    #[serde(rename = "l")]
    pub locked: Decimal,
}
