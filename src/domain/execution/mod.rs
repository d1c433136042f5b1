//! Execution domain — per-order lifecycle updates from the user-data stream.

mod convert;
pub mod wire;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::MalformedEventError;
use crate::shared::Side;

/// Discriminator tag for execution report frames.
pub const DISCRIMINATOR: &str = "executionReport";

// ─── OrderType ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Limit,
    Market,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
}

impl OrderType {
    /// Parse the wire spelling. `None` for anything unlisted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LIMIT" => Some(Self::Limit),
            "MARKET" => Some(Self::Market),
            "STOP_LOSS" => Some(Self::StopLoss),
            "STOP_LOSS_LIMIT" => Some(Self::StopLossLimit),
            "TAKE_PROFIT" => Some(Self::TakeProfit),
            "TAKE_PROFIT_LIMIT" => Some(Self::TakeProfitLimit),
            "LIMIT_MAKER" => Some(Self::LimitMaker),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::StopLoss => "STOP_LOSS",
            Self::StopLossLimit => "STOP_LOSS_LIMIT",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
            Self::LimitMaker => "LIMIT_MAKER",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── OrderStatus ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    PendingCancel,
    Rejected,
    Expired,
}

impl OrderStatus {
    /// Parse the wire spelling. `None` for anything unlisted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(Self::New),
            "PARTIALLY_FILLED" => Some(Self::PartiallyFilled),
            "FILLED" => Some(Self::Filled),
            "CANCELED" => Some(Self::Canceled),
            "PENDING_CANCEL" => Some(Self::PendingCancel),
            "REJECTED" => Some(Self::Rejected),
            "EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Canceled => "CANCELED",
            Self::PendingCancel => "PENDING_CANCEL",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Whether the order can still trade.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::New | Self::PartiallyFilled | Self::PendingCancel)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── TimeInForce ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    Gtc,
    Ioc,
    Fok,
}

impl TimeInForce {
    /// Parse the wire spelling. `None` for anything unlisted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GTC" => Some(Self::Gtc),
            "IOC" => Some(Self::Ioc),
            "FOK" => Some(Self::Fok),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
        }
    }
}

// ─── ExecutionReport ─────────────────────────────────────────────────────────

/// One order lifecycle update delivered by an `executionReport` frame.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub symbol: String,
    /// Absent when the feed omits `c`.
    pub client_order_id: Option<String>,
    /// Absent when the feed omits `i`.
    pub order_id: Option<u64>,
    pub side: Side,
    pub order_type: OrderType,
    /// Absent when the feed omits `f`.
    pub time_in_force: Option<TimeInForce>,
    pub status: OrderStatus,
    /// Original order quantity.
    pub orig_qty: Decimal,
    /// Cumulative filled quantity.
    pub executed_qty: Decimal,
    /// Cumulative quote quantity. Zero when the feed omits `Z`.
    pub cum_quote_qty: Decimal,
    /// Order price. Zero when the feed omits `p`.
    pub price: Decimal,
    pub event_time: Option<DateTime<Utc>>,
    pub transaction_time: Option<DateTime<Utc>>,
    /// Absent when the order was not rejected (`r` omitted or `NONE`).
    pub reject_reason: Option<String>,
}

impl ExecutionReport {
    /// Build the event from a decoded frame.
    ///
    /// Fails with [`MalformedEventError`] when a required field is
    /// missing or mistyped; the error names the discriminator and the
    /// offending detail.
    pub fn from_message(message: &serde_json::Value) -> Result<Self, MalformedEventError> {
        let raw: wire::ExecutionReport =
            serde_json::from_value(message.clone()).map_err(|source| {
                MalformedEventError::Shape {
                    event: DISCRIMINATOR,
                    source,
                }
            })?;
        raw.try_into()
    }

    /// Quantity still open on the order.
    pub fn remaining_qty(&self) -> Decimal {
        self.orig_qty - self.executed_qty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_json() -> serde_json::Value {
        serde_json::json!({
            "e": "executionReport",
            "E": 1499405658658u64,
            "s": "ETHBTC",
            "c": "mUvoqJxFIILMdfAW5iGSOW",
            "S": "BUY",
            "o": "LIMIT",
            "f": "GTC",
            "q": "1.00000000",
            "p": "0.10264410",
            "X": "NEW",
            "r": "NONE",
            "i": 4293153u64,
            "z": "0.00000000",
            "Z": "0.00000000",
            "T": 1499405658657u64
        })
    }

    #[test]
    fn test_from_message_full_payload() {
        let report = ExecutionReport::from_message(&report_json()).unwrap();

        assert_eq!(report.symbol, "ETHBTC");
        assert_eq!(report.client_order_id.as_deref(), Some("mUvoqJxFIILMdfAW5iGSOW"));
        assert_eq!(report.order_id, Some(4293153));
        assert_eq!(report.side, Side::Buy);
        assert_eq!(report.order_type, OrderType::Limit);
        assert_eq!(report.time_in_force, Some(TimeInForce::Gtc));
        assert_eq!(report.status, OrderStatus::New);
        assert_eq!(report.orig_qty, "1.00000000".parse().unwrap());
        assert_eq!(report.executed_qty, Decimal::ZERO);
        assert_eq!(report.price, "0.10264410".parse().unwrap());
        assert_eq!(report.event_time.unwrap().timestamp_millis(), 1_499_405_658_658);
        assert_eq!(report.transaction_time.unwrap().timestamp_millis(), 1_499_405_658_657);
        // "NONE" normalizes to no rejection.
        assert_eq!(report.reject_reason, None);
        assert_eq!(report.remaining_qty(), "1.00000000".parse().unwrap());
    }

    #[test]
    fn test_from_message_minimal_payload_defaults() {
        let msg = serde_json::json!({
            "e": "executionReport",
            "s": "BTCUSDT", "S": "SELL", "o": "MARKET", "X": "FILLED",
            "q": "2.0", "z": "2.0"
        });
        let report = ExecutionReport::from_message(&msg).unwrap();

        assert_eq!(report.client_order_id, None);
        assert_eq!(report.order_id, None);
        assert_eq!(report.time_in_force, None);
        assert_eq!(report.price, Decimal::ZERO);
        assert_eq!(report.cum_quote_qty, Decimal::ZERO);
        assert_eq!(report.event_time, None);
        assert_eq!(report.transaction_time, None);
        assert_eq!(report.reject_reason, None);
        assert_eq!(report.remaining_qty(), Decimal::ZERO);
    }

    #[test]
    fn test_from_message_rejected_order_keeps_reason() {
        let msg = serde_json::json!({
            "e": "executionReport",
            "s": "BTCUSDT", "S": "BUY", "o": "LIMIT", "X": "REJECTED",
            "q": "1.0", "z": "0.0", "r": "INSUFFICIENT_BALANCE"
        });
        let report = ExecutionReport::from_message(&msg).unwrap();
        assert_eq!(report.status, OrderStatus::Rejected);
        assert_eq!(report.reject_reason.as_deref(), Some("INSUFFICIENT_BALANCE"));
    }

    #[test]
    fn test_from_message_unlisted_side_names_field() {
        let msg = serde_json::json!({
            "e": "executionReport",
            "s": "BTCUSDT", "S": "SIDEWAYS", "o": "LIMIT", "X": "NEW",
            "q": "1.0", "z": "0.0"
        });
        let err = ExecutionReport::from_message(&msg).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("executionReport"));
        assert!(text.contains("\"S\""));
        assert!(text.contains("SIDEWAYS"));
    }

    #[test]
    fn test_from_message_missing_required_quantity() {
        let msg = serde_json::json!({
            "e": "executionReport",
            "s": "BTCUSDT", "S": "BUY", "o": "LIMIT", "X": "NEW",
            "z": "0.0"
        });
        let err = ExecutionReport::from_message(&msg).unwrap_err();
        assert_eq!(err.event(), DISCRIMINATOR);
    }

    #[test]
    fn test_from_message_non_numeric_quantity_is_shape_error() {
        let msg = serde_json::json!({
            "e": "executionReport",
            "s": "BTCUSDT", "S": "BUY", "o": "LIMIT", "X": "NEW",
            "q": "lots", "z": "0.0"
        });
        let err = ExecutionReport::from_message(&msg).unwrap_err();
        assert!(err.to_string().contains("executionReport"));
    }
}
