//! Account domain — point-in-time account snapshots from the user-data stream.

mod convert;
pub mod wire;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::MalformedEventError;

/// Discriminator tag for account snapshot frames.
pub const DISCRIMINATOR: &str = "outboundAccountInfo";

/// Free/locked amounts for a single asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetBalance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

impl AssetBalance {
    /// Free plus locked.
    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}

/// Point-in-time account state delivered by an `outboundAccountInfo` frame.
///
/// Immutable once constructed; a fresh snapshot arrives as a new event.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub maker_commission: i64,
    pub taker_commission: i64,
    pub buyer_commission: i64,
    pub seller_commission: i64,
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub can_deposit: bool,
    /// Time of the last account change.
    pub last_update: DateTime<Utc>,
    /// Event time, when the feed supplies one.
    pub event_time: Option<DateTime<Utc>>,
    /// Balances in the order the feed sent them.
    pub balances: Vec<AssetBalance>,
}

impl AccountSnapshot {
    /// Build the event from a decoded frame.
    ///
    /// Fails with [`MalformedEventError`] when a required field is
    /// missing or mistyped; the error names the discriminator and the
    /// offending detail.
    pub fn from_message(message: &serde_json::Value) -> Result<Self, MalformedEventError> {
        let raw: wire::AccountInfo =
            serde_json::from_value(message.clone()).map_err(|source| {
                MalformedEventError::Shape {
                    event: DISCRIMINATOR,
                    source,
                }
            })?;
        Ok(raw.into())
    }

    /// Balance entry for `asset`, if the snapshot carries one.
    pub fn balance(&self, asset: &str) -> Option<&AssetBalance> {
        self.balances.iter().find(|b| b.asset == asset)
    }
}
