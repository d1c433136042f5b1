//! Conversion: wire::AccountInfo → AccountSnapshot.

use super::wire;
use super::{AccountSnapshot, AssetBalance};

impl From<wire::Balance> for AssetBalance {
    fn from(raw: wire::Balance) -> Self {
        Self {
            asset: raw.asset,
            free: raw.free,
            locked: raw.locked,
        }
    }
}

impl From<wire::AccountInfo> for AccountSnapshot {
    fn from(raw: wire::AccountInfo) -> Self {
        Self {
            maker_commission: raw.maker_commission,
            taker_commission: raw.taker_commission,
            buyer_commission: raw.buyer_commission,
            seller_commission: raw.seller_commission,
            can_trade: raw.can_trade,
            can_withdraw: raw.can_withdraw,
            can_deposit: raw.can_deposit,
            last_update: raw.last_update,
            event_time: raw.event_time,
            balances: raw.balances.into_iter().map(Into::into).collect(),
        }
    }
}
