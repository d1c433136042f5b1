//! Conversion: wire::ExecutionReport → ExecutionReport (TryFrom + validation).

use rust_decimal::Decimal;

use super::wire;
use super::{ExecutionReport, OrderStatus, OrderType, TimeInForce, DISCRIMINATOR};
use crate::error::MalformedEventError;
use crate::shared::Side;

fn invalid(field: &'static str, value: &str) -> MalformedEventError {
    MalformedEventError::InvalidField {
        event: DISCRIMINATOR,
        field,
        reason: format!("unrecognized value \"{}\"", value),
    }
}

impl TryFrom<wire::ExecutionReport> for ExecutionReport {
    type Error = MalformedEventError;

    fn try_from(raw: wire::ExecutionReport) -> Result<Self, Self::Error> {
        let side = Side::from_str(&raw.side).ok_or_else(|| invalid("S", &raw.side))?;
        let order_type =
            OrderType::from_str(&raw.order_type).ok_or_else(|| invalid("o", &raw.order_type))?;
        let status =
            OrderStatus::from_str(&raw.status).ok_or_else(|| invalid("X", &raw.status))?;
        let time_in_force = raw
            .time_in_force
            .as_deref()
            .map(|f| TimeInForce::from_str(f).ok_or_else(|| invalid("f", f)))
            .transpose()?;

        Ok(Self {
            symbol: raw.symbol,
            client_order_id: raw.client_order_id,
            order_id: raw.order_id,
            side,
            order_type,
            time_in_force,
            status,
            orig_qty: raw.orig_qty,
            executed_qty: raw.executed_qty,
            cum_quote_qty: raw.cum_quote_qty.unwrap_or(Decimal::ZERO),
            price: raw.price.unwrap_or(Decimal::ZERO),
            event_time: raw.event_time,
            transaction_time: raw.transaction_time,
            reject_reason: raw.reject_reason.filter(|r| r != "NONE"),
        })
    }
}
