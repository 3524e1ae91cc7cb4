//! Broker-facing data types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Broker-assigned ticket for an order or position
pub type Ticket = u64;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Wire name used in order comments and bridge requests
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current top-of-book quote
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quote {
    pub bid: Decimal,
    pub ask: Decimal,
}

impl Quote {
    /// Midpoint used as the grid anchor price
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }
}

/// Symbol metadata from the broker
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SymbolMeta {
    /// Minimum price increment ("point")
    pub point: Decimal,
    /// Decimal precision of quoted prices
    pub digits: u32,
}

impl SymbolMeta {
    /// Pip size: 10x the point on 3/5-digit symbols, otherwise the point itself
    pub fn pip(&self) -> Decimal {
        if self.digits == 3 || self.digits == 5 {
            self.point * Decimal::TEN
        } else {
            self.point
        }
    }

    /// Round a price to the symbol's quoted precision
    pub fn round_price(&self, price: Decimal) -> Decimal {
        price.round_dp(self.digits)
    }
}

/// Account balance and equity, fetched fresh each cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub balance: Decimal,
    pub equity: Decimal,
}

/// An open position at the broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub ticket: Ticket,
    pub side: OrderSide,
    pub volume: Decimal,
    pub open_price: Decimal,
    /// Current floating profit in account currency
    pub profit: Decimal,
    /// Free-text comment carrying the layer tag
    pub comment: String,
}

/// A resting stop order at the broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrder {
    pub ticket: Ticket,
    pub side: OrderSide,
    pub price: Decimal,
    pub volume: Decimal,
    pub comment: String,
}

/// Request to place one stop order leg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopOrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub price: Decimal,
    pub volume: Decimal,
    pub comment: String,
}

/// Broker acknowledgement of a placement/cancel/close call
///
/// Rejections are values, not errors: one rejected leg must never abort
/// its siblings in the same batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    pub accepted: bool,
    /// Broker return code (10009 = done on MT5)
    pub retcode: i32,
    pub reason: Option<String>,
    pub ticket: Option<Ticket>,
}

impl OrderAck {
    /// Successful acknowledgement
    pub fn done(ticket: Ticket) -> Self {
        Self {
            accepted: true,
            retcode: 10009,
            reason: None,
            ticket: Some(ticket),
        }
    }

    /// Rejection with a broker reason
    pub fn rejected(retcode: i32, reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            retcode,
            reason: Some(reason.into()),
            ticket: None,
        }
    }
}
