//! Per-cycle basket snapshot
//!
//! The basket is never stored: every cycle re-derives it from a fresh
//! gateway query, so the broker remains the single source of truth.

use crate::gateway::{GatewayError, MarketGateway, PendingOrder, Position};
use rust_decimal::Decimal;

/// All live positions and pending orders for the traded symbol
#[derive(Debug, Clone, Default)]
pub struct BasketSnapshot {
    pub positions: Vec<Position>,
    pub orders: Vec<PendingOrder>,
}

impl BasketSnapshot {
    /// Query the gateway for the current basket state
    pub async fn fetch(
        gateway: &dyn MarketGateway,
        symbol: &str,
    ) -> Result<Self, GatewayError> {
        let positions = gateway.positions(symbol).await?;
        let orders = gateway.pending_orders(symbol).await?;
        Ok(Self { positions, orders })
    }

    /// Aggregate floating profit across all open positions
    pub fn floating_pl(&self) -> Decimal {
        self.positions.iter().map(|p| p.profit).sum()
    }

    /// Total open volume across all positions
    pub fn total_volume(&self) -> Decimal {
        self.positions.iter().map(|p| p.volume).sum()
    }

    /// No open positions (pending orders may remain)
    pub fn is_flat(&self) -> bool {
        self.positions.is_empty()
    }

    /// No positions and no pending orders
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::OrderSide;
    use rust_decimal_macros::dec;

    fn position(volume: Decimal, profit: Decimal) -> Position {
        Position {
            ticket: 1,
            side: OrderSide::Buy,
            volume,
            open_price: dec!(147.2),
            profit,
            comment: "HMv1|side=BUY|layer=0".to_string(),
        }
    }

    #[test]
    fn test_aggregates() {
        let snapshot = BasketSnapshot {
            positions: vec![position(dec!(0.01), dec!(1.20)), position(dec!(0.02), dec!(-0.45))],
            orders: vec![],
        };
        assert_eq!(snapshot.floating_pl(), dec!(0.75));
        assert_eq!(snapshot.total_volume(), dec!(0.03));
        assert!(!snapshot.is_flat());
    }

    #[test]
    fn test_empty_vs_flat() {
        let empty = BasketSnapshot::default();
        assert!(empty.is_empty());
        assert!(empty.is_flat());

        let flat = BasketSnapshot {
            positions: vec![],
            orders: vec![PendingOrder {
                ticket: 2,
                side: OrderSide::Sell,
                price: dec!(146.98),
                volume: dec!(0.01),
                comment: "HMv1|side=SELL|layer=0".to_string(),
            }],
        };
        assert!(flat.is_flat());
        assert!(!flat.is_empty());
    }
}
