//! In-memory paper gateway
//!
//! Simulated broker with the same surface as the live bridge. Used for
//! paper mode and as the test double for the basket manager: it keeps a
//! book of pending orders and positions, assigns tickets monotonically,
//! and counts mutating calls so tests can assert on them.

use super::{
    AccountSnapshot, GatewayError, MarketGateway, OrderAck, OrderSide, PendingOrder, Position,
    Quote, StopOrderRequest, SymbolMeta, Ticket,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::RwLock;

struct PaperState {
    account: AccountSnapshot,
    quote: Quote,
    meta: SymbolMeta,
    positions: Vec<Position>,
    orders: Vec<PendingOrder>,
    next_ticket: Ticket,
    placements: usize,
    closes: usize,
    cancels: usize,
    reject_placements: bool,
    reject_closes: bool,
}

/// Simulated market gateway
pub struct PaperGateway {
    state: Arc<RwLock<PaperState>>,
}

impl PaperGateway {
    /// Create a paper gateway seeded with the given account and market state
    pub fn new(account: AccountSnapshot, quote: Quote, meta: SymbolMeta) -> Self {
        Self {
            state: Arc::new(RwLock::new(PaperState {
                account,
                quote,
                meta,
                positions: vec![],
                orders: vec![],
                next_ticket: 1,
                placements: 0,
                closes: 0,
                cancels: 0,
                reject_placements: false,
                reject_closes: false,
            })),
        }
    }

    /// Paper gateway for a generic 3-digit symbol with a flat account
    pub fn with_defaults() -> Self {
        Self::new(
            AccountSnapshot {
                balance: dec!(1000),
                equity: dec!(1000),
            },
            Quote {
                bid: dec!(147.100),
                ask: dec!(147.104),
            },
            SymbolMeta {
                point: dec!(0.001),
                digits: 3,
            },
        )
    }

    /// Overwrite the account snapshot
    pub async fn set_account(&self, balance: Decimal, equity: Decimal) {
        let mut state = self.state.write().await;
        state.account = AccountSnapshot { balance, equity };
    }

    /// Make subsequent placements come back rejected
    pub async fn set_reject_placements(&self, reject: bool) {
        self.state.write().await.reject_placements = reject;
    }

    /// Make subsequent position closes come back rejected
    pub async fn set_reject_closes(&self, reject: bool) {
        self.state.write().await.reject_closes = reject;
    }

    /// Insert an open position directly, returning its ticket
    pub async fn push_position(
        &self,
        side: OrderSide,
        volume: Decimal,
        profit: Decimal,
        comment: &str,
    ) -> Ticket {
        let mut state = self.state.write().await;
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        let open_price = state.quote.mid();
        state.positions.push(Position {
            ticket,
            side,
            volume,
            open_price,
            profit,
            comment: comment.to_string(),
        });
        ticket
    }

    /// Convert a pending order into an open position with the given profit
    pub async fn fill_order(&self, ticket: Ticket, profit: Decimal) -> bool {
        let mut state = self.state.write().await;
        let Some(index) = state.orders.iter().position(|o| o.ticket == ticket) else {
            return false;
        };
        let order = state.orders.remove(index);
        state.positions.push(Position {
            ticket: order.ticket,
            side: order.side,
            volume: order.volume,
            open_price: order.price,
            profit,
            comment: order.comment,
        });
        true
    }

    /// Current pending order book
    pub async fn order_book(&self) -> Vec<PendingOrder> {
        self.state.read().await.orders.clone()
    }

    /// Current open positions
    pub async fn position_book(&self) -> Vec<Position> {
        self.state.read().await.positions.clone()
    }

    /// Number of placement attempts seen (accepted or rejected)
    pub async fn placement_count(&self) -> usize {
        self.state.read().await.placements
    }

    /// Number of position-close calls seen
    pub async fn close_count(&self) -> usize {
        self.state.read().await.closes
    }

    /// Number of order-cancel calls seen
    pub async fn cancel_count(&self) -> usize {
        self.state.read().await.cancels
    }
}

#[async_trait]
impl MarketGateway for PaperGateway {
    async fn quote(&self, _symbol: &str) -> Result<Quote, GatewayError> {
        Ok(self.state.read().await.quote)
    }

    async fn symbol_meta(&self, _symbol: &str) -> Result<SymbolMeta, GatewayError> {
        Ok(self.state.read().await.meta)
    }

    async fn account(&self) -> Result<AccountSnapshot, GatewayError> {
        Ok(self.state.read().await.account)
    }

    async fn positions(&self, _symbol: &str) -> Result<Vec<Position>, GatewayError> {
        Ok(self.state.read().await.positions.clone())
    }

    async fn pending_orders(&self, _symbol: &str) -> Result<Vec<PendingOrder>, GatewayError> {
        Ok(self.state.read().await.orders.clone())
    }

    async fn place_stop_order(&self, request: &StopOrderRequest) -> Result<OrderAck, GatewayError> {
        let mut state = self.state.write().await;
        state.placements += 1;

        if state.reject_placements {
            return Ok(OrderAck::rejected(10016, "rejected by paper gateway"));
        }
        if request.volume <= Decimal::ZERO {
            return Ok(OrderAck::rejected(10014, "invalid volume"));
        }

        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.orders.push(PendingOrder {
            ticket,
            side: request.side,
            price: request.price,
            volume: request.volume,
            comment: request.comment.clone(),
        });
        tracing::debug!(ticket, side = %request.side, price = %request.price, "paper stop placed");
        Ok(OrderAck::done(ticket))
    }

    async fn close_position(
        &self,
        ticket: Ticket,
        _volume: Decimal,
        _comment: &str,
    ) -> Result<OrderAck, GatewayError> {
        let mut state = self.state.write().await;
        state.closes += 1;
        if state.reject_closes {
            return Ok(OrderAck::rejected(10004, "requote"));
        }
        let Some(index) = state.positions.iter().position(|p| p.ticket == ticket) else {
            return Ok(OrderAck::rejected(10013, "unknown position"));
        };
        state.positions.remove(index);
        Ok(OrderAck::done(ticket))
    }

    async fn cancel_order(&self, ticket: Ticket, _comment: &str) -> Result<OrderAck, GatewayError> {
        let mut state = self.state.write().await;
        state.cancels += 1;
        let Some(index) = state.orders.iter().position(|o| o.ticket == ticket) else {
            return Ok(OrderAck::rejected(10013, "unknown order"));
        };
        state.orders.remove(index);
        Ok(OrderAck::done(ticket))
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_place_and_cancel() {
        let gateway = PaperGateway::with_defaults();

        let ack = gateway
            .place_stop_order(&StopOrderRequest {
                symbol: "USDJPY".to_string(),
                side: OrderSide::Buy,
                price: dec!(147.220),
                volume: dec!(0.01),
                comment: "HMv1|side=BUY|layer=0".to_string(),
            })
            .await
            .unwrap();
        assert!(ack.accepted);

        let orders = gateway.order_book().await;
        assert_eq!(orders.len(), 1);

        let ack = gateway
            .cancel_order(orders[0].ticket, "HMv1|remove")
            .await
            .unwrap();
        assert!(ack.accepted);
        assert!(gateway.order_book().await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_volume_rejected() {
        let gateway = PaperGateway::with_defaults();

        let ack = gateway
            .place_stop_order(&StopOrderRequest {
                symbol: "USDJPY".to_string(),
                side: OrderSide::Sell,
                price: dec!(146.980),
                volume: dec!(0),
                comment: String::new(),
            })
            .await
            .unwrap();
        assert!(!ack.accepted);
        assert_eq!(gateway.placement_count().await, 1);
        assert!(gateway.order_book().await.is_empty());
    }

    #[tokio::test]
    async fn test_fill_converts_order_to_position() {
        let gateway = PaperGateway::with_defaults();

        let ack = gateway
            .place_stop_order(&StopOrderRequest {
                symbol: "USDJPY".to_string(),
                side: OrderSide::Buy,
                price: dec!(147.220),
                volume: dec!(0.01),
                comment: "HMv1|side=BUY|layer=0".to_string(),
            })
            .await
            .unwrap();

        assert!(gateway.fill_order(ack.ticket.unwrap(), dec!(-0.40)).await);
        assert!(gateway.order_book().await.is_empty());

        let positions = gateway.position_book().await;
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].open_price, dec!(147.220));
        assert_eq!(positions[0].profit, dec!(-0.40));
    }

    #[tokio::test]
    async fn test_close_unknown_position() {
        let gateway = PaperGateway::with_defaults();
        let ack = gateway.close_position(99, dec!(0.01), "x").await.unwrap();
        assert!(!ack.accepted);
    }
}
