//! Market gateway module
//!
//! The broker seam: everything the basket manager needs from the outside
//! world goes through the [`MarketGateway`] trait. Two implementations are
//! provided: a REST bridge for a live MT5 terminal and an in-memory paper
//! gateway for paper mode and tests.

mod bridge;
mod paper;
mod types;

pub use bridge::{BridgeConfig, BridgeGateway};
pub use paper::PaperGateway;
pub use types::{
    AccountSnapshot, OrderAck, OrderSide, PendingOrder, Position, Quote, StopOrderRequest,
    SymbolMeta, Ticket,
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

/// Gateway error taxonomy
///
/// Connectivity errors abort the whole cycle; missing data aborts only the
/// dependent action. Order rejections are not errors at all; see
/// [`OrderAck`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Session could not be established or was lost
    #[error("login failed: {0}")]
    Login(String),
    /// Transport failure talking to the bridge
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Quote or symbol metadata unavailable
    #[error("missing market data: {0}")]
    MissingData(String),
    /// Bridge returned an API-level error
    #[error("bridge api error: {code} - {message}")]
    Api { code: i32, message: String },
}

/// Broker operations consumed by the basket manager
///
/// All calls are scoped to one polling cycle; `logout` releases the session
/// and runs on every exit path of the cycle.
#[async_trait]
pub trait MarketGateway: Send + Sync {
    /// Current top-of-book quote
    async fn quote(&self, symbol: &str) -> Result<Quote, GatewayError>;
    /// Symbol price metadata
    async fn symbol_meta(&self, symbol: &str) -> Result<SymbolMeta, GatewayError>;
    /// Account balance and equity
    async fn account(&self) -> Result<AccountSnapshot, GatewayError>;
    /// All open positions for the symbol
    async fn positions(&self, symbol: &str) -> Result<Vec<Position>, GatewayError>;
    /// All resting pending orders for the symbol
    async fn pending_orders(&self, symbol: &str) -> Result<Vec<PendingOrder>, GatewayError>;
    /// Place one stop order leg
    async fn place_stop_order(&self, request: &StopOrderRequest) -> Result<OrderAck, GatewayError>;
    /// Close an open position at market
    async fn close_position(
        &self,
        ticket: Ticket,
        volume: Decimal,
        comment: &str,
    ) -> Result<OrderAck, GatewayError>;
    /// Delete a pending order
    async fn cancel_order(&self, ticket: Ticket, comment: &str) -> Result<OrderAck, GatewayError>;
    /// Release the session
    async fn logout(&self) -> Result<(), GatewayError>;
}
