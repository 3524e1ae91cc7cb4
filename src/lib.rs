//! mt5-grid: Hedging + martingale grid bot for MetaTrader 5 brokers
//!
//! This library provides the core components for:
//! - Layer tracking from tag metadata embedded in broker order comments
//! - Symmetric stop-ladder seeding with martingale-scaled volumes
//! - Account-wide risk limits (drawdown kill switch, exposure cap)
//! - Basket lifecycle supervision (profit-target liquidation, reseed)
//! - Paper/bridge market gateway
//! - Outbound Telegram notifications

pub mod basket;
pub mod cli;
pub mod config;
pub mod gateway;
pub mod notify;
pub mod risk;
pub mod telemetry;
