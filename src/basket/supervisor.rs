//! Basket supervisor
//!
//! Sole owner of basket lifecycle transitions. One cycle runs, in order:
//! risk enforcement, profit-target liquidation, reseed-when-flat. Each step
//! depends on the side effects of the previous one, so a step that changes
//! the position set ends the cycle, and the world is re-observed fresh next
//! cycle instead of acting on a stale snapshot.

use super::grid::GridBuilder;
use super::layers::layers_state;
use super::ops::{cancel_all, close_all};
use super::snapshot::BasketSnapshot;
use crate::config::BasketConfig;
use crate::gateway::{GatewayError, MarketGateway};
use crate::notify::Notifier;
use crate::risk::{RiskAction, RiskLimiter};
use rust_decimal::Decimal;

/// What one polling cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Drawdown kill switch liquidated the basket
    Liquidated,
    /// Exposure cap pruned pending orders; positions remain
    OrdersPruned,
    /// Profit target met: basket closed, optionally reseeded
    ProfitTaken { profit: Decimal, reseeded: usize },
    /// Basket was flat/empty and was reseeded
    Reseeded { placed: usize },
    /// Basket active and within limits, nothing to do
    Idle,
}

/// Orchestrates one polling cycle for a single symbol
pub struct BasketSupervisor {
    symbol: String,
    tag_prefix: String,
    basket: BasketConfig,
    grid: GridBuilder,
    risk: RiskLimiter,
    max_layers_per_side: u32,
}

impl BasketSupervisor {
    pub fn new(
        symbol: impl Into<String>,
        tag_prefix: impl Into<String>,
        basket: BasketConfig,
        grid: GridBuilder,
        risk: RiskLimiter,
        max_layers_per_side: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            tag_prefix: tag_prefix.into(),
            basket,
            grid,
            risk,
            max_layers_per_side,
        }
    }

    /// Run one full cycle against a live session
    pub async fn run_cycle(
        &self,
        gateway: &dyn MarketGateway,
        notifier: &dyn Notifier,
    ) -> Result<CycleOutcome, GatewayError> {
        // 1. Risk limits dominate: if anything fired, the position set just
        // changed and must be re-observed next cycle.
        match self.risk.enforce(gateway, notifier).await? {
            RiskAction::Liquidated => return Ok(CycleOutcome::Liquidated),
            RiskAction::OrdersPruned => return Ok(CycleOutcome::OrdersPruned),
            RiskAction::None => {}
        }

        // 2. Basket take-profit.
        let snapshot = BasketSnapshot::fetch(gateway, &self.symbol).await?;
        let account = gateway.account().await?;
        let profit = snapshot.floating_pl();

        if self.profit_target_met(profit, account.balance) {
            let closed = close_all(gateway, &self.symbol, &self.tag_prefix).await?;
            let cancelled = cancel_all(gateway, &self.symbol, &self.tag_prefix).await?;
            tracing::info!(%profit, closed, cancelled, "basket take-profit hit");
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
            notifier
                .notify(&format!(
                    "Basket closed (target reached)\nFloating P/L {profit:.2} hit the \
                     target — everything closed.\n{timestamp} UTC",
                ))
                .await;

            // Closing is best-effort, so the basket may not actually be
            // flat. Re-observe before stacking a fresh ladder on top of
            // positions a rejected close left behind.
            let reseeded = if self.basket.rebuild_on_flat {
                let after = BasketSnapshot::fetch(gateway, &self.symbol).await?;
                if after.is_flat() {
                    self.reseed(gateway, notifier).await?
                } else {
                    tracing::warn!(
                        remaining = after.positions.len(),
                        "positions survived the close, reseed deferred"
                    );
                    0
                }
            } else {
                0
            };
            return Ok(CycleOutcome::ProfitTaken { profit, reseeded });
        }

        // 3. Reseed when the basket is empty, or flat under the rebuild policy.
        if snapshot.is_empty() || (self.basket.rebuild_on_flat && snapshot.is_flat()) {
            // Stray pending orders are swept first, then the layer state is
            // re-derived so the seed precondition sees the post-sweep world.
            cancel_all(gateway, &self.symbol, &self.tag_prefix).await?;
            let swept = BasketSnapshot::fetch(gateway, &self.symbol).await?;
            let counts = layers_state(&swept, &self.tag_prefix);
            if counts.buy >= self.max_layers_per_side || counts.sell >= self.max_layers_per_side {
                tracing::debug!(?counts, "layer cap reached, not reseeding");
                return Ok(CycleOutcome::Idle);
            }
            let placed = self.reseed(gateway, notifier).await?;
            return Ok(CycleOutcome::Reseeded { placed });
        }

        // 4. Active and balanced.
        tracing::info!(
            balance = %account.balance,
            equity = %account.equity,
            floating_pl = %profit,
            "basket active"
        );
        Ok(CycleOutcome::Idle)
    }

    /// Either target triggers; the absolute amount is checked first
    fn profit_target_met(&self, profit: Decimal, balance: Decimal) -> bool {
        if let Some(target) = self.basket.tp_money {
            if profit >= target {
                return true;
            }
        }
        if let Some(pct) = self.basket.tp_pct {
            if balance > Decimal::ZERO && profit >= balance * pct / Decimal::ONE_HUNDRED {
                return true;
            }
        }
        false
    }

    /// Seed a fresh grid anchored at the current mid price
    ///
    /// Missing quote or symbol metadata skips seeding this cycle without
    /// failing the loop.
    async fn reseed(
        &self,
        gateway: &dyn MarketGateway,
        notifier: &dyn Notifier,
    ) -> Result<usize, GatewayError> {
        let quote = match gateway.quote(&self.symbol).await {
            Ok(quote) => quote,
            Err(GatewayError::MissingData(reason)) => {
                tracing::warn!(reason, "no quote, seeding skipped");
                return Ok(0);
            }
            Err(error) => return Err(error),
        };
        let meta = match gateway.symbol_meta(&self.symbol).await {
            Ok(meta) => meta,
            Err(GatewayError::MissingData(reason)) => {
                tracing::warn!(reason, "no symbol metadata, seeding skipped");
                return Ok(0);
            }
            Err(error) => return Err(error),
        };

        let anchor = quote.mid();
        if anchor <= Decimal::ZERO {
            tracing::warn!(%anchor, "non-positive anchor, seeding skipped");
            return Ok(0);
        }

        self.grid.seed(gateway, notifier, &meta, anchor).await
    }
}
