//! Risk limiter
//!
//! Account-wide guardrails evaluated first in every cycle: a drawdown kill
//! switch that liquidates everything, and an exposure cap that prunes
//! pending orders while leaving open positions to resolve on their own.
//! Outside these two triggers this component never touches the basket.

use crate::basket::ops::{cancel_all, close_all};
use crate::basket::BasketSnapshot;
use crate::config::RiskConfig;
use crate::gateway::{AccountSnapshot, GatewayError, MarketGateway};
use crate::notify::Notifier;
use rust_decimal::Decimal;

/// What the limiter did this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskAction {
    /// No limit breached
    None,
    /// Drawdown kill switch fired: all positions closed, all orders cancelled
    Liquidated,
    /// Exposure cap fired: pending orders cancelled, positions untouched
    OrdersPruned,
}

/// Enforces drawdown and exposure limits for one symbol
pub struct RiskLimiter {
    config: RiskConfig,
    symbol: String,
    tag_prefix: String,
}

/// Drawdown of equity below balance, in percent
///
/// Non-positive balance maps to 0 rather than dividing by it.
pub fn drawdown_pct(account: &AccountSnapshot) -> Decimal {
    if account.balance <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let drop = (account.balance - account.equity).max(Decimal::ZERO);
    drop / account.balance * Decimal::ONE_HUNDRED
}

impl RiskLimiter {
    pub fn new(config: RiskConfig, symbol: impl Into<String>, tag_prefix: impl Into<String>) -> Self {
        Self {
            config,
            symbol: symbol.into(),
            tag_prefix: tag_prefix.into(),
        }
    }

    /// Apply both limits in order: drawdown dominates, then the volume cap
    pub async fn enforce(
        &self,
        gateway: &dyn MarketGateway,
        notifier: &dyn Notifier,
    ) -> Result<RiskAction, GatewayError> {
        let account = gateway.account().await?;

        let dd = drawdown_pct(&account);
        if dd >= self.config.max_drawdown_pct {
            let closed = close_all(gateway, &self.symbol, &self.tag_prefix).await?;
            let cancelled = cancel_all(gateway, &self.symbol, &self.tag_prefix).await?;
            tracing::warn!(%dd, closed, cancelled, "drawdown kill switch fired");
            notifier
                .notify(&format!(
                    "Protection triggered\nDrawdown {dd:.2}% >= {max:.2}% — \
                     all positions closed and pending orders removed.",
                    max = self.config.max_drawdown_pct,
                ))
                .await;
            return Ok(RiskAction::Liquidated);
        }

        let snapshot = BasketSnapshot::fetch(gateway, &self.symbol).await?;
        let volume = snapshot.total_volume();
        if volume > self.config.max_total_volume {
            let cancelled = cancel_all(gateway, &self.symbol, &self.tag_prefix).await?;
            tracing::warn!(%volume, cancelled, "exposure cap fired, pending orders pruned");
            notifier
                .notify(&format!(
                    "Exposure limit\nTotal volume {volume} > max {max} — \
                     pending orders removed, open positions left to resolve.",
                    max = self.config.max_total_volume,
                ))
                .await;
            return Ok(RiskAction::OrdersPruned);
        }

        Ok(RiskAction::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_drawdown_basic() {
        let account = AccountSnapshot {
            balance: dec!(1000),
            equity: dec!(880),
        };
        assert_eq!(drawdown_pct(&account), dec!(12.0));
    }

    #[test]
    fn test_drawdown_equity_above_balance_is_zero() {
        let account = AccountSnapshot {
            balance: dec!(1000),
            equity: dec!(1050),
        };
        assert_eq!(drawdown_pct(&account), dec!(0));
    }

    #[test]
    fn test_drawdown_zero_balance_guard() {
        let account = AccountSnapshot {
            balance: dec!(0),
            equity: dec!(-50),
        };
        assert_eq!(drawdown_pct(&account), dec!(0));
    }
}
