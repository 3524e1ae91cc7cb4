//! Grid builder
//!
//! Seeds the symmetric stop ladder: buy-stops above the anchor, sell-stops
//! below, with martingale-scaled volumes per layer. Every leg is placed
//! independently and best-effort: a rejected leg never blocks its siblings.

use super::tag::LayerTag;
use crate::config::GridConfig;
use crate::gateway::{GatewayError, MarketGateway, OrderSide, StopOrderRequest, SymbolMeta};
use crate::notify::Notifier;
use rust_decimal::{Decimal, RoundingStrategy};

/// Places the stop ladder for one symbol
pub struct GridBuilder {
    config: GridConfig,
    symbol: String,
    tag_prefix: String,
}

impl GridBuilder {
    pub fn new(config: GridConfig, symbol: impl Into<String>, tag_prefix: impl Into<String>) -> Self {
        Self {
            config,
            symbol: symbol.into(),
            tag_prefix: tag_prefix.into(),
        }
    }

    /// Martingale volume for a layer, rounded down to the broker's lot precision
    ///
    /// Truncation means adjacent layers can land on the same lot when the
    /// scaled volume has not yet cleared the lot step (0.01 at 1.6 gives
    /// 0.016, which truncates back to 0.01). The sequence is non-decreasing;
    /// it only grows strictly once each step clears the precision.
    pub fn volume_for_layer(&self, layer: u32) -> Decimal {
        let mut lot = self.config.base_lot;
        for _ in 0..layer {
            lot *= self.config.multiplier;
        }
        lot.round_dp_with_strategy(self.config.lot_precision, RoundingStrategy::ToZero)
    }

    /// Price offset from the anchor for a layer
    fn offset_for_layer(&self, layer: u32, meta: &SymbolMeta) -> Decimal {
        Decimal::from(layer + 1) * Decimal::from(self.config.step_pips) * meta.pip()
    }

    /// Seed the full ladder around `anchor`
    ///
    /// Caller guarantees a positive anchor and that both sides are below
    /// the layer cap. Returns how many legs were accepted; sends a single
    /// summary notification when at least one leg landed.
    pub async fn seed(
        &self,
        gateway: &dyn MarketGateway,
        notifier: &dyn Notifier,
        meta: &SymbolMeta,
        anchor: Decimal,
    ) -> Result<usize, GatewayError> {
        let mut placed = 0;

        for layer in 0..self.config.max_layers_per_side {
            let offset = self.offset_for_layer(layer, meta);
            let legs = [
                (OrderSide::Buy, meta.round_price(anchor + offset)),
                (OrderSide::Sell, meta.round_price(anchor - offset)),
            ];

            for (side, price) in legs {
                if self.place_leg(gateway, side, price, layer).await {
                    placed += 1;
                }
            }
        }

        if placed > 0 {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
            notifier
                .notify(&format!(
                    "Grid seeded ({symbol})\nAnchor: {anchor} | Layers/side: {layers} | \
                     Step: {step} pips | Base lot: {lot}\n{timestamp} UTC",
                    symbol = self.symbol,
                    layers = self.config.max_layers_per_side,
                    step = self.config.step_pips,
                    lot = self.config.base_lot,
                ))
                .await;
        }

        Ok(placed)
    }

    /// Place one leg; true when the broker accepted it
    async fn place_leg(
        &self,
        gateway: &dyn MarketGateway,
        side: OrderSide,
        price: Decimal,
        layer: u32,
    ) -> bool {
        let volume = self.volume_for_layer(layer);
        if volume <= Decimal::ZERO {
            // invariant containment: never send a degenerate volume
            tracing::warn!(layer, %side, "computed volume not positive, leg skipped");
            return false;
        }

        let request = StopOrderRequest {
            symbol: self.symbol.clone(),
            side,
            price,
            volume,
            comment: LayerTag { side, layer }.render(&self.tag_prefix),
        };

        match gateway.place_stop_order(&request).await {
            Ok(ack) if ack.accepted => {
                tracing::info!(layer, %side, %price, %volume, "stop placed");
                true
            }
            Ok(ack) => {
                tracing::warn!(
                    layer,
                    %side,
                    retcode = ack.retcode,
                    reason = ack.reason.as_deref().unwrap_or(""),
                    "stop rejected"
                );
                false
            }
            Err(error) => {
                tracing::warn!(layer, %side, %error, "stop placement failed");
                false
            }
        }
    }
}
