//! Layer tracker
//!
//! Reconstructs how many grid layers are live per side from the current
//! snapshot. A filled order leaves the pending set when it becomes a
//! position, so each layer is counted once via whichever record is live.

use super::snapshot::BasketSnapshot;
use super::tag::{has_tag, parse_layer, LayerTag};
use crate::gateway::OrderSide;

/// Live layer counts per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerCounts {
    pub buy: u32,
    pub sell: u32,
}

impl LayerCounts {
    fn absorb(&mut self, side: OrderSide, layer: u32) {
        match side {
            OrderSide::Buy => self.buy = self.buy.max(layer + 1),
            OrderSide::Sell => self.sell = self.sell.max(layer + 1),
        }
    }
}

/// Derive per-side layer counts from a basket snapshot
///
/// Counts the maximum `layer + 1` seen across tagged orders and positions.
/// Pending orders carry their side in the comment; positions report their
/// side natively and only the layer index comes from the comment. Records
/// without our tag, or with corrupt tags, are skipped; the scan never
/// fails. Pure and idempotent.
pub fn layers_state(snapshot: &BasketSnapshot, tag_prefix: &str) -> LayerCounts {
    let mut counts = LayerCounts::default();

    for order in &snapshot.orders {
        if let Some(tag) = LayerTag::parse(&order.comment, tag_prefix) {
            counts.absorb(tag.side, tag.layer);
        }
    }

    for position in &snapshot.positions {
        if has_tag(&position.comment, tag_prefix) {
            counts.absorb(position.side, parse_layer(&position.comment));
        }
    }

    counts
}
