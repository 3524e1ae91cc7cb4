//! Basket management module
//!
//! The grid hedging / martingale core: layer tracking from tagged broker
//! comments, symmetric stop-ladder seeding, and the per-cycle supervisor
//! that owns basket lifecycle transitions.

mod grid;
mod layers;
pub mod ops;
mod snapshot;
mod supervisor;
mod tag;

pub use grid::GridBuilder;
pub use layers::{layers_state, LayerCounts};
pub use snapshot::BasketSnapshot;
pub use supervisor::{BasketSupervisor, CycleOutcome};
pub use tag::{has_tag, parse_layer, LayerTag};
