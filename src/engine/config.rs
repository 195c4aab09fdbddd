//! Engine admission limits and snapshot depth.

use crate::orderbook::{DEFAULT_DEPTH_LEVELS, MAX_DEPTH_LEVELS};
use rust_decimal::Decimal;

/// Admission bounds and market-data depth for a [`crate::MatchingEngine`].
///
/// This is a plain value object; loading it from an environment or a file is
/// the caller's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Smallest accepted order quantity.
    pub min_quantity: Decimal,
    /// Largest accepted order quantity.
    pub max_quantity: Decimal,
    /// Smallest accepted limit price.
    pub min_price: Decimal,
    /// Largest accepted limit price.
    pub max_price: Decimal,
    /// Price levels per side in book-update snapshots. Values above
    /// [`MAX_DEPTH_LEVELS`] are clamped.
    pub depth_levels: usize,
}

impl EngineConfig {
    /// The snapshot depth with the hard cap applied.
    #[must_use]
    pub fn effective_depth(&self) -> usize {
        self.depth_levels.min(MAX_DEPTH_LEVELS)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_quantity: Decimal::new(1, 8),
            max_quantity: Decimal::from(1_000_000u64),
            min_price: Decimal::new(1, 8),
            max_price: Decimal::from(10_000_000u64),
            depth_levels: DEFAULT_DEPTH_LEVELS,
        }
    }
}
