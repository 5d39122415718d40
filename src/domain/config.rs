// ============================================================================
// Book Configuration
// Crossing behavior for incoming orders against the resting book
// ============================================================================

use super::order::{Price, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decides whether an incoming order's price is aggressive enough to trade
/// against the best resting order on the opposite side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CrossPolicy {
    /// Only strictly-crossing prices trade: a buy must bid above the best
    /// ask, a sell must offer below the best bid. Same-price orders rest
    /// next to each other without trading.
    #[default]
    Strict,

    /// Equal prices also trade: buy at-or-above the best ask, sell
    /// at-or-below the best bid.
    Inclusive,
}

impl CrossPolicy {
    /// Does an incoming `taker`-side order priced at `taker_price` cross a
    /// resting order priced at `resting_price`?
    pub fn crosses(&self, taker: Side, taker_price: Price, resting_price: Price) -> bool {
        match (self, taker) {
            (CrossPolicy::Strict, Side::Buy) => taker_price > resting_price,
            (CrossPolicy::Strict, Side::Sell) => taker_price < resting_price,
            (CrossPolicy::Inclusive, Side::Buy) => taker_price >= resting_price,
            (CrossPolicy::Inclusive, Side::Sell) => taker_price <= resting_price,
        }
    }
}

/// Per-book configuration. Applied to every book the engine creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookConfig {
    pub cross_policy: CrossPolicy,
}

impl BookConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the crossing policy.
    pub fn with_cross_policy(mut self, policy: CrossPolicy) -> Self {
        self.cross_policy = policy;
        self
    }
}
