// ============================================================================
// Price/Time Priority Ordering
// Total-order rank keys for resting buy and sell interest
// ============================================================================

use std::cmp::Ordering;

use super::order::{Order, Price};

/// Rank key for resting buy orders: higher price first, then earlier
/// arrival. `seq` is unique per run, so the order is total and a rank key
/// doubles as an identity inside the side tree (removal by rank, no scan).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidRank {
    pub price: Price,
    pub seq: u64,
}

impl BidRank {
    pub fn of(order: &Order) -> Self {
        Self {
            price: order.price,
            seq: order.seq,
        }
    }
}

impl Ord for BidRank {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .price
            .cmp(&self.price)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for BidRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rank key for resting sell orders: lower price first, then earlier
/// arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AskRank {
    pub price: Price,
    pub seq: u64,
}

impl AskRank {
    pub fn of(order: &Order) -> Self {
        Self {
            price: order.price,
            seq: order.seq,
        }
    }
}

impl Ord for AskRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price
            .cmp(&other.price)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for AskRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_bid_rank_higher_price_first() {
        let high = BidRank { price: 12, seq: 5 };
        let low = BidRank { price: 10, seq: 0 };
        assert!(high < low);
    }

    #[test]
    fn test_bid_rank_earlier_arrival_breaks_ties() {
        let early = BidRank { price: 10, seq: 1 };
        let late = BidRank { price: 10, seq: 2 };
        assert!(early < late);
    }

    #[test]
    fn test_ask_rank_lower_price_first() {
        let low = AskRank { price: 10, seq: 5 };
        let high = AskRank { price: 12, seq: 0 };
        assert!(low < high);

        let early = AskRank { price: 10, seq: 1 };
        let late = AskRank { price: 10, seq: 2 };
        assert!(early < late);
    }

    #[test]
    fn test_tree_head_is_best_order() {
        let mut bids: BTreeMap<BidRank, u64> = BTreeMap::new();
        bids.insert(BidRank { price: 10, seq: 0 }, 0);
        bids.insert(BidRank { price: 12, seq: 1 }, 1);
        bids.insert(BidRank { price: 12, seq: 2 }, 2);

        // Best bid: highest price, earliest arrival.
        let (best, _) = bids.first_key_value().unwrap();
        assert_eq!((best.price, best.seq), (12, 1));

        let mut asks: BTreeMap<AskRank, u64> = BTreeMap::new();
        asks.insert(AskRank { price: 12, seq: 0 }, 0);
        asks.insert(AskRank { price: 10, seq: 2 }, 2);
        asks.insert(AskRank { price: 10, seq: 1 }, 1);

        // Best ask: lowest price, earliest arrival.
        let (best, _) = asks.first_key_value().unwrap();
        assert_eq!((best.price, best.seq), (10, 1));
    }

    #[test]
    fn test_negative_prices_order_consistently() {
        let neg = AskRank { price: -5, seq: 0 };
        let pos = AskRank { price: 5, seq: 1 };
        assert!(neg < pos);

        let neg_bid = BidRank { price: -5, seq: 0 };
        let pos_bid = BidRank { price: 5, seq: 1 };
        assert!(pos_bid < neg_bid);
    }
}
