// ============================================================================
// Order Book
// Resting interest under price/time priority plus the matching algorithm
// ============================================================================

use std::collections::BTreeMap;

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::config::BookConfig;
use super::order::{BookId, Order, OrderKey, Price, Quantity, Side};
use super::priority::{AskRank, BidRank};
use crate::interfaces::Transcript;

/// Per-price-level running totals for an incoming order, insertion-ordered
/// by first-seen price level. A sweep rarely touches more than a handful of
/// levels, so the ledger stays inline.
type FillLedger = SmallVec<[(Price, Quantity); 4]>;

/// A single order book: one side's resting buy and sell interest.
///
/// Three mutually consistent views over the same set of resting orders:
/// the insertion-ordered identity index (existence check, cancel, final
/// snapshot order) and one rank tree per side. The rank keys embed the
/// arrival sequence, so the trees support both best-first iteration and
/// removal by identity without scanning.
#[derive(Debug, Clone)]
pub struct OrderBook {
    id: BookId,
    config: BookConfig,
    orders: IndexMap<OrderKey, Order>,
    bids: BTreeMap<BidRank, OrderKey>,
    asks: BTreeMap<AskRank, OrderKey>,
}

impl OrderBook {
    pub fn new(id: BookId) -> Self {
        Self::with_config(id, BookConfig::default())
    }

    pub fn with_config(id: BookId, config: BookConfig) -> Self {
        Self {
            id,
            config,
            orders: IndexMap::new(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }

    /// Add an incoming order: acknowledge it, match it against the opposite
    /// side, then rest whatever quantity is left.
    ///
    /// Resting orders execute at their own limit price, each emitting its
    /// execution message the moment it fills. The incoming order's
    /// executions are coalesced per price level and emitted after the
    /// sweep, in the order the levels were first touched.
    pub fn add(&mut self, mut incoming: Order, out: &mut Transcript) {
        tracing::trace!(
            book = self.id,
            client = incoming.key.client_id,
            token = incoming.key.order_token,
            side = ?incoming.side,
            quantity = incoming.remaining(),
            price = incoming.price,
            "order accepted"
        );
        out.push(incoming.acknowledgement());

        let fills = match incoming.side {
            Side::Buy => self.sweep_asks(&incoming, out),
            Side::Sell => self.sweep_bids(&incoming, out),
        };
        for &(price, quantity) in &fills {
            out.push(incoming.execute(quantity, price));
        }

        if incoming.remaining() != 0 {
            self.rest(incoming);
        }
    }

    /// Cancel by identity. Returns whether the order was found here; a miss
    /// is a silent no-op so the router can probe every book.
    pub fn cancel(&mut self, key: OrderKey, out: &mut Transcript) -> bool {
        let Some(order) = self.orders.shift_remove(&key) else {
            return false;
        };

        match order.side {
            Side::Buy => {
                self.bids.remove(&BidRank::of(&order));
            },
            Side::Sell => {
                self.asks.remove(&AskRank::of(&order));
            },
        }

        tracing::debug!(
            book = self.id,
            client = key.client_id,
            token = key.order_token,
            "order cancelled"
        );
        out.push(order.cancellation());
        true
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn get(&self, key: OrderKey) -> Option<&Order> {
        self.orders.get(&key)
    }

    pub fn contains(&self, key: OrderKey) -> bool {
        self.orders.contains_key(&key)
    }

    /// Number of resting orders, both sides.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first_key_value().map(|(rank, _)| rank.price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first_key_value().map(|(rank, _)| rank.price)
    }

    /// Resting orders in the order they first touched the book, buy and
    /// sell interleaved. This is the final snapshot order.
    pub fn resting(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    // ========================================================================
    // Matching sweep
    // ========================================================================

    fn sweep_asks(&mut self, incoming: &Order, out: &mut Transcript) -> FillLedger {
        let mut fills = FillLedger::new();
        let mut unfilled = incoming.remaining();

        while unfilled > 0 {
            let (rank, key) = match self.asks.first_key_value() {
                Some((rank, key)) => (*rank, *key),
                None => break,
            };
            if !self
                .config
                .cross_policy
                .crosses(Side::Buy, incoming.price, rank.price)
            {
                break;
            }

            let resting = self
                .orders
                .get_mut(&key)
                .expect("ask tree and identity index out of sync");
            // Price improvement goes to the resting side.
            let trade_price = rank.price;
            let quantity = unfilled.min(resting.remaining());

            out.push(resting.execute(quantity, trade_price));
            unfilled -= quantity;
            record_fill(&mut fills, trade_price, quantity);

            if resting.is_filled() {
                self.asks.remove(&rank);
                self.orders.shift_remove(&key);
            }
        }

        fills
    }

    fn sweep_bids(&mut self, incoming: &Order, out: &mut Transcript) -> FillLedger {
        let mut fills = FillLedger::new();
        let mut unfilled = incoming.remaining();

        while unfilled > 0 {
            let (rank, key) = match self.bids.first_key_value() {
                Some((rank, key)) => (*rank, *key),
                None => break,
            };
            if !self
                .config
                .cross_policy
                .crosses(Side::Sell, incoming.price, rank.price)
            {
                break;
            }

            let resting = self
                .orders
                .get_mut(&key)
                .expect("bid tree and identity index out of sync");
            let trade_price = rank.price;
            let quantity = unfilled.min(resting.remaining());

            out.push(resting.execute(quantity, trade_price));
            unfilled -= quantity;
            record_fill(&mut fills, trade_price, quantity);

            if resting.is_filled() {
                self.bids.remove(&rank);
                self.orders.shift_remove(&key);
            }
        }

        fills
    }

    fn rest(&mut self, order: Order) {
        match order.side {
            Side::Buy => {
                self.bids.insert(BidRank::of(&order), order.key);
            },
            Side::Sell => {
                self.asks.insert(AskRank::of(&order), order.key);
            },
        }
        self.orders.insert(order.key, order);
    }
}

fn record_fill(fills: &mut FillLedger, price: Price, quantity: Quantity) {
    match fills.iter_mut().find(|(p, _)| *p == price) {
        Some((_, total)) => *total += quantity,
        None => fills.push((price, quantity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::CrossPolicy;
    use crate::domain::message::Message;
    use proptest::prelude::*;

    fn buy(client: i64, token: i64, quantity: i64, price: i64, seq: u64) -> Order {
        Order::new(client, token, Side::Buy, quantity, price, seq)
    }

    fn sell(client: i64, token: i64, quantity: i64, price: i64, seq: u64) -> Order {
        Order::new(client, token, Side::Sell, quantity, price, seq)
    }

    fn lines(out: &Transcript) -> Vec<String> {
        out.lines().iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_non_crossing_order_rests_after_ack() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(buy(1, 1, 100, 10, 0), &mut out);

        assert_eq!(lines(&out), vec!["A, Client 1, Token 1"]);
        assert_eq!(book.best_bid(), Some(10));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_equal_prices_do_not_cross_under_strict() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(buy(1, 1, 100, 10, 0), &mut out);
        book.add(sell(2, 2, 50, 10, 1), &mut out);

        assert_eq!(
            lines(&out),
            vec!["A, Client 1, Token 1", "A, Client 2, Token 2"]
        );
        assert_eq!(book.len(), 2);
        assert_eq!(book.best_bid(), Some(10));
        assert_eq!(book.best_ask(), Some(10));
    }

    #[test]
    fn test_equal_prices_cross_under_inclusive() {
        let config = BookConfig::new().with_cross_policy(CrossPolicy::Inclusive);
        let mut book = OrderBook::with_config(1, config);
        let mut out = Transcript::new();

        book.add(buy(1, 1, 100, 10, 0), &mut out);
        book.add(sell(2, 2, 50, 10, 1), &mut out);

        // Resting buy executes first, then the incoming sell.
        assert_eq!(
            lines(&out),
            vec![
                "A, Client 1, Token 1",
                "A, Client 2, Token 2",
                "E, Client 1, Token 1, 50, 10",
                "E, Client 2, Token 2, 50, 10",
            ]
        );
        assert_eq!(book.get(OrderKey::new(1, 1)).unwrap().remaining(), 50);
        assert!(!book.contains(OrderKey::new(2, 2)));

        // Cancel the half-filled buy: book ends empty.
        let mut out = Transcript::new();
        assert!(book.cancel(OrderKey::new(1, 1), &mut out));
        assert_eq!(lines(&out), vec!["C, Client 1, Token 1"]);
        assert!(book.is_empty());
    }

    #[test]
    fn test_trade_executes_at_resting_price() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(sell(1, 1, 30, 10, 0), &mut out);
        book.add(buy(2, 2, 30, 15, 1), &mut out);

        assert_eq!(
            lines(&out),
            vec![
                "A, Client 1, Token 1",
                "A, Client 2, Token 2",
                "E, Client 1, Token 1, 30, 10",
                "E, Client 2, Token 2, 30, 10",
            ]
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_multi_level_sweep_coalesces_incoming_executions() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(sell(1, 1, 30, 10, 0), &mut out);
        book.add(sell(1, 2, 20, 10, 1), &mut out);
        book.add(sell(1, 3, 40, 11, 2), &mut out);

        let mut out = Transcript::new();
        book.add(buy(2, 9, 100, 12, 3), &mut out);

        // Each resting order fills individually; the incoming order gets
        // one coalesced execution per price level, in first-touch order.
        assert_eq!(
            lines(&out),
            vec![
                "A, Client 2, Token 9",
                "E, Client 1, Token 1, 30, 10",
                "E, Client 1, Token 2, 20, 10",
                "E, Client 1, Token 3, 40, 11",
                "E, Client 2, Token 9, 50, 10",
                "E, Client 2, Token 9, 40, 11",
            ]
        );

        // 10 lots left over rest on the bid side.
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(OrderKey::new(2, 9)).unwrap().remaining(), 10);
        assert_eq!(book.best_bid(), Some(12));
        assert_eq!(book.best_ask(), None);
    }

    #[test]
    fn test_time_priority_at_same_price() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(sell(1, 1, 10, 10, 0), &mut out);
        book.add(sell(2, 2, 10, 10, 1), &mut out);

        let mut out = Transcript::new();
        book.add(buy(3, 3, 10, 11, 2), &mut out);

        // Earlier arrival fills first.
        assert_eq!(
            lines(&out),
            vec![
                "A, Client 3, Token 3",
                "E, Client 1, Token 1, 10, 10",
                "E, Client 3, Token 3, 10, 10",
            ]
        );
        assert!(book.contains(OrderKey::new(2, 2)));
        assert!(!book.contains(OrderKey::new(1, 1)));
    }

    #[test]
    fn test_partial_fill_of_resting_order() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(sell(1, 1, 100, 10, 0), &mut out);
        book.add(buy(2, 2, 40, 11, 1), &mut out);

        let resting = book.get(OrderKey::new(1, 1)).unwrap();
        assert_eq!(resting.remaining(), 60);
        assert_eq!(book.best_ask(), Some(10));
        // Fully filled incoming order never rests.
        assert!(!book.contains(OrderKey::new(2, 2)));
    }

    #[test]
    fn test_cancel_unknown_is_silent() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        assert!(!book.cancel(OrderKey::new(9, 9), &mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn test_cancel_removes_from_one_side_only() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(buy(1, 1, 10, 10, 0), &mut out);
        book.add(sell(2, 2, 10, 12, 1), &mut out);

        let mut out = Transcript::new();
        assert!(book.cancel(OrderKey::new(1, 1), &mut out));
        assert_eq!(lines(&out), vec!["C, Client 1, Token 1"]);

        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), Some(12));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_cancelled_order_cannot_be_cancelled_again() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(buy(1, 1, 10, 10, 0), &mut out);
        assert!(book.cancel(OrderKey::new(1, 1), &mut out));
        assert!(!book.cancel(OrderKey::new(1, 1), &mut out));
    }

    #[test]
    fn test_zero_quantity_order_is_acknowledged_but_never_rests() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(buy(1, 1, 0, 10, 0), &mut out);

        assert_eq!(lines(&out), vec!["A, Client 1, Token 1"]);
        assert!(book.is_empty());
    }

    #[test]
    fn test_negative_quantity_order_rests_without_matching() {
        // Accepted as-is: a negative quantity never enters the matching
        // loop but still rests in the book.
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(sell(1, 1, 10, 5, 0), &mut out);
        book.add(buy(2, 2, -7, 10, 1), &mut out);

        assert_eq!(
            lines(&out),
            vec!["A, Client 1, Token 1", "A, Client 2, Token 2"]
        );
        assert_eq!(book.get(OrderKey::new(2, 2)).unwrap().remaining(), -7);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_resting_preserves_first_touch_order() {
        let mut book = OrderBook::new(1);
        let mut out = Transcript::new();

        book.add(buy(1, 1, 10, 10, 0), &mut out);
        book.add(sell(2, 2, 10, 20, 1), &mut out);
        book.add(buy(3, 3, 10, 9, 2), &mut out);

        let tokens: Vec<i64> = book.resting().map(|o| o.key.order_token).collect();
        assert_eq!(tokens, vec![1, 2, 3]);
    }

    // ========================================================================
    // Properties
    // ========================================================================

    proptest! {
        #[test]
        fn prop_quantity_conserved_and_never_negative(
            resting in prop::collection::vec((1i64..20, 1i64..50), 0..16),
            price in 1i64..25,
            quantity in 1i64..400,
        ) {
            let mut book = OrderBook::new(1);
            let mut setup = Transcript::new();
            for (i, &(p, q)) in resting.iter().enumerate() {
                book.add(sell(1, i as i64, q, p, i as u64), &mut setup);
            }

            let taker_key = OrderKey::new(2, 1000);
            let mut out = Transcript::new();
            book.add(
                Order::new(2, 1000, Side::Buy, quantity, price, resting.len() as u64),
                &mut out,
            );

            let executed_for = |key: OrderKey| -> i64 {
                out.lines()
                    .iter()
                    .filter_map(|m| match m {
                        Message::Executed { key: k, quantity, .. } if *k == key => {
                            Some(*quantity)
                        },
                        _ => None,
                    })
                    .sum()
            };
            let remaining_of =
                |key: OrderKey| book.get(key).map(|o| o.remaining()).unwrap_or(0);

            // Taker side conservation.
            prop_assert_eq!(executed_for(taker_key) + remaining_of(taker_key), quantity);
            prop_assert!(remaining_of(taker_key) >= 0);

            // Maker side conservation, order by order.
            for (i, &(_, q)) in resting.iter().enumerate() {
                let key = OrderKey::new(1, i as i64);
                prop_assert_eq!(executed_for(key) + remaining_of(key), q);
                prop_assert!(remaining_of(key) >= 0);
                // A fully filled order is gone from all views.
                if executed_for(key) == q {
                    prop_assert!(!book.contains(key));
                }
            }
        }

        #[test]
        fn prop_makers_fill_in_price_time_order(
            resting in prop::collection::vec((1i64..10, 1i64..20), 1..12),
            quantity in 1i64..200,
        ) {
            let mut book = OrderBook::new(1);
            let mut setup = Transcript::new();
            for (i, &(p, q)) in resting.iter().enumerate() {
                book.add(sell(1, i as i64, q, p, i as u64), &mut setup);
            }

            let mut out = Transcript::new();
            // Priced above every ask so price never stops the sweep.
            book.add(
                Order::new(2, 1000, Side::Buy, quantity, 100, resting.len() as u64),
                &mut out,
            );

            // Maker executions must come out in ascending (price, arrival)
            // order.
            let maker_ranks: Vec<(i64, i64)> = out
                .lines()
                .iter()
                .filter_map(|m| match m {
                    Message::Executed { key, price, .. } if key.client_id == 1 => {
                        Some((*price, key.order_token))
                    },
                    _ => None,
                })
                .collect();
            let mut sorted = maker_ranks.clone();
            sorted.sort();
            prop_assert_eq!(maker_ranks, sorted);
        }
    }
}
