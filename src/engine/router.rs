// ============================================================================
// Engine
// Routes events to order books, creating books lazily on first reference
// ============================================================================

use std::collections::HashMap;

use crate::domain::{BookConfig, BookId, ClientId, Order, OrderBook, OrderKey, OrderToken};
use crate::interfaces::{Event, Transcript};

/// Multi-book replay engine.
///
/// Books are created lazily on the first add that references their id and
/// live for the whole run. They are stored in creation order; cancel
/// events, which carry no book id, probe the books in that order, and the
/// final snapshot walks them in that order too.
///
/// Arrival sequence numbers are assigned here, globally across books, so
/// time priority ties break deterministically even when two events carry
/// the same wall-clock timestamp.
///
/// Unchecked precondition: order identities are unique for the lifetime of
/// a run. A second add reusing a `(client_id, order_token)` pair corrupts
/// the identity index (last write wins).
#[derive(Debug, Default)]
pub struct Engine {
    config: BookConfig,
    books: Vec<OrderBook>,
    book_index: HashMap<BookId, usize>,
    next_seq: u64,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BookConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Process one event, appending whatever it emits to the transcript.
    pub fn apply(&mut self, event: Event, out: &mut Transcript) {
        match event {
            Event::Add {
                client_id,
                book_id,
                order_token,
                side,
                quantity,
                price,
            } => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let order = Order::new(client_id, order_token, side, quantity, price, seq);
                self.route_add(book_id, order, out);
            },
            Event::Cancel {
                client_id,
                order_token,
            } => self.route_cancel(client_id, order_token, out),
        }
    }

    /// Dispatch an order to its book, creating the book on first reference.
    pub fn route_add(&mut self, book_id: BookId, order: Order, out: &mut Transcript) {
        let idx = match self.book_index.get(&book_id) {
            Some(&idx) => idx,
            None => {
                tracing::debug!(book = book_id, "creating order book");
                let idx = self.books.len();
                self.books.push(OrderBook::with_config(book_id, self.config));
                self.book_index.insert(book_id, idx);
                idx
            },
        };
        self.books[idx].add(order, out);
    }

    /// Try the cancel against every book in creation order. Identities are
    /// globally unique, so at most one book emits a cancellation.
    pub fn route_cancel(&mut self, client_id: ClientId, order_token: OrderToken, out: &mut Transcript) {
        let key = OrderKey::new(client_id, order_token);
        for book in &mut self.books {
            if book.cancel(key, out) {
                return;
            }
        }
        tracing::trace!(
            client = client_id,
            token = order_token,
            "cancel for unknown order ignored"
        );
    }

    /// End-of-stream: dump every still-resting order into the transcript,
    /// book by book in creation order, each book in first-touch order.
    pub fn finish(&self, out: &mut Transcript) {
        out.begin_snapshot();
        for book in &self.books {
            for order in book.resting() {
                out.push(order.status());
            }
        }
    }

    pub fn book(&self, book_id: BookId) -> Option<&OrderBook> {
        self.book_index.get(&book_id).map(|&idx| &self.books[idx])
    }

    /// Books in creation order.
    pub fn books(&self) -> impl Iterator<Item = &OrderBook> {
        self.books.iter()
    }

    pub fn num_books(&self) -> usize {
        self.books.len()
    }
}
