// ============================================================================
// Order Domain Model
// ============================================================================

use chrono::{DateTime, Utc};

use super::message::Message;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Client identifier as carried on the wire.
pub type ClientId = i64;
/// Client-assigned order token; unique per run together with the client id.
pub type OrderToken = i64;
/// Order book identifier.
pub type BookId = i64;
/// Integer limit price. Accepted as-is, including zero and negative values.
pub type Price = i64;
/// Integer quantity. Accepted as-is, including zero and negative values.
pub type Quantity = i64;

/// Order identity: `(client_id, order_token)`, unique across the whole run.
///
/// Identity is deliberately decoupled from the order record itself.
/// Cancellation and removal-by-identity compare only these two fields,
/// never price, quantity or side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderKey {
    pub client_id: ClientId,
    pub order_token: OrderToken,
}

impl OrderKey {
    pub fn new(client_id: ClientId, order_token: OrderToken) -> Self {
        Self {
            client_id,
            order_token,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire tag used by both the event log and the status snapshot.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Side::Buy => "B",
            Side::Sell => "S",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "B" => Some(Side::Buy),
            "S" => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// A plain limit order: immutable identity plus mutable remaining quantity.
///
/// `seq` is a monotonically increasing arrival counter assigned by the
/// engine at creation. It is the only time tie-break; the wall-clock
/// `accepted_at` timestamp is informational.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Order {
    pub key: OrderKey,
    pub side: Side,
    pub price: Price,
    pub seq: u64,
    pub accepted_at: DateTime<Utc>,
    remaining: Quantity,
}

impl Order {
    pub fn new(
        client_id: ClientId,
        order_token: OrderToken,
        side: Side,
        quantity: Quantity,
        price: Price,
        seq: u64,
    ) -> Self {
        Self {
            key: OrderKey::new(client_id, order_token),
            side,
            price,
            seq,
            accepted_at: Utc::now(),
            remaining: quantity,
        }
    }

    pub fn remaining(&self) -> Quantity {
        self.remaining
    }

    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Execute `quantity` at `price` against this order.
    ///
    /// The caller guarantees `quantity <= remaining`. Returns the execution
    /// message describing the fill.
    pub fn execute(&mut self, quantity: Quantity, price: Price) -> Message {
        debug_assert!(quantity <= self.remaining);
        self.remaining -= quantity;
        Message::Executed {
            key: self.key,
            quantity,
            price,
        }
    }

    pub fn acknowledgement(&self) -> Message {
        Message::Accepted { key: self.key }
    }

    pub fn cancellation(&self) -> Message {
        Message::Cancelled { key: self.key }
    }

    /// Status line for the final book-state snapshot.
    pub fn status(&self) -> Message {
        Message::Resting {
            key: self.key,
            side: self.side,
            remaining: self.remaining,
            price: self.price,
        }
    }
}
