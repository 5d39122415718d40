// ============================================================================
// Protocol Messages
// Wire lines emitted into the transcript, one per state change
// ============================================================================

use std::fmt;

use super::order::{OrderKey, Price, Quantity, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single transcript line.
///
/// Field order and the literal `", "` separators are part of the contract;
/// external consumers parse by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Message {
    /// `A, Client {id}, Token {token}` - order acknowledged.
    Accepted { key: OrderKey },

    /// `C, Client {id}, Token {token}` - resting order cancelled.
    Cancelled { key: OrderKey },

    /// `E, Client {id}, Token {token}, {qty}, {price}` - execution.
    Executed {
        key: OrderKey,
        quantity: Quantity,
        price: Price,
    },

    /// `O, Client {id}, Token {token}, {B|S}, {qty}, {price}` - final
    /// snapshot line for an order still resting at end-of-stream.
    Resting {
        key: OrderKey,
        side: Side,
        remaining: Quantity,
        price: Price,
    },
}

impl Message {
    pub fn key(&self) -> OrderKey {
        match self {
            Message::Accepted { key }
            | Message::Cancelled { key }
            | Message::Executed { key, .. }
            | Message::Resting { key, .. } => *key,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            Message::Accepted { .. } => 'A',
            Message::Cancelled { .. } => 'C',
            Message::Executed { .. } => 'E',
            Message::Resting { .. } => 'O',
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Accepted { key } => {
                write!(f, "A, Client {}, Token {}", key.client_id, key.order_token)
            },
            Message::Cancelled { key } => {
                write!(f, "C, Client {}, Token {}", key.client_id, key.order_token)
            },
            Message::Executed {
                key,
                quantity,
                price,
            } => write!(
                f,
                "E, Client {}, Token {}, {}, {}",
                key.client_id, key.order_token, quantity, price
            ),
            Message::Resting {
                key,
                side,
                remaining,
                price,
            } => write!(
                f,
                "O, Client {}, Token {}, {}, {}, {}",
                key.client_id,
                key.order_token,
                side.as_tag(),
                remaining,
                price
            ),
        }
    }
}
