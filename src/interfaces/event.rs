// ============================================================================
// Input Events
// Typed events consumed from the external event source
// ============================================================================

use crate::domain::{BookId, ClientId, OrderToken, Price, Quantity, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One logical record of the input event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Event {
    /// Kind `O`: enter a limit order into the named book.
    Add {
        client_id: ClientId,
        book_id: BookId,
        order_token: OrderToken,
        side: Side,
        quantity: Quantity,
        price: Price,
    },

    /// Kind `X`: cancel by identity. Carries no book id; the engine probes
    /// every book.
    Cancel {
        client_id: ClientId,
        order_token: OrderToken,
    },
}
