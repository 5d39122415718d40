// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod book;
pub mod config;
pub mod message;
pub mod order;
pub mod priority;

pub use book::OrderBook;
pub use config::{BookConfig, CrossPolicy};
pub use message::Message;
pub use order::{BookId, ClientId, Order, OrderKey, OrderToken, Price, Quantity, Side};
pub use priority::{AskRank, BidRank};
