// ============================================================================
// Replay Matcher Library
// Deterministic limit-order replay engine with price/time priority matching
// ============================================================================

//! # Replay Matcher
//!
//! A deterministic replay engine for limit-order event logs. Events are
//! applied one at a time against independent order books and every state
//! change is emitted as a protocol line into an ordered transcript.
//!
//! ## Features
//!
//! - **Price/time priority** matching with partial fills and
//!   multi-level sweeps
//! - **Per-level coalescing** of the aggressing order's executions
//! - **Multi-book routing** with lazy book creation and book-agnostic
//!   cancellation
//! - **Exact transcript** reproduction, including the final book-state
//!   snapshot
//! - **Configurable crossing** at equal prices (strict by default)
//!
//! ## Example
//!
//! ```rust
//! use replay_matcher::prelude::*;
//!
//! let mut engine = Engine::new();
//! let mut transcript = Transcript::new();
//!
//! engine.apply(
//!     Event::Add {
//!         client_id: 1,
//!         book_id: 1,
//!         order_token: 1,
//!         side: Side::Buy,
//!         quantity: 100,
//!         price: 10,
//!     },
//!     &mut transcript,
//! );
//! engine.finish(&mut transcript);
//!
//! assert_eq!(
//!     transcript.render(),
//!     "A, Client 1, Token 1\n\nO, Client 1, Token 1, B, 100, 10\n"
//! );
//! ```
//!
//! Whole event logs can be replayed in one call with [`replay::run`]; the
//! caller keeps ownership of file I/O.

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod replay;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        BookConfig, BookId, ClientId, CrossPolicy, Message, Order, OrderBook, OrderKey,
        OrderToken, Price, Quantity, Side,
    };
    pub use crate::engine::Engine;
    pub use crate::interfaces::{Event, Transcript};
    pub use crate::replay::{ParseError, ReplayError};
}
