// ============================================================================
// Interfaces Module
// Contracts with the outside world: input events and the transcript sink
// ============================================================================

pub mod event;
pub mod transcript;

pub use event::Event;
pub use transcript::Transcript;
