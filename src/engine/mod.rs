// ============================================================================
// Engine Module
// Event routing across independent order books
// ============================================================================

mod router;

pub use router::Engine;
