// ============================================================================
// Transcript Sink
// Ordered, append-only log of emitted protocol lines
// ============================================================================

use std::fmt;

use crate::domain::Message;

/// The transcript of a replay: every protocol line in the exact order
/// produced by processing. Nothing is ever removed.
///
/// The sink is passed `&mut` into each mutating operation rather than
/// shared behind a reference-counted buffer, so emission order still
/// reflects global event order while ownership stays explicit.
///
/// Rendering inserts one blank-line separator between the event-driven
/// section and the final snapshot section (see [`begin_snapshot`]).
///
/// [`begin_snapshot`]: Transcript::begin_snapshot
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<Message>,
    snapshot_start: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.lines.push(message);
    }

    /// Mark the boundary between the event-driven section and the final
    /// book-state snapshot. Idempotent; only the first call sticks.
    pub fn begin_snapshot(&mut self) {
        if self.snapshot_start.is_none() {
            self.snapshot_start = Some(self.lines.len());
        }
    }

    pub fn lines(&self) -> &[Message] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the whole transcript, one line per message, with the
    /// blank-line separator before the snapshot section.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if self.snapshot_start == Some(i) {
                writeln!(f)?;
            }
            writeln!(f, "{line}")?;
        }
        // The separator is emitted even when nothing rests at end-of-stream.
        if self.snapshot_start == Some(self.lines.len()) {
            writeln!(f)?;
        }
        Ok(())
    }
}
