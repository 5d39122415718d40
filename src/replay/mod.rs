// ============================================================================
// Replay Driver
// Runs a whole event log through a fresh engine and renders the transcript
// ============================================================================

pub mod parser;

use std::fmt;
use std::io::{self, BufRead};

use crate::domain::BookConfig;
use crate::engine::Engine;
use crate::interfaces::Transcript;

pub use parser::{parse_line, ParseError, ParseResult};

/// Failure of a whole replay run. Fail-fast: the first bad line aborts the
/// run and no transcript is returned.
#[derive(Debug)]
pub enum ReplayError {
    /// A line of the event log did not parse. Line numbers are 1-based.
    Parse { line: usize, source: ParseError },
    /// The underlying reader failed.
    Io(io::Error),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Parse { line, source } => {
                write!(f, "parse error at line {line}: {source}")
            },
            ReplayError::Io(err) => write!(f, "read error: {err}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Parse { source, .. } => Some(source),
            ReplayError::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(err: io::Error) -> Self {
        ReplayError::Io(err)
    }
}

/// Replay an event log held in memory, one event per line, and return the
/// rendered transcript. Blank lines are skipped.
pub fn run(input: &str) -> Result<String, ReplayError> {
    run_with_config(input, BookConfig::default())
}

/// As [`run`], with explicit per-book configuration.
pub fn run_with_config(input: &str, config: BookConfig) -> Result<String, ReplayError> {
    let mut engine = Engine::with_config(config);
    let mut out = Transcript::new();

    for (idx, line) in input.lines().enumerate() {
        apply_line(&mut engine, &mut out, idx + 1, line)?;
    }

    engine.finish(&mut out);
    Ok(out.render())
}

/// Replay an event log from a buffered reader. The caller owns opening the
/// input and writing the returned transcript out.
pub fn run_reader<R: BufRead>(reader: R) -> Result<String, ReplayError> {
    run_reader_with_config(reader, BookConfig::default())
}

/// As [`run_reader`], with explicit per-book configuration.
pub fn run_reader_with_config<R: BufRead>(
    reader: R,
    config: BookConfig,
) -> Result<String, ReplayError> {
    let mut engine = Engine::with_config(config);
    let mut out = Transcript::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        apply_line(&mut engine, &mut out, idx + 1, &line)?;
    }

    engine.finish(&mut out);
    Ok(out.render())
}

fn apply_line(
    engine: &mut Engine,
    out: &mut Transcript,
    line_number: usize,
    line: &str,
) -> Result<(), ReplayError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let event = parser::parse_line(trimmed).map_err(|source| ReplayError::Parse {
        line: line_number,
        source,
    })?;
    tracing::trace!(line = line_number, ?event, "applying event");
    engine.apply(event, out);
    Ok(())
}
