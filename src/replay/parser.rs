// ============================================================================
// Event Log Parser
// Decodes one input record per line into a typed event
// ============================================================================

use std::fmt;

use crate::domain::Side;
use crate::interfaces::Event;

/// Errors raised while decoding an event-log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// First field is neither `O` (enter order) nor `X` (cancel).
    UnknownKind { kind: String },
    /// A required field is absent or blank.
    MissingField { field: &'static str },
    /// A numeric field did not parse.
    InvalidNumber { field: &'static str, value: String },
    /// Side tag is neither `B` nor `S`.
    InvalidSide { value: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownKind { kind } => {
                write!(f, "unknown event kind: {kind:?}")
            },
            ParseError::MissingField { field } => write!(f, "missing field: {field}"),
            ParseError::InvalidNumber { field, value } => {
                write!(f, "invalid number for {field}: {value:?}")
            },
            ParseError::InvalidSide { value } => write!(f, "invalid side: {value:?}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Result type alias for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse one event-log line.
///
/// Add: `O, Client 1, OrderBook 2, Token 3, B, 100, 10`
/// Cancel: `X, Client 1, Token 3`
///
/// Labeled fields (`Client 1`) take the token after the label; a bare
/// number is accepted too. Quantity and price take the leading token, so
/// unit suffixes after the number are tolerated.
pub fn parse_line(line: &str) -> ParseResult<Event> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();

    match fields[0] {
        "O" => Ok(Event::Add {
            client_id: labeled("client id", fields.get(1))?,
            book_id: labeled("book id", fields.get(2))?,
            order_token: labeled("order token", fields.get(3))?,
            side: side(fields.get(4))?,
            quantity: leading("quantity", fields.get(5))?,
            price: leading("price", fields.get(6))?,
        }),
        "X" => Ok(Event::Cancel {
            client_id: labeled("client id", fields.get(1))?,
            order_token: labeled("order token", fields.get(2))?,
        }),
        kind => Err(ParseError::UnknownKind {
            kind: kind.to_string(),
        }),
    }
}

/// Number in the last whitespace token: `Client 1` or just `1`.
fn labeled(field: &'static str, text: Option<&&str>) -> ParseResult<i64> {
    let raw = text
        .and_then(|t| t.split_whitespace().last())
        .ok_or(ParseError::MissingField { field })?;
    parse_number(field, raw)
}

/// Number in the first whitespace token: `100` or `100 shares`.
fn leading(field: &'static str, text: Option<&&str>) -> ParseResult<i64> {
    let raw = text
        .and_then(|t| t.split_whitespace().next())
        .ok_or(ParseError::MissingField { field })?;
    parse_number(field, raw)
}

fn parse_number(field: &'static str, raw: &str) -> ParseResult<i64> {
    raw.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn side(text: Option<&&str>) -> ParseResult<Side> {
    let raw = text
        .filter(|t| !t.is_empty())
        .ok_or(ParseError::MissingField { field: "side" })?;
    Side::from_tag(raw).ok_or_else(|| ParseError::InvalidSide {
        value: raw.to_string(),
    })
}
