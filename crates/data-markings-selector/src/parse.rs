//! Selector grammar: `segment ('.' segment)*`, `segment := field | '[' index ']'`.

use thiserror::Error;

use crate::types::{Segment, Selector};

/// Maximum allowed selector text length.
pub const MAX_SELECTOR_LENGTH: usize = 1024;

/// Maximum allowed number of segments.
pub const MAX_SELECTOR_DEPTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("selector is empty")]
    Empty,
    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },
    #[error("malformed index at position {position}")]
    InvalidIndex { position: usize },
    #[error("malformed field name at position {position}")]
    InvalidField { position: usize },
    #[error("selector longer than {} bytes", MAX_SELECTOR_LENGTH)]
    TooLong,
    #[error("selector deeper than {} segments", MAX_SELECTOR_DEPTH)]
    TooDeep,
}

/// Check if a string is a valid array index: ASCII digits, no leading zero
/// unless it is exactly `0`.
///
/// ```
/// use data_markings_selector::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("17"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-2"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Check if a string can stand as a field segment.
pub fn is_valid_field(name: &str) -> bool {
    !name.is_empty() && !name.contains(['.', '[', ']'])
}

fn parse_segment(text: &str, position: usize) -> Result<Segment, ParseError> {
    if text.is_empty() {
        return Err(ParseError::EmptySegment { position });
    }
    if let Some(rest) = text.strip_prefix('[') {
        let digits = rest
            .strip_suffix(']')
            .ok_or(ParseError::InvalidIndex { position })?;
        if !is_valid_index(digits) {
            return Err(ParseError::InvalidIndex { position });
        }
        let idx = digits
            .parse()
            .map_err(|_| ParseError::InvalidIndex { position })?;
        return Ok(Segment::Index(idx));
    }
    if !is_valid_field(text) {
        return Err(ParseError::InvalidField { position });
    }
    Ok(Segment::Field(text.to_string()))
}

/// Parse selector text into a [`Selector`].
pub fn parse_selector(text: &str) -> Result<Selector, ParseError> {
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    if text.len() > MAX_SELECTOR_LENGTH {
        return Err(ParseError::TooLong);
    }
    let mut segments = Vec::new();
    for (position, part) in text.split('.').enumerate() {
        if position >= MAX_SELECTOR_DEPTH {
            return Err(ParseError::TooDeep);
        }
        segments.push(parse_segment(part, position)?);
    }
    Ok(Selector::from_parsed(segments))
}
