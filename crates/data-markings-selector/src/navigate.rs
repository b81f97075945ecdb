//! Walking a JSON document along a selector.

use serde_json::Value;
use thiserror::Error;

use crate::types::{Segment, Selector};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveErrorKind {
    #[error("key not found")]
    MissingKey,
    #[error("field segment applied to a non-object")]
    NotAnObject,
    #[error("index segment applied to a non-array")]
    NotAnArray,
    #[error("index out of bounds for array of length {len}")]
    OutOfBounds { len: usize },
}

/// A selector step that could not be taken.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("segment {position} ({segment}): {kind}")]
pub struct ResolveError {
    /// Zero-based position of the failing segment.
    pub position: usize,
    pub segment: Segment,
    pub kind: ResolveErrorKind,
}

fn step<'a>(current: &'a Value, segment: &Segment) -> Result<&'a Value, ResolveErrorKind> {
    match (segment, current) {
        (Segment::Field(name), Value::Object(map)) => {
            map.get(name).ok_or(ResolveErrorKind::MissingKey)
        }
        (Segment::Field(_), _) => Err(ResolveErrorKind::NotAnObject),
        (Segment::Index(idx), Value::Array(arr)) => arr
            .get(*idx)
            .ok_or(ResolveErrorKind::OutOfBounds { len: arr.len() }),
        (Segment::Index(_), _) => Err(ResolveErrorKind::NotAnArray),
    }
}

/// Resolve a selector against a document, returning the addressed node.
///
/// # Errors
///
/// Fails at the first segment that cannot be taken: a missing key, an
/// out-of-range index, or a segment kind that does not match the node.
///
/// # Example
///
/// ```
/// use data_markings_selector::{resolve, Selector};
/// use serde_json::json;
///
/// let doc = json!({"c": [17, "v", {"g": "nested"}]});
/// let sel = Selector::parse("c.[2].g").unwrap();
/// assert_eq!(resolve(&doc, &sel).unwrap(), &json!("nested"));
///
/// let missing = Selector::parse("c.[3]").unwrap();
/// assert!(resolve(&doc, &missing).is_err());
/// ```
pub fn resolve<'a>(doc: &'a Value, selector: &Selector) -> Result<&'a Value, ResolveError> {
    let mut current = doc;
    for (position, segment) in selector.segments().iter().enumerate() {
        current = step(current, segment).map_err(|kind| ResolveError {
            position,
            segment: segment.clone(),
            kind,
        })?;
    }
    Ok(current)
}

/// Check whether a selector resolves inside a document.
pub fn validate(doc: &Value, selector: &Selector) -> Result<(), ResolveError> {
    resolve(doc, selector).map(|_| ())
}
