//! Selector paths for granular data markings.
//!
//! A selector names a location inside a JSON document with dot-separated
//! segments. Field segments are object keys; index segments are written
//! `[N]` and always stand as their own dotted component.
//!
//! # Example
//!
//! ```
//! use data_markings_selector::{resolve, Selector};
//! use serde_json::json;
//!
//! let doc = json!({"x": {"y": ["hello", 88], "z": {"foo2": 65}}});
//!
//! let sel: Selector = "x.y.[1]".parse().unwrap();
//! assert_eq!(sel.to_string(), "x.y.[1]");
//! assert_eq!(resolve(&doc, &sel).unwrap(), &json!(88));
//!
//! // Ancestors are the non-empty proper prefixes.
//! let names: Vec<String> = sel.ancestors().map(|a| a.to_string()).collect();
//! assert_eq!(names, vec!["x", "x.y"]);
//! ```

pub mod navigate;
pub mod parse;
pub mod types;

pub use navigate::{resolve, validate, ResolveError, ResolveErrorKind};
pub use parse::{
    is_valid_field, is_valid_index, parse_selector, ParseError, MAX_SELECTOR_DEPTH,
    MAX_SELECTOR_LENGTH,
};
pub use types::{Segment, Selector};
