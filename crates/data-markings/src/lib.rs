//! Object-level and granular data markings over JSON documents.
//!
//! A document carries markings in two reserved keys:
//!
//! - `object_marking_refs`: refs applying to the whole document;
//! - `granular_markings`: entries pairing a `marking_ref` with the
//!   selectors (see [`data_markings_selector`]) it applies to.
//!
//! Both keys are present only while non-empty. Marking refs are opaque
//! strings and never interpreted.
//!
//! # Example
//!
//! ```
//! use data_markings::{add_markings, get_markings, is_marked, QueryOptions, Target};
//! use serde_json::json;
//!
//! let mut doc = json!({
//!     "title": "test title",
//!     "x": {"y": ["hello", 88]}
//! });
//!
//! add_markings(&mut doc, Target::Object, "marking-definition--1").unwrap();
//! add_markings(&mut doc, "x.y", "marking-definition--2").unwrap();
//!
//! let direct = get_markings(&doc, "x.y.[0]", QueryOptions::default()).unwrap();
//! assert!(direct.is_empty());
//!
//! let inherited = get_markings(&doc, "x.y.[0]", QueryOptions::default().with_inherited()).unwrap();
//! assert_eq!(inherited.len(), 2);
//!
//! assert!(is_marked(&doc, "x", None, QueryOptions::default().with_descendants()).unwrap());
//! ```

pub mod args;
pub mod error;
pub mod mutate;
pub mod query;
pub mod store;

pub use args::{QueryOptions, Refs, Target};
pub use error::{ArgumentError, ErrorKind, MarkingError, MarkingLevel, Result};
pub use mutate::{add_markings, clear_markings, remove_markings, set_markings};
pub use query::{get_markings, is_marked};
pub use store::{
    GranularMarking, GranularMarkings, ObjectMarkings, GRANULAR_MARKINGS_KEY,
    OBJECT_MARKING_REFS_KEY,
};

pub use data_markings_selector::{Segment, Selector};
