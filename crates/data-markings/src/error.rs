//! Error type shared by every marking operation.

use data_markings_selector::{ParseError, ResolveError};
use thiserror::Error;

/// Problems with a marking-ref argument.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("no marking refs given")]
    NoRefs,
    #[error("marking ref at position {position} is empty")]
    EmptyRef { position: usize },
    #[error("marking ref at position {position} is not a string")]
    NotAString { position: usize },
}

/// Which of the two reserved containers a removal targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkingLevel {
    Object,
    Granular,
}

impl std::fmt::Display for MarkingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkingLevel::Object => f.write_str("object"),
            MarkingLevel::Granular => f.write_str("granular"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkingError {
    #[error("invalid selector {selector:?}: {source}")]
    Grammar {
        selector: String,
        #[source]
        source: ParseError,
    },
    #[error("no selectors given")]
    NoSelectors,
    #[error("selector at position {position} is not a string")]
    SelectorNotAString { position: usize },
    #[error("selector {selector:?} does not resolve: {source}")]
    Resolution {
        selector: String,
        #[source]
        source: ResolveError,
    },
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error("marking {marking_ref:?} is not present in the {level} markings")]
    NotMarked {
        marking_ref: String,
        level: MarkingLevel,
    },
    #[error("reserved key {key:?} is malformed: {reason}")]
    MalformedContainer { key: &'static str, reason: String },
    #[error("document root is not an object")]
    RootNotObject,
}

/// Coarse classification of [`MarkingError`] for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Selector text or selector list is malformed.
    Grammar,
    /// A well-formed selector does not resolve in the document.
    Resolution,
    /// A marking-ref list is empty or carries an empty or non-string entry.
    Argument,
    /// A removal named a ref that is not currently applied.
    RemovalPrecondition,
    /// The document itself cannot hold or yield markings.
    Document,
}

impl MarkingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarkingError::Grammar { .. }
            | MarkingError::NoSelectors
            | MarkingError::SelectorNotAString { .. } => ErrorKind::Grammar,
            MarkingError::Resolution { .. } => ErrorKind::Resolution,
            MarkingError::Argument(_) => ErrorKind::Argument,
            MarkingError::NotMarked { .. } => ErrorKind::RemovalPrecondition,
            MarkingError::MalformedContainer { .. } | MarkingError::RootNotObject => {
                ErrorKind::Document
            }
        }
    }
}

pub type Result<T, E = MarkingError> = std::result::Result<T, E>;
