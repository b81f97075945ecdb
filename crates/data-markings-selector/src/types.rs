//! Type definitions for selector paths.

use std::fmt;
use std::str::FromStr;

use crate::parse::{
    is_valid_field, parse_selector, ParseError, MAX_SELECTOR_DEPTH, MAX_SELECTOR_LENGTH,
};

/// A single step of a selector path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object key lookup: `title`, `foo2`.
    Field(String),
    /// Array position: `[0]`, `[12]`.
    Index(usize),
}

impl Segment {
    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    pub fn as_field(&self) -> Option<&str> {
        match self {
            Segment::Field(name) => Some(name),
            Segment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(idx) => Some(*idx),
            Segment::Field(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::Index(idx) => write!(f, "[{idx}]"),
        }
    }
}

/// A parsed selector: an ordered, non-empty sequence of segments.
///
/// The canonical text form joins segments with `.`, writing index segments
/// as `[N]`, e.g. `x.y.[1]` or `c.[2].g`. Every text accepted by
/// [`Selector::parse`] is already canonical, so `parse(s)?.to_string() == s`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    segments: Vec<Segment>,
}

impl Selector {
    /// Parse selector text.
    ///
    /// # Example
    ///
    /// ```
    /// use data_markings_selector::{Selector, Segment};
    ///
    /// let sel = Selector::parse("c.[2].g").unwrap();
    /// assert_eq!(
    ///     sel.segments(),
    ///     &[Segment::Field("c".into()), Segment::Index(2), Segment::Field("g".into())]
    /// );
    /// assert!(Selector::parse("c..g").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_selector(text)
    }

    /// Build a selector from already-split segments.
    ///
    /// Returns `None` for anything [`Selector::parse`] would reject: an empty
    /// segment list, a malformed field name, or a path over the depth or
    /// length limits.
    pub fn from_segments(segments: Vec<Segment>) -> Option<Self> {
        if segments.is_empty() || segments.len() > MAX_SELECTOR_DEPTH {
            return None;
        }
        let well_formed = segments.iter().all(|seg| match seg {
            Segment::Field(name) => is_valid_field(name),
            Segment::Index(_) => true,
        });
        if !well_formed {
            return None;
        }
        let selector = Self { segments };
        (selector.to_string().len() <= MAX_SELECTOR_LENGTH).then_some(selector)
    }

    pub(crate) fn from_parsed(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a selector has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The selector one level up, or `None` for a top-level field.
    pub fn parent(&self) -> Option<Selector> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// All non-empty proper prefixes, outermost first.
    ///
    /// ```
    /// use data_markings_selector::Selector;
    ///
    /// let sel = Selector::parse("x.y.[1]").unwrap();
    /// let ancestors: Vec<String> = sel.ancestors().map(|a| a.to_string()).collect();
    /// assert_eq!(ancestors, vec!["x", "x.y"]);
    /// ```
    pub fn ancestors(&self) -> impl Iterator<Item = Selector> + '_ {
        (1..self.segments.len()).map(move |k| Self {
            segments: self.segments[..k].to_vec(),
        })
    }

    /// Check if `self` is a strict segment prefix of `other`.
    ///
    /// Siblings and equal paths are not ancestors.
    pub fn is_ancestor_of(&self, other: &Selector) -> bool {
        self.segments.len() < other.segments.len()
            && self.segments[..] == other.segments[..self.segments.len()]
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}
