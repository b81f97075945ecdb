//! Argument types accepted by the query and mutation functions.

use std::borrow::Cow;

use data_markings_selector::{validate, Selector};
use serde_json::Value;

use crate::error::{ArgumentError, MarkingError, Result};

/// What a marking operation applies to.
///
/// `Object` addresses the whole document (`object_marking_refs`);
/// `Selectors` addresses locations inside it (`granular_markings`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a> {
    Object,
    Selectors(Vec<Cow<'a, str>>),
}

/// A list of opaque marking refs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refs<'a>(pub Vec<Cow<'a, str>>);

macro_rules! impl_from_lists {
    ($ty:ident, $ctor:path) => {
        impl<'a> From<&'a str> for $ty<'a> {
            fn from(s: &'a str) -> Self {
                $ctor(vec![Cow::Borrowed(s)])
            }
        }

        impl<'a> From<&'a String> for $ty<'a> {
            fn from(s: &'a String) -> Self {
                $ctor(vec![Cow::Borrowed(s.as_str())])
            }
        }

        impl<'a> From<String> for $ty<'a> {
            fn from(s: String) -> Self {
                $ctor(vec![Cow::Owned(s)])
            }
        }

        impl<'a, 'b> From<&'b [&'a str]> for $ty<'a> {
            fn from(items: &'b [&'a str]) -> Self {
                $ctor(items.iter().map(|s| Cow::Borrowed(*s)).collect())
            }
        }

        impl<'a, 'b, const N: usize> From<&'b [&'a str; N]> for $ty<'a> {
            fn from(items: &'b [&'a str; N]) -> Self {
                $ctor(items.iter().map(|s| Cow::Borrowed(*s)).collect())
            }
        }

        impl<'a, const N: usize> From<[&'a str; N]> for $ty<'a> {
            fn from(items: [&'a str; N]) -> Self {
                $ctor(items.into_iter().map(Cow::Borrowed).collect())
            }
        }

        impl<'a> From<Vec<&'a str>> for $ty<'a> {
            fn from(items: Vec<&'a str>) -> Self {
                $ctor(items.into_iter().map(Cow::Borrowed).collect())
            }
        }

        impl<'a> From<&'a [String]> for $ty<'a> {
            fn from(items: &'a [String]) -> Self {
                $ctor(items.iter().map(|s| Cow::Borrowed(s.as_str())).collect())
            }
        }

        impl<'a> From<&'a Vec<String>> for $ty<'a> {
            fn from(items: &'a Vec<String>) -> Self {
                $ctor(items.iter().map(|s| Cow::Borrowed(s.as_str())).collect())
            }
        }

        impl<'a> From<Vec<String>> for $ty<'a> {
            fn from(items: Vec<String>) -> Self {
                $ctor(items.into_iter().map(Cow::Owned).collect())
            }
        }
    };
}

impl_from_lists!(Target, Target::Selectors);
impl_from_lists!(Refs, Refs);

/// JSON hosts: `null` is the whole document, a string is one selector, an
/// array of strings is a selector list.
impl<'a> TryFrom<&'a Value> for Target<'a> {
    type Error = MarkingError;

    fn try_from(value: &'a Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Target::Object),
            Value::String(s) => Ok(Target::Selectors(vec![Cow::Borrowed(s.as_str())])),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(position, item)| {
                    item.as_str()
                        .map(Cow::Borrowed)
                        .ok_or(MarkingError::SelectorNotAString { position })
                })
                .collect::<Result<Vec<_>>>()
                .map(Target::Selectors),
            _ => Err(MarkingError::SelectorNotAString { position: 0 }),
        }
    }
}

impl<'a> TryFrom<&'a Value> for Refs<'a> {
    type Error = MarkingError;

    fn try_from(value: &'a Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Refs(vec![Cow::Borrowed(s.as_str())])),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(position, item)| {
                    item.as_str()
                        .map(Cow::Borrowed)
                        .ok_or(MarkingError::from(ArgumentError::NotAString { position }))
                })
                .collect::<Result<Vec<_>>>()
                .map(Refs),
            _ => Err(ArgumentError::NotAString { position: 0 }.into()),
        }
    }
}

impl<'a> Refs<'a> {
    /// Check the list is non-empty and has no empty entries.
    pub fn check(&self) -> Result<(), ArgumentError> {
        if self.0.is_empty() {
            return Err(ArgumentError::NoRefs);
        }
        match self.0.iter().position(|r| r.is_empty()) {
            Some(position) => Err(ArgumentError::EmptyRef { position }),
            None => Ok(()),
        }
    }

    pub fn as_slice(&self) -> &[Cow<'a, str>] {
        &self.0
    }

    pub(crate) fn to_strs(&self) -> Vec<&str> {
        self.0.iter().map(|r| &**r).collect()
    }
}

/// Flags controlling which related selectors contribute to a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Include markings on ancestor selectors and object-level markings.
    pub inherited: bool,
    /// Include markings on selectors nested under the queried one.
    pub descendants: bool,
}

impl QueryOptions {
    pub fn new(inherited: bool, descendants: bool) -> Self {
        Self {
            inherited,
            descendants,
        }
    }

    pub fn with_inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    pub fn with_descendants(mut self) -> Self {
        self.descendants = true;
        self
    }
}

/// Parse every selector and check it resolves in `doc`.
///
/// Returns the selectors in input order; an empty list is rejected.
pub(crate) fn resolve_selectors(doc: &Value, items: &[Cow<'_, str>]) -> Result<Vec<Selector>> {
    if items.is_empty() {
        return Err(MarkingError::NoSelectors);
    }
    items
        .iter()
        .map(|text| {
            let selector = Selector::parse(text).map_err(|source| MarkingError::Grammar {
                selector: text.to_string(),
                source,
            })?;
            validate(doc, &selector).map_err(|source| MarkingError::Resolution {
                selector: text.to_string(),
                source,
            })?;
            Ok(selector)
        })
        .collect()
}
