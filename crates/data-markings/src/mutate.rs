//! Marking mutations: add, remove, set, clear.
//!
//! Every function checks all of its inputs and reads the containers it needs
//! before touching the document, so a failed call leaves it unchanged.

use data_markings_selector::Selector;
use serde_json::{Map, Value};

use crate::args::{resolve_selectors, Refs, Target};
use crate::error::{MarkingError, Result};
use crate::store::{GranularMarkings, ObjectMarkings, OBJECT_MARKING_REFS_KEY};

fn root_map(doc: &mut Value) -> Result<&mut Map<String, Value>> {
    doc.as_object_mut().ok_or(MarkingError::RootNotObject)
}

fn ensure_object_root(doc: &Value) -> Result<()> {
    if doc.is_object() {
        Ok(())
    } else {
        Err(MarkingError::RootNotObject)
    }
}

fn selector_texts(selectors: &[Selector]) -> Vec<String> {
    selectors.iter().map(Selector::to_string).collect()
}

/// Apply `refs` to `target`.
///
/// Object-level refs are unioned into `object_marking_refs`. For selectors,
/// each ref's entry in `granular_markings` gains the selectors; refs without
/// an entry get a new one.
///
/// # Example
///
/// ```
/// use data_markings::{add_markings, Target};
/// use serde_json::json;
///
/// let mut doc = json!({"description": "test description", "title": "foo"});
/// add_markings(&mut doc, ["description", "title"], "marking-definition--1").unwrap();
/// add_markings(&mut doc, Target::Object, "marking-definition--2").unwrap();
///
/// assert_eq!(doc, json!({
///     "description": "test description",
///     "title": "foo",
///     "granular_markings": [
///         {"selectors": ["description", "title"], "marking_ref": "marking-definition--1"}
///     ],
///     "object_marking_refs": ["marking-definition--2"]
/// }));
/// ```
pub fn add_markings<'a, 'b>(
    doc: &mut Value,
    target: impl Into<Target<'a>>,
    refs: impl Into<Refs<'b>>,
) -> Result<()> {
    let refs = refs.into();
    refs.check()?;
    let refs = refs.to_strs();

    match target.into() {
        Target::Object => {
            ensure_object_root(doc)?;
            let mut object = ObjectMarkings::from_document(doc)?;
            object.add(&refs);
            object.write_to(root_map(doc)?);
            tracing::debug!(refs = refs.len(), "added object markings");
        }
        Target::Selectors(items) => {
            let selectors = selector_texts(&resolve_selectors(doc, &items)?);
            ensure_object_root(doc)?;
            let mut granular = GranularMarkings::from_document(doc)?;
            for marking_ref in &refs {
                granular.upsert(marking_ref, selectors.iter().cloned());
            }
            granular.write_to(root_map(doc)?)?;
            tracing::debug!(
                refs = refs.len(),
                selectors = selectors.len(),
                "added granular markings"
            );
        }
    }
    Ok(())
}

/// Take `refs` off `target`.
///
/// Every ref must currently be applied: for the object level it must be in
/// `object_marking_refs`, for selectors it must have a `granular_markings`
/// entry. If any ref fails this the call fails as a whole.
pub fn remove_markings<'a, 'b>(
    doc: &mut Value,
    target: impl Into<Target<'a>>,
    refs: impl Into<Refs<'b>>,
) -> Result<()> {
    let refs = refs.into();
    refs.check()?;
    let refs = refs.to_strs();

    match target.into() {
        Target::Object => {
            ensure_object_root(doc)?;
            let mut object = ObjectMarkings::from_document(doc)?;
            object.remove(&refs)?;
            object.write_to(root_map(doc)?);
            tracing::debug!(refs = refs.len(), "removed object markings");
        }
        Target::Selectors(items) => {
            let selectors = selector_texts(&resolve_selectors(doc, &items)?);
            ensure_object_root(doc)?;
            let mut granular = GranularMarkings::from_document(doc)?;
            for marking_ref in &refs {
                granular.remove_selectors(marking_ref, &selectors)?;
            }
            granular.write_to(root_map(doc)?)?;
            tracing::debug!(
                refs = refs.len(),
                selectors = selectors.len(),
                "removed granular markings"
            );
        }
    }
    Ok(())
}

/// Replace whatever marks `target` with exactly `refs`.
///
/// Same result as [`clear_markings`] followed by [`add_markings`], but all
/// arguments are checked first so nothing is cleared if `refs` is invalid.
pub fn set_markings<'a, 'b>(
    doc: &mut Value,
    target: impl Into<Target<'a>>,
    refs: impl Into<Refs<'b>>,
) -> Result<()> {
    let refs = refs.into();
    refs.check()?;
    let refs = refs.to_strs();

    match target.into() {
        Target::Object => {
            let object = ObjectMarkings::from_refs(refs.iter().copied());
            object.write_to(root_map(doc)?);
            tracing::debug!(refs = refs.len(), "set object markings");
        }
        Target::Selectors(items) => {
            let selectors = selector_texts(&resolve_selectors(doc, &items)?);
            ensure_object_root(doc)?;
            let mut granular = GranularMarkings::from_document(doc)?;
            granular.clear_selectors(&selectors);
            for marking_ref in &refs {
                granular.upsert(marking_ref, selectors.iter().cloned());
            }
            granular.write_to(root_map(doc)?)?;
            tracing::debug!(
                refs = refs.len(),
                selectors = selectors.len(),
                "set granular markings"
            );
        }
    }
    Ok(())
}

/// Drop every marking from `target`.
///
/// For the object level the whole `object_marking_refs` key goes away. For
/// selectors, they are removed from every `granular_markings` entry; a
/// selector that was never marked is not an error.
pub fn clear_markings<'a>(doc: &mut Value, target: impl Into<Target<'a>>) -> Result<()> {
    match target.into() {
        Target::Object => {
            root_map(doc)?.shift_remove(OBJECT_MARKING_REFS_KEY);
            tracing::debug!("cleared object markings");
        }
        Target::Selectors(items) => {
            let selectors = selector_texts(&resolve_selectors(doc, &items)?);
            ensure_object_root(doc)?;
            let mut granular = GranularMarkings::from_document(doc)?;
            granular.clear_selectors(&selectors);
            granular.write_to(root_map(doc)?)?;
            tracing::debug!(selectors = selectors.len(), "cleared granular markings");
        }
    }
    Ok(())
}
