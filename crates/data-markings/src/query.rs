//! Marking queries: `get_markings` and `is_marked`.

use data_markings_selector::Selector;
use indexmap::IndexSet;
use serde_json::Value;

use crate::args::{resolve_selectors, QueryOptions, Refs, Target};
use crate::error::Result;
use crate::store::{GranularMarkings, ObjectMarkings};

fn extend_owned<'a>(out: &mut IndexSet<String>, refs: impl Iterator<Item = &'a str>) {
    out.extend(refs.map(str::to_string));
}

/// Markings reaching one selector under the given options.
fn collect_for_selector(
    out: &mut IndexSet<String>,
    selector: &Selector,
    granular: &GranularMarkings,
    object: &ObjectMarkings,
    options: QueryOptions,
) {
    let text = selector.to_string();
    extend_owned(out, granular.direct_markings(&text));

    if options.inherited {
        for ancestor in selector.ancestors() {
            extend_owned(out, granular.direct_markings(&ancestor.to_string()));
        }
        extend_owned(out, object.iter());
    }

    if options.descendants {
        // Stored selectors that no longer parse can't be under anything.
        let nested = granular.markings_matching(|stored| {
            Selector::parse(stored).is_ok_and(|candidate| selector.is_ancestor_of(&candidate))
        });
        extend_owned(out, nested);
    }
}

/// Collect the marking refs applied to `target`.
///
/// For [`Target::Object`] this is the document's object-level set and the
/// options are ignored. For selectors, every selector must resolve in `doc`;
/// the result is the union over all of them of the direct markings, plus
/// ancestor and object-level markings when `inherited`, plus markings on
/// nested selectors when `descendants`.
///
/// The returned set compares equal regardless of order.
///
/// # Example
///
/// ```
/// use data_markings::{get_markings, QueryOptions};
/// use serde_json::json;
///
/// let doc = json!({
///     "x": {"y": ["hello", 88]},
///     "granular_markings": [
///         {"selectors": ["x"], "marking_ref": "6"},
///         {"selectors": ["x.y.[1]"], "marking_ref": "8"}
///     ]
/// });
///
/// let direct = get_markings(&doc, "x.y", QueryOptions::default()).unwrap();
/// assert!(direct.is_empty());
///
/// let all = get_markings(&doc, "x.y", QueryOptions::new(true, true)).unwrap();
/// assert_eq!(all.len(), 2);
/// assert!(all.contains("6") && all.contains("8"));
/// ```
pub fn get_markings<'a>(
    doc: &Value,
    target: impl Into<Target<'a>>,
    options: QueryOptions,
) -> Result<IndexSet<String>> {
    let items = match target.into() {
        Target::Object => return Ok(ObjectMarkings::from_document(doc)?.refs().clone()),
        Target::Selectors(items) => items,
    };
    let selectors = resolve_selectors(doc, &items)?;
    let granular = GranularMarkings::from_document(doc)?;
    let object = if options.inherited {
        ObjectMarkings::from_document(doc)?
    } else {
        ObjectMarkings::new()
    };

    let mut out = IndexSet::new();
    for selector in &selectors {
        collect_for_selector(&mut out, selector, &granular, &object, options);
    }
    tracing::trace!(
        selectors = selectors.len(),
        inherited = options.inherited,
        descendants = options.descendants,
        found = out.len(),
        "collected markings"
    );
    Ok(out)
}

/// Check whether `target` carries markings.
///
/// With `refs` absent this is "any marking at all"; otherwise every given
/// ref must be among the collected markings. Unknown refs make the check
/// false, they are not an error.
///
/// # Example
///
/// ```
/// use data_markings::{is_marked, QueryOptions, Refs};
/// use serde_json::json;
///
/// let doc = json!({
///     "revision": 2,
///     "type": "test",
///     "granular_markings": [{"selectors": ["revision"], "marking_ref": "m2"}]
/// });
///
/// let opts = QueryOptions::default();
/// assert!(is_marked(&doc, "revision", None, opts).unwrap());
/// assert!(!is_marked(&doc, "type", None, opts).unwrap());
/// assert!(!is_marked(&doc, "revision", Some(Refs::from(["m2", "m8"])), opts).unwrap());
/// ```
pub fn is_marked<'a>(
    doc: &Value,
    target: impl Into<Target<'a>>,
    refs: Option<Refs<'_>>,
    options: QueryOptions,
) -> Result<bool> {
    if let Some(refs) = &refs {
        refs.check()?;
    }
    let computed = get_markings(doc, target, options)?;
    Ok(match refs {
        None => !computed.is_empty(),
        Some(refs) => refs.as_slice().iter().all(|r| computed.contains(&**r)),
    })
}
