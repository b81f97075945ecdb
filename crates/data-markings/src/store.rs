//! In-memory views of the two reserved marking containers.
//!
//! Both containers are read out of the document, edited as plain values and
//! written back only when a mutation has fully succeeded. An empty container
//! is never written: its key is removed instead.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MarkingError, MarkingLevel, Result};

/// Document key holding the per-selector markings.
pub const GRANULAR_MARKINGS_KEY: &str = "granular_markings";

/// Document key holding the whole-document markings.
pub const OBJECT_MARKING_REFS_KEY: &str = "object_marking_refs";

/// One `granular_markings` entry as it appears in the document.
///
/// Fields other than `selectors` and `marking_ref` (such as `lang`) are kept
/// in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranularMarking {
    pub selectors: Vec<String>,
    pub marking_ref: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GranularMarking {
    pub fn new(marking_ref: impl Into<String>, selectors: Vec<String>) -> Self {
        Self {
            selectors,
            marking_ref: marking_ref.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Entry {
    selectors: IndexSet<String>,
    extra: Map<String, Value>,
}

/// Granular markings keyed by marking ref.
///
/// Each ref owns exactly one ordered selector set, so a ref can never appear
/// in two entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GranularMarkings {
    by_ref: IndexMap<String, Entry>,
}

impl GranularMarkings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `granular_markings` container of a document.
    ///
    /// A missing key (or a non-object root) yields an empty store. Entries
    /// repeating a ref are merged into the first one; extra fields of the
    /// first occurrence win.
    pub fn from_document(doc: &Value) -> Result<Self> {
        let Some(raw) = doc.get(GRANULAR_MARKINGS_KEY) else {
            return Ok(Self::new());
        };
        let entries = Vec::<GranularMarking>::deserialize(raw).map_err(|e| {
            MarkingError::MalformedContainer {
                key: GRANULAR_MARKINGS_KEY,
                reason: e.to_string(),
            }
        })?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = GranularMarking>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.upsert(&entry.marking_ref, entry.selectors);
            if let Some(stored) = store.by_ref.get_mut(&entry.marking_ref) {
                for (key, value) in entry.extra {
                    stored.extra.entry(key).or_insert(value);
                }
            }
        }
        store
    }

    pub fn is_empty(&self) -> bool {
        self.by_ref.is_empty()
    }

    /// Number of distinct refs.
    pub fn len(&self) -> usize {
        self.by_ref.len()
    }

    /// The document form: one entry per ref, in first-seen order.
    pub fn entries(&self) -> Vec<GranularMarking> {
        self.by_ref
            .iter()
            .map(|(marking_ref, entry)| GranularMarking {
                selectors: entry.selectors.iter().cloned().collect(),
                marking_ref: marking_ref.clone(),
                extra: entry.extra.clone(),
            })
            .collect()
    }

    pub fn selectors_for(&self, marking_ref: &str) -> Option<&IndexSet<String>> {
        self.by_ref.get(marking_ref).map(|entry| &entry.selectors)
    }

    /// Refs that carry at least one selector accepted by `pred`.
    pub fn markings_matching<'s, F>(&'s self, pred: F) -> impl Iterator<Item = &'s str> + 's
    where
        F: Fn(&str) -> bool + 's,
    {
        self.by_ref
            .iter()
            .filter(move |(_, entry)| entry.selectors.iter().any(|s| pred(s.as_str())))
            .map(|(marking_ref, _)| marking_ref.as_str())
    }

    /// Refs applied to exactly `selector`.
    pub fn direct_markings<'s>(&'s self, selector: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.markings_matching(move |s| s == selector)
    }

    /// Union `selectors` into the entry for `marking_ref`, creating it if needed.
    pub fn upsert<I, S>(&mut self, marking_ref: &str, selectors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut incoming = selectors.into_iter().map(Into::<String>::into).peekable();
        if incoming.peek().is_none() {
            return;
        }
        self.by_ref
            .entry(marking_ref.to_string())
            .or_default()
            .selectors
            .extend(incoming);
    }

    /// Take `selectors` out of the entry for `marking_ref`.
    ///
    /// Fails when the ref has no entry. The entry is dropped once empty.
    pub fn remove_selectors<S: AsRef<str>>(&mut self, marking_ref: &str, selectors: &[S]) -> Result<()> {
        let Some(entry) = self.by_ref.get_mut(marking_ref) else {
            return Err(MarkingError::NotMarked {
                marking_ref: marking_ref.to_string(),
                level: MarkingLevel::Granular,
            });
        };
        for selector in selectors {
            entry.selectors.shift_remove(selector.as_ref());
        }
        if entry.selectors.is_empty() {
            self.by_ref.shift_remove(marking_ref);
        }
        Ok(())
    }

    /// Take `selectors` out of every entry, whatever its ref.
    pub fn clear_selectors<S: AsRef<str>>(&mut self, selectors: &[S]) {
        for entry in self.by_ref.values_mut() {
            for selector in selectors {
                entry.selectors.shift_remove(selector.as_ref());
            }
        }
        self.by_ref.retain(|_, entry| !entry.selectors.is_empty());
    }

    /// Store the container under its reserved key, or remove the key if empty.
    ///
    /// The document is left as it was if the entries fail to serialize.
    pub fn write_to(&self, doc: &mut Map<String, Value>) -> Result<()> {
        if self.is_empty() {
            doc.shift_remove(GRANULAR_MARKINGS_KEY);
            return Ok(());
        }
        let entries = serde_json::to_value(self.entries()).map_err(|e| {
            MarkingError::MalformedContainer {
                key: GRANULAR_MARKINGS_KEY,
                reason: e.to_string(),
            }
        })?;
        doc.insert(GRANULAR_MARKINGS_KEY.to_string(), entries);
        Ok(())
    }
}

/// Whole-document markings: a deduplicated, ordered ref set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMarkings {
    refs: IndexSet<String>,
}

impl ObjectMarkings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `object_marking_refs` container of a document.
    ///
    /// A bare string is accepted as a single ref.
    pub fn from_document(doc: &Value) -> Result<Self> {
        let malformed = |reason: &str| MarkingError::MalformedContainer {
            key: OBJECT_MARKING_REFS_KEY,
            reason: reason.to_string(),
        };
        match doc.get(OBJECT_MARKING_REFS_KEY) {
            None => Ok(Self::new()),
            Some(Value::String(single)) => Ok(Self::from_refs([single.as_str()])),
            Some(Value::Array(items)) => {
                let mut refs = IndexSet::with_capacity(items.len());
                for item in items {
                    let marking_ref = item.as_str().ok_or_else(|| malformed("non-string ref"))?;
                    refs.insert(marking_ref.to_string());
                }
                Ok(Self { refs })
            }
            Some(_) => Err(malformed("expected an array of strings")),
        }
    }

    pub fn from_refs<I, S>(refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            refs: refs.into_iter().map(Into::<String>::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn contains(&self, marking_ref: &str) -> bool {
        self.refs.contains(marking_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.refs.iter().map(String::as_str)
    }

    pub fn refs(&self) -> &IndexSet<String> {
        &self.refs
    }

    pub fn add<S: AsRef<str>>(&mut self, refs: &[S]) {
        self.refs.extend(refs.iter().map(|r| r.as_ref().to_string()));
    }

    /// Remove every given ref; fails without changes if any is absent.
    pub fn remove<S: AsRef<str>>(&mut self, refs: &[S]) -> Result<()> {
        if let Some(missing) = refs.iter().find(|r| !self.refs.contains(r.as_ref())) {
            return Err(MarkingError::NotMarked {
                marking_ref: missing.as_ref().to_string(),
                level: MarkingLevel::Object,
            });
        }
        for marking_ref in refs {
            self.refs.shift_remove(marking_ref.as_ref());
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.refs.clear();
    }

    /// Store the set under its reserved key, or remove the key if empty.
    pub fn write_to(&self, doc: &mut Map<String, Value>) {
        if self.is_empty() {
            doc.shift_remove(OBJECT_MARKING_REFS_KEY);
            return;
        }
        let refs = self.refs.iter().cloned().map(Value::String).collect();
        doc.insert(OBJECT_MARKING_REFS_KEY.to_string(), Value::Array(refs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect<'a>(it: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
        it.collect()
    }

    #[test]
    fn test_granular_merges_duplicate_refs() {
        let doc = json!({
            "description": "d",
            "title": "t",
            "granular_markings": [
                {"selectors": ["description"], "marking_ref": "m1"},
                {"selectors": ["title"], "marking_ref": "m1"}
            ]
        });
        let store = GranularMarkings::from_document(&doc).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.entries(),
            vec![GranularMarking::new(
                "m1",
                vec!["description".to_string(), "title".to_string()],
            )]
        );
    }

    #[test]
    fn test_granular_missing_container() {
        let store = GranularMarkings::from_document(&json!({"a": 1})).unwrap();
        assert!(store.is_empty());
        let store = GranularMarkings::from_document(&json!([1, 2])).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_granular_malformed_container() {
        let doc = json!({"granular_markings": [{"selectors": "a", "marking_ref": "m"}]});
        let err = GranularMarkings::from_document(&doc).unwrap_err();
        assert!(matches!(
            err,
            MarkingError::MalformedContainer { key: GRANULAR_MARKINGS_KEY, .. }
        ));
    }

    #[test]
    fn test_upsert_and_direct_markings() {
        let mut store = GranularMarkings::new();
        store.upsert("m1", ["a", "b"]);
        store.upsert("m2", ["b"]);
        store.upsert("m1", ["b", "c"]);

        assert_eq!(collect(store.direct_markings("b")), vec!["m1", "m2"]);
        assert_eq!(collect(store.direct_markings("c")), vec!["m1"]);
        assert!(collect(store.direct_markings("d")).is_empty());
        let m1: Vec<&str> = store.selectors_for("m1").unwrap().iter().map(String::as_str).collect();
        assert_eq!(m1, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_upsert_nothing_creates_no_entry() {
        let mut store = GranularMarkings::new();
        store.upsert("m1", Vec::<String>::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_selectors_prunes() {
        let mut store = GranularMarkings::new();
        store.upsert("m1", ["a", "b"]);
        store.remove_selectors("m1", &["a"]).unwrap();
        assert_eq!(store.len(), 1);
        store.remove_selectors("m1", &["b"]).unwrap();
        assert!(store.is_empty());

        let err = store.remove_selectors("m1", &["a"]).unwrap_err();
        assert_eq!(
            err,
            MarkingError::NotMarked {
                marking_ref: "m1".to_string(),
                level: MarkingLevel::Granular,
            }
        );
    }

    #[test]
    fn test_clear_selectors_any_ref() {
        let mut store = GranularMarkings::new();
        store.upsert("m1", ["description"]);
        store.upsert("m2", ["revision", "description"]);
        store.upsert("m3", ["revision", "description", "type"]);

        store.clear_selectors(&["description", "never-marked"]);
        assert_eq!(store.len(), 2);
        store.clear_selectors(&["revision", "type"]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_granular_write_to() {
        let mut doc = json!({"a": 1});
        let mut store = GranularMarkings::new();
        store.upsert("m1", ["a"]);
        store.write_to(doc.as_object_mut().unwrap()).unwrap();
        assert_eq!(
            doc,
            json!({"a": 1, "granular_markings": [{"selectors": ["a"], "marking_ref": "m1"}]})
        );

        GranularMarkings::new().write_to(doc.as_object_mut().unwrap()).unwrap();
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn test_granular_keeps_extra_entry_fields() {
        let doc = json!({
            "a": 1,
            "b": 2,
            "granular_markings": [
                {"selectors": ["a"], "marking_ref": "m1", "lang": "en"},
                {"selectors": ["b"], "marking_ref": "m1", "lang": "fr", "note": "x"}
            ]
        });
        let mut store = GranularMarkings::from_document(&doc).unwrap();
        store.upsert("m2", ["b"]);

        let mut out = doc.clone();
        store.write_to(out.as_object_mut().unwrap()).unwrap();
        assert_eq!(
            out["granular_markings"],
            json!([
                {"selectors": ["a", "b"], "marking_ref": "m1", "lang": "en", "note": "x"},
                {"selectors": ["b"], "marking_ref": "m2"}
            ])
        );
    }

    #[test]
    fn test_write_to_keeps_key_order() {
        let mut doc = json!({
            "a": 1,
            "granular_markings": [],
            "object_marking_refs": ["m"],
            "b": 2,
            "c": 3
        });
        let map = doc.as_object_mut().unwrap();
        GranularMarkings::new().write_to(map).unwrap();
        ObjectMarkings::new().write_to(map);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_object_bare_string() {
        let doc = json!({"object_marking_refs": "11"});
        let refs = ObjectMarkings::from_document(&doc).unwrap();
        assert_eq!(refs.iter().collect::<Vec<_>>(), vec!["11"]);
    }

    #[test]
    fn test_object_dedup_and_malformed() {
        let doc = json!({"object_marking_refs": ["m1", "m1", "m2"]});
        let refs = ObjectMarkings::from_document(&doc).unwrap();
        assert_eq!(refs.iter().collect::<Vec<_>>(), vec!["m1", "m2"]);

        let doc = json!({"object_marking_refs": ["m1", 5]});
        assert!(ObjectMarkings::from_document(&doc).is_err());
        let doc = json!({"object_marking_refs": {"m1": true}});
        assert!(ObjectMarkings::from_document(&doc).is_err());
    }

    #[test]
    fn test_object_remove_requires_presence() {
        let mut refs = ObjectMarkings::from_refs(["m1", "m2", "m3"]);
        let err = refs.remove(&["m1", "m5"]).unwrap_err();
        assert_eq!(
            err,
            MarkingError::NotMarked {
                marking_ref: "m5".to_string(),
                level: MarkingLevel::Object,
            }
        );
        assert_eq!(refs.refs().len(), 3);

        refs.remove(&["m1", "m3"]).unwrap();
        assert_eq!(refs.iter().collect::<Vec<_>>(), vec!["m2"]);
    }

    #[test]
    fn test_object_add_and_write() {
        let mut doc = json!({"title": "t"});
        let mut refs = ObjectMarkings::new();
        refs.add(&["m1", "m2", "m1"]);
        refs.write_to(doc.as_object_mut().unwrap());
        assert_eq!(doc, json!({"title": "t", "object_marking_refs": ["m1", "m2"]}));

        refs.clear();
        refs.write_to(doc.as_object_mut().unwrap());
        assert_eq!(doc, json!({"title": "t"}));
    }
}
