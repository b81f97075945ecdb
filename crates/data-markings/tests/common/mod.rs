#![allow(dead_code)]

use indexmap::IndexSet;
use serde_json::{json, Value};

pub fn set(items: &[&str]) -> IndexSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Nested document with granular refs "1".."10" spread over fields, array
/// elements and nested objects.
pub fn nested_fixture() -> Value {
    json!({
        "a": 333,
        "b": "value",
        "c": [
            17,
            "list value",
            {"g": "nested", "h": 45}
        ],
        "x": {
            "y": ["hello", 88],
            "z": {"foo1": "bar", "foo2": 65}
        },
        "granular_markings": [
            {"marking_ref": "1", "selectors": ["a"]},
            {"marking_ref": "2", "selectors": ["c"]},
            {"marking_ref": "3", "selectors": ["c.[1]"]},
            {"marking_ref": "4", "selectors": ["c.[2]"]},
            {"marking_ref": "5", "selectors": ["c.[2].g"]},
            {"marking_ref": "6", "selectors": ["x"]},
            {"marking_ref": "7", "selectors": ["x.y"]},
            {"marking_ref": "8", "selectors": ["x.y.[1]"]},
            {"marking_ref": "9", "selectors": ["x.z"]},
            {"marking_ref": "10", "selectors": ["x.z.foo2"]}
        ]
    })
}

/// Same as [`nested_fixture`] with object-level ref "11".
pub fn nested_fixture_with_object_marking() -> Value {
    let mut doc = nested_fixture();
    doc["object_marking_refs"] = json!(["11"]);
    doc
}

/// Flat document with overlapping refs on a few fields.
pub fn flat_fixture() -> Value {
    json!({
        "title": "test title",
        "description": "test description",
        "revision": 2,
        "type": "test",
        "granular_markings": [
            {"selectors": ["description"], "marking_ref": "marking-definition--1"},
            {"selectors": ["revision", "description"], "marking_ref": "marking-definition--2"},
            {"selectors": ["revision", "description"], "marking_ref": "marking-definition--3"}
        ]
    })
}

/// Selectors that parse but do not resolve in [`nested_fixture`], or that
/// fail the grammar.
pub const BAD_SELECTORS: &[&str] = &[
    "foo", "", "x.z.[-2]", "c.f", "c.[2].i", "c.[3]", "d", "x.[0]", "x.y.w", "x.z.[1]",
    "x.z.foo3",
];
