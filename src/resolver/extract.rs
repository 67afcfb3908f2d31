//! Image-URL extraction from arbitrary JSON.
//!
//! Two passes, in order:
//!
//! 1. **Structured extraction** — priority-ordered field rules, kept as plain
//!    `const` data below so the priorities are visible and testable in one
//!    place rather than buried in branching.
//! 2. **Recursive scan** — a depth-first search for the first string that
//!    looks like an http(s) URL. Object entries are visited in document
//!    order (`serde_json` is built with `preserve_order`), array elements in
//!    index order, so identical payloads always yield the same pick.

use serde_json::Value;

/// Keys that may hold the result collection, in priority order.
const COLLECTION_KEYS: &[&str] = &["data", "results"];

/// Preferred entries inside an `urls` sub-object, in priority order.
const URLS_KEYS: &[&str] = &["original", "full", "regular"];

/// Flat candidate fields holding a URL string, in priority order.
const FLAT_KEYS: &[&str] = &["url", "image", "img"];

/// Extract an image URL from a resolved JSON value, if any.
///
/// When a candidate item is found under a collection key, extraction is
/// confined to that item: first the structured rules, then a scan of the
/// item itself. Only when no collection key matches is the whole document
/// scanned.
pub fn image_url(value: &Value) -> Option<String> {
    match candidate(value) {
        Some(item) => structured(item).or_else(|| scan_for_url(item)),
        None => scan_for_url(value),
    }
}

/// Locate the candidate item: the first element of the collection found under
/// a [`COLLECTION_KEYS`] entry, or the collection value itself when it is not
/// a sequence. A top-level array is its own collection.
fn candidate(value: &Value) -> Option<&Value> {
    let collection = match value {
        Value::Object(map) => COLLECTION_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !is_empty(v))?,
        Value::Array(items) if !items.is_empty() => value,
        _ => return None,
    };

    match collection {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// Apply the structured field rules to one candidate item.
fn structured(item: &Value) -> Option<String> {
    let map = item.as_object()?;

    if let Some(urls) = map.get("urls").and_then(Value::as_object)
        && let Some(url) = URLS_KEYS
            .iter()
            .filter_map(|k| urls.get(*k).and_then(Value::as_str))
            .find(|s| !s.is_empty())
    {
        return Some(url.to_string());
    }

    FLAT_KEYS
        .iter()
        .filter_map(|k| map.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Depth-first scan for the first string value starting with `http://` or
/// `https://`.
///
/// Pure and stateless; traversal order is deterministic (document key order,
/// then index order), so the same input always yields the same result.
pub fn scan_for_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.starts_with("http://") || s.starts_with("https://") => {
            Some(s.clone())
        }
        Value::Object(map) => map.values().find_map(scan_for_url),
        Value::Array(items) => items.iter().find_map(scan_for_url),
        _ => None,
    }
}

/// Emptiness check used when choosing the collection: an absent, empty or
/// null collection lets the next key (or the whole-document scan) take over.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(_) => false,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
    }
}
