//! Response resolution — classify an arbitrary HTTP response and extract an
//! image reference from it.
//!
//! Upstream image APIs are heterogeneous and mostly undocumented: some return
//! JSON in any of a dozen shapes, some redirect straight to raw image bytes,
//! some return plain text. [`resolve`] is a one-shot classification ladder
//! over (status, content-type, body) that degrades gracefully instead of
//! failing whenever any plausible image reference can be located:
//!
//! 1. status >= 400 — upstream failure, truncated body as the message;
//! 2. body parses as JSON — error-field check, then structured field
//!    extraction, then a deterministic recursive scan (see [`extract`]);
//! 3. `image/*` content type — raw bytes, passed through untouched;
//! 4. anything else — truncated plain text.
//!
//! `resolve` is a pure function: no shared state, never panics, and never
//! returns a Rust error. Malformed JSON simply falls through to steps 3/4.

mod extract;

pub use extract::scan_for_url;

use serde_json::Value;

/// Cap on body text echoed back to the user in error/plain-text replies.
pub const TEXT_TRUNCATE_LIMIT: usize = 500;

/// Why resolution produced no image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Upstream returned a non-success HTTP status.
    HttpStatus,
    /// Upstream explicitly signalled an error in its JSON body.
    Api,
    /// Resolution completed but no image reference was found.
    NoImage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ResolveFailure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

/// The outcome of classifying one HTTP response. Exactly one variant per
/// resolution; consumed immediately by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An image URL extracted from a JSON body.
    ImageUrl(String),
    /// Raw image bytes, byte-for-byte as received.
    ImageBytes { content_type: String, bytes: Vec<u8> },
    /// Non-image, non-JSON content — truncated for display.
    PlainText(String),
    Failed(ResolveFailure),
}

/// Classify one HTTP response.
pub fn resolve(status: u16, content_type: Option<&str>, body: &[u8]) -> Resolution {
    if status >= 400 {
        return Resolution::Failed(ResolveFailure::new(
            FailureKind::HttpStatus,
            truncate(&String::from_utf8_lossy(body), TEXT_TRUNCATE_LIMIT),
        ));
    }

    // JSON is attempted regardless of the advertised content type — several
    // upstream APIs serve JSON under text/plain or text/html. A bare `null`
    // body carries nothing to extract and is reclassified below instead.
    if let Ok(value) = serde_json::from_slice::<Value>(body)
        && !value.is_null()
    {
        return resolve_json(&value);
    }

    match content_type {
        Some(ct) if ct.starts_with("image/") => Resolution::ImageBytes {
            content_type: ct.to_string(),
            bytes: body.to_vec(),
        },
        _ => Resolution::PlainText(truncate(
            &String::from_utf8_lossy(body),
            TEXT_TRUNCATE_LIMIT,
        )),
    }
}

fn resolve_json(value: &Value) -> Resolution {
    if let Some(err) = value.get("error").filter(|e| is_truthy(e)) {
        let message = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Resolution::Failed(ResolveFailure::new(FailureKind::Api, message));
    }

    match extract::image_url(value) {
        Some(url) => Resolution::ImageUrl(url),
        None => Resolution::Failed(ResolveFailure::new(
            FailureKind::NoImage,
            "no image url in JSON",
        )),
    }
}

/// Truthiness for the `error` field check: empty strings, `false`, zero and
/// empty containers do not count as an error signal.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(m) => !m.is_empty(),
    }
}

/// Truncate on a char boundary so multi-byte text never splits mid-character.
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}
