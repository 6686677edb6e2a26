//! Document bodies carried by bulk requests.

use crate::error::Result;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// The body of a bulk request, tagged by how it should reach the wire.
///
/// Pre-encoded bodies (`Raw` and `Text`) are trusted to already be valid
/// JSON and are passed through untouched. Only `Structured` values go
/// through `serde_json`, which is also the only place rendering can fail.
///
/// # Example
///
/// ```rust
/// use bulkwire_core::DocumentBody;
/// use serde_json::json;
///
/// let text: DocumentBody = DocumentBody::text(r#"{"title":"hello"}"#);
/// assert_eq!(text.encode().unwrap(), r#"{"title":"hello"}"#);
///
/// let value = DocumentBody::structured(json!({"title": "hello"}));
/// assert_eq!(value.encode().unwrap(), r#"{"title":"hello"}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody<T = Value> {
    /// Already-serialized JSON bytes.
    Raw(Bytes),
    /// Already-serialized JSON text.
    Text(String),
    /// A value to encode with `serde_json` at render time.
    Structured(T),
}

impl<T> DocumentBody<T> {
    /// Wrap pre-encoded JSON bytes.
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        DocumentBody::Raw(bytes.into())
    }

    /// Wrap pre-encoded JSON text.
    pub fn text(text: impl Into<String>) -> Self {
        DocumentBody::Text(text.into())
    }

    /// Wrap a value that is encoded when the request is rendered.
    pub fn structured(value: T) -> Self {
        DocumentBody::Structured(value)
    }

    /// Check if the body is passed through without re-encoding.
    pub fn is_pre_encoded(&self) -> bool {
        !matches!(self, DocumentBody::Structured(_))
    }
}

impl<T: Serialize> DocumentBody<T> {
    /// Encode the body as a single JSON line.
    ///
    /// Pre-encoded text is borrowed as-is. Raw bytes must be UTF-8.
    pub fn encode(&self) -> Result<Cow<'_, str>> {
        match self {
            DocumentBody::Raw(bytes) => Ok(Cow::Borrowed(std::str::from_utf8(bytes)?)),
            DocumentBody::Text(text) => Ok(Cow::Borrowed(text.as_str())),
            DocumentBody::Structured(value) => Ok(Cow::Owned(serde_json::to_string(value)?)),
        }
    }
}

impl<T> From<Bytes> for DocumentBody<T> {
    fn from(bytes: Bytes) -> Self {
        DocumentBody::Raw(bytes)
    }
}

impl<T> From<Vec<u8>> for DocumentBody<T> {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentBody::Raw(Bytes::from(bytes))
    }
}

impl<T> From<String> for DocumentBody<T> {
    fn from(text: String) -> Self {
        DocumentBody::Text(text)
    }
}

impl<T> From<&str> for DocumentBody<T> {
    fn from(text: &str) -> Self {
        DocumentBody::Text(text.to_string())
    }
}
