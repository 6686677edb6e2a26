//! Bulk update requests.

use crate::{
    document::DocumentBody,
    error::Result,
    request::{action_line, display_lines, ActionMeta, BulkLines, BulkableRequest},
    script::Script,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{value::RawValue, Value};
use std::fmt;
use tracing::{debug, trace, warn};

/// Bulk request that partially updates a document.
///
/// The body line holds the partial document, an optional script and an
/// optional upsert document. Pre-encoded bodies are embedded verbatim and
/// must hold a single valid JSON value.
///
/// ```rust
/// use bulkwire_core::{BulkUpdateRequest, BulkableRequest};
/// use serde_json::json;
///
/// let mut request: BulkUpdateRequest = BulkUpdateRequest::new();
/// request
///     .index("index1")
///     .doc_type("tweet")
///     .id("1")
///     .doc(json!({"counter": 42}));
///
/// let lines = request.source().unwrap();
/// assert_eq!(lines.action(), r#"{"update":{"_id":"1","_index":"index1","_type":"tweet"}}"#);
/// assert_eq!(lines.body(), Some(r#"{"doc":{"counter":42}}"#));
/// ```
#[derive(Debug, Clone)]
pub struct BulkUpdateRequest<T = Value> {
    index: String,
    doc_type: String,
    id: String,
    routing: String,
    parent: String,
    timestamp: String,
    ttl: i64,
    refresh: Option<bool>,
    version: i64,
    version_type: String,
    retry_on_conflict: Option<u32>,
    doc: Option<DocumentBody<T>>,
    upsert: Option<DocumentBody<T>>,
    doc_as_upsert: Option<bool>,
    script: Option<Script>,
    source: Option<BulkLines>,
}

impl<T> Default for BulkUpdateRequest<T> {
    fn default() -> Self {
        Self {
            index: String::new(),
            doc_type: String::new(),
            id: String::new(),
            routing: String::new(),
            parent: String::new(),
            timestamp: String::new(),
            ttl: 0,
            refresh: None,
            version: 0,
            version_type: String::new(),
            retry_on_conflict: None,
            doc: None,
            upsert: None,
            doc_as_upsert: None,
            script: None,
            source: None,
        }
    }
}

impl<T> BulkUpdateRequest<T> {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target index. When empty, the batch-level index applies.
    pub fn index(&mut self, index: impl Into<String>) -> &mut Self {
        self.index = index.into();
        self.source = None;
        self
    }

    /// Set the mapping type. When empty, the batch-level type applies.
    pub fn doc_type(&mut self, doc_type: impl Into<String>) -> &mut Self {
        self.doc_type = doc_type.into();
        self.source = None;
        self
    }

    /// Set the id of the document to update.
    pub fn id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self.source = None;
        self
    }

    /// Set the shard routing key.
    pub fn routing(&mut self, routing: impl Into<String>) -> &mut Self {
        self.routing = routing.into();
        self.source = None;
        self
    }

    /// Set the parent document id.
    pub fn parent(&mut self, parent: impl Into<String>) -> &mut Self {
        self.parent = parent.into();
        self.source = None;
        self
    }

    /// Set an explicit timestamp. Deprecated by the service.
    pub fn timestamp(&mut self, timestamp: impl Into<String>) -> &mut Self {
        self.timestamp = timestamp.into();
        self.source = None;
        self
    }

    /// Set the time to live. Values `<= 0` leave it unset.
    pub fn ttl(&mut self, ttl: i64) -> &mut Self {
        self.ttl = ttl;
        self.source = None;
        self
    }

    /// Force the affected shards to refresh once the bulk completes.
    pub fn refresh(&mut self, refresh: bool) -> &mut Self {
        self.refresh = Some(refresh);
        self.source = None;
        self
    }

    /// Set the expected version. Values `<= 0` leave it unset.
    pub fn version(&mut self, version: i64) -> &mut Self {
        self.version = version;
        self.source = None;
        self
    }

    /// Set how the version is interpreted.
    pub fn version_type(&mut self, version_type: impl Into<String>) -> &mut Self {
        self.version_type = version_type.into();
        self.source = None;
        self
    }

    /// Retry the update this many times on version conflicts.
    pub fn retry_on_conflict(&mut self, retries: u32) -> &mut Self {
        self.retry_on_conflict = Some(retries);
        self.source = None;
        self
    }

    /// Set the partial document to merge.
    pub fn doc(&mut self, doc: T) -> &mut Self {
        self.doc_body(Some(DocumentBody::Structured(doc)))
    }

    /// Set a pre-encoded partial document given as bytes.
    pub fn doc_raw(&mut self, doc: impl Into<Bytes>) -> &mut Self {
        self.doc_body(Some(DocumentBody::Raw(doc.into())))
    }

    /// Set a pre-encoded partial document given as text.
    pub fn doc_text(&mut self, doc: impl Into<String>) -> &mut Self {
        self.doc_body(Some(DocumentBody::Text(doc.into())))
    }

    /// Set or clear the partial document.
    pub fn doc_body(&mut self, doc: Option<DocumentBody<T>>) -> &mut Self {
        self.doc = doc;
        self.source = None;
        self
    }

    /// Set the document to insert when the target does not exist.
    pub fn upsert(&mut self, upsert: T) -> &mut Self {
        self.upsert_body(Some(DocumentBody::Structured(upsert)))
    }

    /// Set a pre-encoded upsert document given as bytes.
    pub fn upsert_raw(&mut self, upsert: impl Into<Bytes>) -> &mut Self {
        self.upsert_body(Some(DocumentBody::Raw(upsert.into())))
    }

    /// Set a pre-encoded upsert document given as text.
    pub fn upsert_text(&mut self, upsert: impl Into<String>) -> &mut Self {
        self.upsert_body(Some(DocumentBody::Text(upsert.into())))
    }

    /// Set or clear the upsert document.
    pub fn upsert_body(&mut self, upsert: Option<DocumentBody<T>>) -> &mut Self {
        self.upsert = upsert;
        self.source = None;
        self
    }

    /// Use the partial document as the upsert document.
    pub fn doc_as_upsert(&mut self, doc_as_upsert: bool) -> &mut Self {
        self.doc_as_upsert = Some(doc_as_upsert);
        self.source = None;
        self
    }

    /// Set the update script.
    pub fn script(&mut self, script: Script) -> &mut Self {
        self.script = Some(script);
        self.source = None;
        self
    }

    /// The rendered lines, if a render has been cached since the last change.
    pub fn cached(&self) -> Option<&BulkLines> {
        self.source.as_ref()
    }
}

impl<T: Serialize> BulkUpdateRequest<T> {
    fn render(&self) -> Result<BulkLines> {
        let meta = ActionMeta {
            id: &self.id,
            index: &self.index,
            parent: &self.parent,
            retry_on_conflict: self.retry_on_conflict,
            routing: &self.routing,
            timestamp: &self.timestamp,
            ttl: self.ttl,
            doc_type: &self.doc_type,
            version: self.version,
            version_type: &self.version_type,
            refresh: self.refresh,
        };
        let action = action_line("update", &meta)?;

        let body = UpdateBody {
            doc: self.doc.as_ref().map(embed).transpose()?,
            doc_as_upsert: self.doc_as_upsert,
            script: self.script.as_ref(),
            upsert: self.upsert.as_ref().map(embed).transpose()?,
        };

        Ok(BulkLines::new(action, Some(serde_json::to_string(&body)?)))
    }
}

/// Body line of an update, keys in alphabetical order.
#[derive(Serialize)]
struct UpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_as_upsert: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    script: Option<&'a Script>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upsert: Option<Box<RawValue>>,
}

/// Encode a document for embedding; pre-encoded text must be valid JSON.
fn embed<T: Serialize>(doc: &DocumentBody<T>) -> Result<Box<RawValue>> {
    Ok(RawValue::from_string(doc.encode()?.into_owned())?)
}

impl<T: Serialize> BulkableRequest for BulkUpdateRequest<T> {
    fn action(&self) -> &str {
        "update"
    }

    fn source(&mut self) -> Result<&BulkLines> {
        let lines = match self.source.take() {
            Some(lines) => {
                trace!(op_type = "update", "Using cached bulk lines");
                lines
            }
            None => {
                let lines = self.render().inspect_err(|err| {
                    warn!(op_type = "update", id = %self.id, error = %err, "Failed to render bulk request");
                })?;
                debug!(
                    op_type = "update",
                    bytes = lines.estimated_size_in_bytes(),
                    "Rendered bulk request"
                );
                lines
            }
        };
        let lines: &BulkLines = self.source.insert(lines);
        Ok(lines)
    }
}

impl<T: Serialize> fmt::Display for BulkUpdateRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_lines(f, self.source.as_ref(), || self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BulkError;
    use serde_json::json;
    use std::collections::HashMap;

    fn update() -> BulkUpdateRequest {
        BulkUpdateRequest::new()
    }

    #[test]
    fn test_update_with_doc() {
        let mut request = update();
        request
            .index("index1")
            .doc_type("tweet")
            .id("1")
            .doc(json!({"counter": 42}));
        let lines = request.source().unwrap();
        assert_eq!(
            lines.action(),
            r#"{"update":{"_id":"1","_index":"index1","_type":"tweet"}}"#
        );
        assert_eq!(lines.body(), Some(r#"{"doc":{"counter":42}}"#));
    }

    #[test]
    fn test_update_empty_body() {
        let mut request = update();
        let lines = request.source().unwrap();
        assert_eq!(lines.action(), r#"{"update":{}}"#);
        assert_eq!(lines.body(), Some("{}"));
    }

    #[test]
    fn test_update_meta_order() {
        let mut request = update();
        request
            .refresh(true)
            .version_type("external")
            .version(5)
            .ttl(10)
            .timestamp("ts")
            .routing("r")
            .retry_on_conflict(3)
            .parent("p")
            .doc_type("t")
            .index("i")
            .id("1");
        assert_eq!(
            request.source().unwrap().action(),
            concat!(
                r#"{"update":{"_id":"1","_index":"i","_parent":"p","_retry_on_conflict":3,"#,
                r#""_routing":"r","_timestamp":"ts","_ttl":10,"_type":"t","_version":5,"#,
                r#""_version_type":"external","refresh":true}}"#
            )
        );
    }

    #[test]
    fn test_update_body_order() {
        let mut request = update();
        request
            .upsert(json!({"counter": 1}))
            .script(Script::new("ctx._source.counter += 1"))
            .doc_as_upsert(true)
            .doc(json!({"counter": 2}));
        assert_eq!(
            request.source().unwrap().body(),
            Some(concat!(
                r#"{"doc":{"counter":2},"doc_as_upsert":true,"#,
                r#""script":{"inline":"ctx._source.counter += 1"},"upsert":{"counter":1}}"#
            ))
        );
    }

    #[test]
    fn test_update_raw_doc_embedded() {
        let mut request = update();
        request.id("1").doc_text(r#"{"a":"b"}"#).upsert_raw(&b"{\"c\":1}"[..]);
        let body = request.source().unwrap().body().unwrap().to_string();
        assert_eq!(body, r#"{"doc":{"a":"b"},"upsert":{"c":1}}"#);
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, json!({"doc": {"a": "b"}, "upsert": {"c": 1}}));
    }

    #[test]
    fn test_update_rejects_malformed_pre_encoded_doc() {
        let mut request = update();
        request.id("1").doc_text(r#"{"a":"#);
        let err = request.source().unwrap_err();
        assert!(matches!(err, BulkError::Encoding(_)));
        assert!(request.cached().is_none());

        request.upsert_text(r#"{"a":1}"#).doc_text(r#"{"a": 2}"#);
        assert_eq!(
            request.source().unwrap().body(),
            Some(r#"{"doc":{"a": 2},"upsert":{"a":1}}"#)
        );
    }

    #[test]
    fn test_update_encoding_failure() {
        // Maps with non-string keys cannot be represented as JSON objects.
        let mut doc = HashMap::new();
        doc.insert(vec![1u8, 2], "value");
        let mut request: BulkUpdateRequest<HashMap<Vec<u8>, &str>> = BulkUpdateRequest::new();
        request.id("1").doc(doc);

        assert!(request.source().unwrap_err().is_encoding_failure());
        assert!(request.cached().is_none());

        request.doc_text("{}");
        assert_eq!(request.source().unwrap().body(), Some(r#"{"doc":{}}"#));
    }

    #[test]
    fn test_update_cache_invalidation() {
        let mut request = update();
        request.id("1").doc(json!({"a": 1}));
        let first = request.source().unwrap().clone();
        assert_eq!(request.source().unwrap(), &first);

        request.doc_as_upsert(false);
        assert!(request.cached().is_none());
        assert_eq!(
            request.source().unwrap().body(),
            Some(r#"{"doc":{"a":1},"doc_as_upsert":false}"#)
        );
    }

    #[test]
    fn test_update_display() {
        let mut request = update();
        request.id("1");
        assert_eq!(request.to_string(), "{\"update\":{\"_id\":\"1\"}}\n{}");
        assert_eq!(request.action(), "update");
    }
}
