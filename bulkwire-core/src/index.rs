//! Bulk index and create requests.

use crate::{
    document::DocumentBody,
    error::Result,
    request::{action_line, display_lines, ActionMeta, BulkLines, BulkableRequest},
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, trace, warn};

/// Default action verb for [`BulkIndexRequest`].
pub const DEFAULT_OP_TYPE: &str = "index";

/// Bulk request that adds or replaces a document.
///
/// The request renders to two lines: an action line keyed by the op type
/// (`index` upserts, `create` fails if the document exists) and the
/// document body. Setters clear the rendered cache, so the request can be
/// changed after a render and rendered again.
///
/// # Example
///
/// ```rust
/// use bulkwire_core::{BulkIndexRequest, BulkableRequest};
/// use serde_json::json;
///
/// let mut request: BulkIndexRequest = BulkIndexRequest::new();
/// request
///     .index("test")
///     .doc_type("type1")
///     .id("1")
///     .doc(json!({"field1": "value1"}));
///
/// let lines = request.source().unwrap();
/// assert_eq!(lines.action(), r#"{"index":{"_id":"1","_index":"test","_type":"type1"}}"#);
/// assert_eq!(lines.body(), Some(r#"{"field1":"value1"}"#));
/// ```
#[derive(Debug, Clone)]
pub struct BulkIndexRequest<T = Value> {
    index: String,
    doc_type: String,
    id: String,
    op_type: String,
    routing: String,
    parent: String,
    timestamp: String,
    ttl: i64,
    refresh: Option<bool>,
    version: i64,
    version_type: String,
    doc: Option<DocumentBody<T>>,
    source: Option<BulkLines>,
}

impl<T> Default for BulkIndexRequest<T> {
    fn default() -> Self {
        Self {
            index: String::new(),
            doc_type: String::new(),
            id: String::new(),
            op_type: DEFAULT_OP_TYPE.to_string(),
            routing: String::new(),
            parent: String::new(),
            timestamp: String::new(),
            ttl: 0,
            refresh: None,
            version: 0,
            version_type: String::new(),
            doc: None,
            source: None,
        }
    }
}

impl<T> BulkIndexRequest<T> {
    /// Create a request with the `index` op type.
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

    /// Set the document id. When empty, the service assigns one.
    pub fn id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self.source = None;
        self
    }

    /// Set the action verb: `index` to upsert, `create` to insert only.
    ///
    /// An empty verb restores the default so the action line always has a key.
    pub fn op_type(&mut self, op_type: impl Into<String>) -> &mut Self {
        let op_type = op_type.into();
        self.op_type = if op_type.is_empty() {
            DEFAULT_OP_TYPE.to_string()
        } else {
            op_type
        };
        self.source = None;
        self
    }

    /// Set the shard routing key.
    pub fn routing(&mut self, routing: impl Into<String>) -> &mut Self {
        self.routing = routing.into();
        self.source = None;
        self
    }

    /// Set the parent document id for join relations.
    pub fn parent(&mut self, parent: impl Into<String>) -> &mut Self {
        self.parent = parent.into();
        self.source = None;
        self
    }

    /// Set an explicit document timestamp. Deprecated by the service.
    pub fn timestamp(&mut self, timestamp: impl Into<String>) -> &mut Self {
        self.timestamp = timestamp.into();
        self.source = None;
        self
    }

    /// Set the time to live. Values `<= 0` leave it unset. Deprecated by the service.
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

    /// Set how the version is interpreted: `internal`, `external`,
    /// `external_gte` or `force`.
    pub fn version_type(&mut self, version_type: impl Into<String>) -> &mut Self {
        self.version_type = version_type.into();
        self.source = None;
        self
    }

    /// Set a document to encode with `serde_json` at render time.
    pub fn doc(&mut self, doc: T) -> &mut Self {
        self.doc_body(Some(DocumentBody::Structured(doc)))
    }

    /// Set a pre-encoded JSON document given as bytes.
    pub fn doc_raw(&mut self, doc: impl Into<Bytes>) -> &mut Self {
        self.doc_body(Some(DocumentBody::Raw(doc.into())))
    }

    /// Set a pre-encoded JSON document given as text.
    pub fn doc_text(&mut self, doc: impl Into<String>) -> &mut Self {
        self.doc_body(Some(DocumentBody::Text(doc.into())))
    }

    /// Set or clear the document body.
    pub fn doc_body(&mut self, doc: Option<DocumentBody<T>>) -> &mut Self {
        self.doc = doc;
        self.source = None;
        self
    }

    /// Remove the document body; it renders as `{}`.
    pub fn clear_doc(&mut self) -> &mut Self {
        self.doc_body(None)
    }

    /// The rendered lines, if a render has been cached since the last change.
    pub fn cached(&self) -> Option<&BulkLines> {
        self.source.as_ref()
    }
}

impl<T: Serialize> BulkIndexRequest<T> {
    fn render(&self) -> Result<BulkLines> {
        let meta = ActionMeta {
            id: &self.id,
            index: &self.index,
            parent: &self.parent,
            routing: &self.routing,
            timestamp: &self.timestamp,
            ttl: self.ttl,
            doc_type: &self.doc_type,
            version: self.version,
            version_type: &self.version_type,
            refresh: self.refresh,
            ..Default::default()
        };
        let action = action_line(&self.op_type, &meta)?;

        let body = match &self.doc {
            Some(doc) => doc.encode()?.into_owned(),
            None => "{}".to_string(),
        };

        Ok(BulkLines::new(action, Some(body)))
    }
}

impl<T: Serialize> BulkableRequest for BulkIndexRequest<T> {
    fn action(&self) -> &str {
        &self.op_type
    }

    fn source(&mut self) -> Result<&BulkLines> {
        let lines = match self.source.take() {
            Some(lines) => {
                trace!(op_type = %self.op_type, "Using cached bulk lines");
                lines
            }
            None => {
                let lines = self.render().inspect_err(|err| {
                    warn!(op_type = %self.op_type, id = %self.id, error = %err, "Failed to render bulk request");
                })?;
                debug!(
                    op_type = %self.op_type,
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

impl<T: Serialize> fmt::Display for BulkIndexRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_lines(f, self.source.as_ref(), || self.render())
    }
}
