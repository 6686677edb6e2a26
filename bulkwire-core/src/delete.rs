//! Bulk delete requests.

use crate::{
    error::Result,
    request::{action_line, display_lines, ActionMeta, BulkLines, BulkableRequest},
};
use std::fmt;
use tracing::{debug, trace, warn};

/// Bulk request that removes a document.
///
/// Renders to a single action line; a delete carries no body.
///
/// ```rust
/// use bulkwire_core::{BulkDeleteRequest, BulkableRequest};
///
/// let mut request = BulkDeleteRequest::new();
/// request.index("index1").doc_type("tweet").id("1");
///
/// let lines = request.source().unwrap();
/// assert_eq!(lines.action(), r#"{"delete":{"_id":"1","_index":"index1","_type":"tweet"}}"#);
/// assert_eq!(lines.body(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BulkDeleteRequest {
    index: String,
    doc_type: String,
    id: String,
    routing: String,
    refresh: Option<bool>,
    version: i64,
    version_type: String,
    source: Option<BulkLines>,
}

impl BulkDeleteRequest {
    /// Create an empty delete request.
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

    /// Set the id of the document to delete.
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

    /// The rendered lines, if a render has been cached since the last change.
    pub fn cached(&self) -> Option<&BulkLines> {
        self.source.as_ref()
    }

    fn render(&self) -> Result<BulkLines> {
        let meta = ActionMeta {
            id: &self.id,
            index: &self.index,
            routing: &self.routing,
            doc_type: &self.doc_type,
            version: self.version,
            version_type: &self.version_type,
            refresh: self.refresh,
            ..Default::default()
        };
        Ok(BulkLines::new(action_line("delete", &meta)?, None))
    }
}

impl BulkableRequest for BulkDeleteRequest {
    fn action(&self) -> &str {
        "delete"
    }

    fn source(&mut self) -> Result<&BulkLines> {
        let lines = match self.source.take() {
            Some(lines) => {
                trace!(op_type = "delete", "Using cached bulk lines");
                lines
            }
            None => {
                let lines = self.render().inspect_err(|err| {
                    warn!(op_type = "delete", id = %self.id, error = %err, "Failed to render bulk request");
                })?;
                debug!(
                    op_type = "delete",
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

impl fmt::Display for BulkDeleteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_lines(f, self.source.as_ref(), || self.render())
    }
}
