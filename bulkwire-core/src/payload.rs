//! Concatenation of rendered requests into a bulk payload.

use crate::{error::Result, request::BulkableRequest};
use bytes::Bytes;
use tracing::debug;

/// An NDJSON bulk payload assembled from rendered requests.
///
/// Each request contributes its lines, each terminated by a newline, in
/// the order added. Deciding when to send the payload is left to the caller.
///
/// ```rust
/// use bulkwire_core::{BulkBody, BulkDeleteRequest, BulkIndexRequest};
/// use serde_json::json;
///
/// let mut index: BulkIndexRequest = BulkIndexRequest::new();
/// index.index("test").id("1").doc(json!({"a": 1}));
/// let mut delete = BulkDeleteRequest::new();
/// delete.index("test").id("2");
///
/// let mut body = BulkBody::new();
/// body.add(&mut index).unwrap();
/// body.add(&mut delete).unwrap();
///
/// assert_eq!(body.number_of_actions(), 2);
/// assert_eq!(
///     body.as_str(),
///     "{\"index\":{\"_id\":\"1\",\"_index\":\"test\"}}\n{\"a\":1}\n{\"delete\":{\"_id\":\"2\",\"_index\":\"test\"}}\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct BulkBody {
    buf: String,
    actions: usize,
}

impl BulkBody {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty payload with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            actions: 0,
        }
    }

    /// Render a request and append its lines.
    ///
    /// On error nothing is appended and the payload is unchanged.
    pub fn add<R>(&mut self, request: &mut R) -> Result<()>
    where
        R: BulkableRequest + ?Sized,
    {
        let lines = request.source()?;
        lines.write_to(&mut self.buf);
        self.actions += 1;
        Ok(())
    }

    /// Render and append every request, stopping at the first error.
    ///
    /// Requests appended before the failing one stay in the payload.
    pub fn extend<'a, I>(&mut self, requests: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a mut dyn BulkableRequest>,
    {
        for request in requests {
            self.add(request)?;
        }
        debug!(
            actions = self.actions,
            bytes = self.buf.len(),
            "Assembled bulk payload"
        );
        Ok(())
    }

    /// Number of requests added.
    pub fn number_of_actions(&self) -> usize {
        self.actions
    }

    /// Size of the payload in bytes.
    pub fn estimated_size_in_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Check if no request has been added.
    pub fn is_empty(&self) -> bool {
        self.actions == 0
    }

    /// The payload text.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consume the payload into bytes for the transport.
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buf)
    }

    /// Remove all requests, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.actions = 0;
    }
}
