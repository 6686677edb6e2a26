// Bulkwire - bulk request builders for Elasticsearch and OpenSearch
//
// This library renders index, create, update and delete operations into the
// NDJSON lines the `_bulk` endpoint consumes, and wires their tracing events
// into a configurable subscriber.

// Re-export core functionality
pub use bulkwire_core::*;

pub mod logging;

// Prelude for common imports
pub mod prelude {
    pub use crate::logging::{LogConfig, LogFormat, LogLevel};
    pub use crate::{
        BulkBody,
        BulkDeleteRequest,
        BulkError,
        BulkIndexRequest,
        BulkLines,
        BulkUpdateRequest,
        BulkableRequest,
        DocumentBody,
        RequestDefaults,
        Result,
        Script,
    };
}
