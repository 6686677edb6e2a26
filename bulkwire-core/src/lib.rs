//! Bulk API request builders for Elasticsearch and OpenSearch.
//!
//! This crate renders single bulk operations into the newline-delimited
//! format the `_bulk` endpoint expects:
//! - Index and create requests with an action line and a document line
//! - Delete requests with a single action line
//! - Update requests with partial documents, scripts and upserts
//! - Cached rendering that is invalidated by every setter
//! - Batch-level defaults loaded from TOML or the environment
//!
//! Sending the payload, batching policy and response handling are left to
//! the caller.
//!
//! # Example
//!
//! ```rust
//! use bulkwire_core::{BulkBody, BulkIndexRequest, BulkableRequest};
//! use serde::Serialize;
//!
//! #[derive(Debug, Serialize)]
//! struct Tweet {
//!     user: String,
//!     message: String,
//! }
//!
//! let mut request = BulkIndexRequest::new();
//! request.index("twitter").id("1").doc(Tweet {
//!     user: "olivere".to_string(),
//!     message: "Welcome to Golang and Elasticsearch.".to_string(),
//! });
//!
//! let lines = request.source().unwrap();
//! assert_eq!(lines.action(), r#"{"index":{"_id":"1","_index":"twitter"}}"#);
//!
//! let mut body = BulkBody::new();
//! body.add(&mut request).unwrap();
//! assert_eq!(body.number_of_actions(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod delete;
mod document;
mod error;
mod index;
mod payload;
mod request;
mod script;
mod update;

pub use config::{RequestDefaults, ENV_PREFIX};
pub use delete::BulkDeleteRequest;
pub use document::DocumentBody;
pub use error::{BulkError, ConfigError, Result};
pub use index::{BulkIndexRequest, DEFAULT_OP_TYPE};
pub use payload::BulkBody;
pub use request::{BulkLines, BulkableRequest};
pub use script::Script;
pub use update::BulkUpdateRequest;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        BulkBody, BulkDeleteRequest, BulkError, BulkIndexRequest, BulkLines, BulkUpdateRequest,
        BulkableRequest, DocumentBody, RequestDefaults, Result, Script,
    };
}
