//! Batch-level defaults for bulk requests.

use crate::{
    delete::BulkDeleteRequest,
    error::ConfigError,
    index::BulkIndexRequest,
    update::BulkUpdateRequest,
};
use serde::Deserialize;
use std::{env, fs, path::Path, str::FromStr};
use tracing::debug;

/// Environment prefix read by [`RequestDefaults::from_env`].
pub const ENV_PREFIX: &str = "BULKWIRE";

/// Defaults applied to every request built from this configuration.
///
/// Requests fall back to the batch-level index and type when their own are
/// empty; these defaults pre-fill them so each rendered line is
/// self-contained.
///
/// # Example
///
/// ```rust
/// use bulkwire_core::{BulkableRequest, RequestDefaults};
/// use serde_json::json;
///
/// let defaults = RequestDefaults::new()
///     .with_index("tweets")
///     .with_refresh(true);
///
/// let mut request = defaults.index_request();
/// request.id("1").doc(json!({"user": "olivere"}));
///
/// assert_eq!(
///     request.source().unwrap().action(),
///     r#"{"index":{"_id":"1","_index":"tweets","refresh":true}}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestDefaults {
    /// Default index name.
    pub index: Option<String>,
    /// Default mapping type.
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    /// Default op type for index requests (`index` or `create`).
    pub op_type: Option<String>,
    /// Default routing key.
    pub routing: Option<String>,
    /// Default refresh flag.
    pub refresh: Option<bool>,
    /// Default version type.
    pub version_type: Option<String>,
    /// Default retry count for update requests.
    pub retry_on_conflict: Option<u32>,
}

impl RequestDefaults {
    /// Create empty defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse defaults from TOML.
    ///
    /// ```toml
    /// index = "tweets"
    /// type = "tweet"
    /// op_type = "create"
    /// refresh = false
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load defaults from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading bulk request defaults");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load defaults from `BULKWIRE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_prefix(ENV_PREFIX)
    }

    /// Load defaults from `<PREFIX>_INDEX`, `<PREFIX>_TYPE`,
    /// `<PREFIX>_OP_TYPE`, `<PREFIX>_ROUTING`, `<PREFIX>_REFRESH`,
    /// `<PREFIX>_VERSION_TYPE` and `<PREFIX>_RETRY_ON_CONFLICT`.
    ///
    /// Unset or empty variables are skipped. `REFRESH` accepts
    /// `true`/`false`/`1`/`0`.
    pub fn from_env_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let lookup = |name: &str| -> Option<(String, String)> {
            let key = format!("{}_{}", prefix, name);
            match env::var(&key) {
                Ok(value) if !value.trim().is_empty() => Some((key, value.trim().to_string())),
                _ => None,
            }
        };

        let refresh = match lookup("REFRESH") {
            Some((key, value)) => Some(parse_bool(&key, &value)?),
            None => None,
        };
        let retry_on_conflict = match lookup("RETRY_ON_CONFLICT") {
            Some((key, value)) => Some(parse_env::<u32>(&key, &value)?),
            None => None,
        };

        Ok(Self {
            index: lookup("INDEX").map(|(_, v)| v),
            doc_type: lookup("TYPE").map(|(_, v)| v),
            op_type: lookup("OP_TYPE").map(|(_, v)| v),
            routing: lookup("ROUTING").map(|(_, v)| v),
            refresh,
            version_type: lookup("VERSION_TYPE").map(|(_, v)| v),
            retry_on_conflict,
        })
    }

    /// Set the default index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Set the default mapping type.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set the default op type for index requests.
    pub fn with_op_type(mut self, op_type: impl Into<String>) -> Self {
        self.op_type = Some(op_type.into());
        self
    }

    /// Set the default routing key.
    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    /// Set the default refresh flag.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Set the default version type.
    pub fn with_version_type(mut self, version_type: impl Into<String>) -> Self {
        self.version_type = Some(version_type.into());
        self
    }

    /// Set the default retry count for updates.
    pub fn with_retry_on_conflict(mut self, retries: u32) -> Self {
        self.retry_on_conflict = Some(retries);
        self
    }

    /// Build an index request pre-filled with these defaults.
    pub fn index_request<T>(&self) -> BulkIndexRequest<T> {
        let mut request = BulkIndexRequest::new();
        if let Some(index) = &self.index {
            request.index(index.as_str());
        }
        if let Some(doc_type) = &self.doc_type {
            request.doc_type(doc_type.as_str());
        }
        if let Some(op_type) = &self.op_type {
            request.op_type(op_type.as_str());
        }
        if let Some(routing) = &self.routing {
            request.routing(routing.as_str());
        }
        if let Some(refresh) = self.refresh {
            request.refresh(refresh);
        }
        if let Some(version_type) = &self.version_type {
            request.version_type(version_type.as_str());
        }
        request
    }

    /// Build a delete request pre-filled with these defaults.
    pub fn delete_request(&self) -> BulkDeleteRequest {
        let mut request = BulkDeleteRequest::new();
        if let Some(index) = &self.index {
            request.index(index.as_str());
        }
        if let Some(doc_type) = &self.doc_type {
            request.doc_type(doc_type.as_str());
        }
        if let Some(routing) = &self.routing {
            request.routing(routing.as_str());
        }
        if let Some(refresh) = self.refresh {
            request.refresh(refresh);
        }
        if let Some(version_type) = &self.version_type {
            request.version_type(version_type.as_str());
        }
        request
    }

    /// Build an update request pre-filled with these defaults.
    pub fn update_request<T>(&self) -> BulkUpdateRequest<T> {
        let mut request = BulkUpdateRequest::new();
        if let Some(index) = &self.index {
            request.index(index.as_str());
        }
        if let Some(doc_type) = &self.doc_type {
            request.doc_type(doc_type.as_str());
        }
        if let Some(routing) = &self.routing {
            request.routing(routing.as_str());
        }
        if let Some(refresh) = self.refresh {
            request.refresh(refresh);
        }
        if let Some(version_type) = &self.version_type {
            request.version_type(version_type.as_str());
        }
        if let Some(retries) = self.retry_on_conflict {
            request.retry_on_conflict(retries);
        }
        request
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    }
}
