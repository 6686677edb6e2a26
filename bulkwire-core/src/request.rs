//! The shared request seam and the rendered-line representation.

use crate::error::Result;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fmt::{self, Write},
};

/// Rendered wire representation of one bulk request.
///
/// The action-and-metadata line is always present. The body line is
/// present for index, create and update requests and absent for delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkLines {
    action: String,
    body: Option<String>,
}

impl BulkLines {
    /// Create lines from an action line and an optional body line.
    pub fn new(action: impl Into<String>, body: Option<String>) -> Self {
        Self {
            action: action.into(),
            body,
        }
    }

    /// The action-and-metadata line.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The document body line, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Iterate over the present lines in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.action.as_str()).chain(self.body.as_deref())
    }

    /// Number of lines (1 or 2).
    pub fn len(&self) -> usize {
        1 + usize::from(self.body.is_some())
    }

    /// Always false; a request renders at least its action line.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Size of the lines on the wire, counting one newline per line.
    pub fn estimated_size_in_bytes(&self) -> usize {
        self.iter().map(|line| line.len() + 1).sum()
    }

    /// Append the lines to a payload buffer, newline-terminated.
    pub fn write_to(&self, buf: &mut String) {
        for line in self.iter() {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    /// Split into the owned action and body lines.
    pub fn into_parts(self) -> (String, Option<String>) {
        (self.action, self.body)
    }
}

impl fmt::Display for BulkLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action)?;
        if let Some(body) = &self.body {
            f.write_char('\n')?;
            f.write_str(body)?;
        }
        Ok(())
    }
}

/// A request that can be rendered into bulk wire lines.
///
/// Implementors cache the rendered lines and drop the cache whenever a
/// setter runs, so repeated calls to [`source`](Self::source) are cheap.
/// The trait is object safe; a batch may hold `Box<dyn BulkableRequest>`.
pub trait BulkableRequest: fmt::Display {
    /// The action verb rendered as the outer key of the action line.
    fn action(&self) -> &str;

    /// Render the request, or return the cached lines from a prior render.
    fn source(&mut self) -> Result<&BulkLines>;

    /// Bytes this request adds to a bulk payload.
    fn estimated_size_in_bytes(&mut self) -> Result<usize> {
        Ok(self.source()?.estimated_size_in_bytes())
    }
}

/// Format the debug view of a request: cached lines if present, otherwise
/// a fresh render that is not stored.
pub(crate) fn display_lines(
    f: &mut fmt::Formatter<'_>,
    cached: Option<&BulkLines>,
    render: impl FnOnce() -> Result<BulkLines>,
) -> fmt::Result {
    match cached {
        Some(lines) => fmt::Display::fmt(lines, f),
        None => match render() {
            Ok(lines) => fmt::Display::fmt(&lines, f),
            Err(err) => write!(f, "error: {}", err),
        },
    }
}

/// Metadata object of an action line.
///
/// Fields are declared in alphabetical key order; unset fields are skipped,
/// so the output matches a sorted-key serializer byte for byte.
#[derive(Debug, Default, Serialize)]
pub(crate) struct ActionMeta<'a> {
    #[serde(rename = "_id", skip_serializing_if = "is_empty")]
    pub id: &'a str,
    #[serde(rename = "_index", skip_serializing_if = "is_empty")]
    pub index: &'a str,
    #[serde(rename = "_parent", skip_serializing_if = "is_empty")]
    pub parent: &'a str,
    #[serde(rename = "_retry_on_conflict", skip_serializing_if = "Option::is_none")]
    pub retry_on_conflict: Option<u32>,
    #[serde(rename = "_routing", skip_serializing_if = "is_empty")]
    pub routing: &'a str,
    #[serde(rename = "_timestamp", skip_serializing_if = "is_empty")]
    pub timestamp: &'a str,
    #[serde(rename = "_ttl", skip_serializing_if = "is_unset")]
    pub ttl: i64,
    #[serde(rename = "_type", skip_serializing_if = "is_empty")]
    pub doc_type: &'a str,
    #[serde(rename = "_version", skip_serializing_if = "is_unset")]
    pub version: i64,
    #[serde(rename = "_version_type", skip_serializing_if = "is_empty")]
    pub version_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<bool>,
}

fn is_empty(value: &&str) -> bool {
    value.is_empty()
}

fn is_unset(value: &i64) -> bool {
    *value <= 0
}

/// Render `{"<op_type>":<meta>}`.
pub(crate) fn action_line(op_type: &str, meta: &ActionMeta<'_>) -> Result<String> {
    let line = BTreeMap::from([(op_type, meta)]);
    Ok(serde_json::to_string(&line)?)
}
