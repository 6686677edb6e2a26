//! Scripts for bulk update requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An update script.
///
/// Serializes as `{"inline":..,"lang":..,"params":{..}}`, skipping the
/// optional parts that were never set.
///
/// ```rust
/// use bulkwire_core::Script;
///
/// let script = Script::new("ctx._source.counter += params.count")
///     .lang("painless")
///     .param("count", 4);
///
/// assert_eq!(
///     serde_json::to_string(&script).unwrap(),
///     r#"{"inline":"ctx._source.counter += params.count","lang":"painless","params":{"count":4}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "inline")]
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Map<String, Value>>,
}

impl Script {
    /// Create a script from its source text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            lang: None,
            params: None,
        }
    }

    /// Set the script language.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Add a named parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replace all parameters.
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    /// The script source text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_script_minimal() {
        let script = Script::new("ctx._source.n++");
        assert_eq!(
            serde_json::to_value(&script).unwrap(),
            json!({"inline": "ctx._source.n++"})
        );
    }

    #[test]
    fn test_script_params_accumulate() {
        let script = Script::new("s").param("a", 1).param("b", "two");
        assert_eq!(
            serde_json::to_value(&script).unwrap(),
            json!({"inline": "s", "params": {"a": 1, "b": "two"}})
        );
    }

    #[test]
    fn test_script_deserialize() {
        let script: Script = serde_json::from_str(r#"{"inline":"s","lang":"groovy"}"#).unwrap();
        assert_eq!(script, Script::new("s").lang("groovy"));
        assert_eq!(script.source(), "s");
    }
}
