//! Translation dictionary model.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{
    Map,
    Value,
};

use super::FetchError;
use crate::plural::PluralRules;

/// Separator between segments of a translation key.
pub const KEY_SEPARATOR: char = '.';

/// One locale's translations: a tree of messages addressed by dot-separated keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: BTreeMap<String, Node>,
}

/// A value in the dictionary tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Plain message
    Text(String),
    /// Message variants selected by a count
    Plural(PluralRules),
    /// Nested group of keys
    Tree(Dictionary),
    /// Any other JSON value (numbers, booleans, null, arrays). Never resolves to a message.
    Other(Value),
}

/// Kind of a leaf, as compared by the coverage analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LeafKind {
    Text,
    Plural,
    Other,
}

impl Node {
    fn from_value(value: Value) -> Self {
        if let Some(rules) = PluralRules::from_value(&value) {
            return Self::Plural(rules);
        }
        match value {
            Value::String(text) => Self::Text(text),
            Value::Object(map) => Self::Tree(Dictionary::from_map(map)),
            other => Self::Other(other),
        }
    }

    /// Leaf kind, or `None` for a nested group.
    #[must_use]
    pub const fn leaf_kind(&self) -> Option<LeafKind> {
        match self {
            Self::Text(_) => Some(LeafKind::Text),
            Self::Plural(_) => Some(LeafKind::Plural),
            Self::Other(_) => Some(LeafKind::Other),
            Self::Tree(_) => None,
        }
    }
}

/// Human-readable name of a JSON value's type.
#[must_use]
pub const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Dictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from a parsed JSON document.
    ///
    /// # Errors
    /// Returns [`FetchError::InvalidStructure`] unless the top level is an object.
    pub fn from_json(value: Value) -> Result<Self, FetchError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(FetchError::InvalidStructure(json_kind(&other))),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        Self { entries: map.into_iter().map(|(key, value)| (key, Node::from_value(value))).collect() }
    }

    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        self.entries.insert(key.into(), node);
    }

    /// Walks the tree by the dot-separated `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        let mut segments = key.split(KEY_SEPARATOR);
        let mut node = self.entries.get(segments.next()?)?;
        for segment in segments {
            match node {
                Node::Tree(children) => node = children.entries.get(segment)?,
                _ => return None,
            }
        }
        Some(node)
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Flattens the tree into full key paths of its leaves.
    ///
    /// A plural rule set is a single leaf; its categories are not expanded.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use i18n_runtime::input::translation::{Dictionary, LeafKind};
    ///
    /// let dictionary = Dictionary::from_json(json!({
    ///     "common": {
    ///         "hello": "Hello",
    ///         "items": { "one": "{count} item", "other": "{count} items" }
    ///     }
    /// }))
    /// .unwrap();
    ///
    /// let flattened = dictionary.flatten();
    /// assert_eq!(flattened.get("common.hello"), Some(&LeafKind::Text));
    /// assert_eq!(flattened.get("common.items"), Some(&LeafKind::Plural));
    /// assert_eq!(flattened.len(), 2);
    /// ```
    #[must_use]
    pub fn flatten(&self) -> BTreeMap<String, LeafKind> {
        let mut result = BTreeMap::new();
        self.flatten_into(None, &mut result);
        result
    }

    fn flatten_into(&self, prefix: Option<&str>, result: &mut BTreeMap<String, LeafKind>) {
        for (key, node) in &self.entries {
            let full_key =
                prefix.map_or_else(|| key.clone(), |p| format!("{p}{KEY_SEPARATOR}{key}"));
            match node {
                Node::Tree(children) => children.flatten_into(Some(&full_key), result),
                leaf => {
                    if let Some(kind) = leaf.leaf_kind() {
                        result.insert(full_key, kind);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn sample() -> Dictionary {
        Dictionary::from_json(json!({
            "common": {
                "hello": "Hello",
                "goodbye": "Goodbye"
            },
            "errors": {
                "notFound": "Not found",
                "network": {
                    "offline": "You are offline"
                }
            },
            "items": {
                "one": "{count} item",
                "other": "{count} items"
            },
            "limit": 42
        }))
        .unwrap()
    }

    #[rstest]
    #[case(json!([]), "array")]
    #[case(json!("text"), "string")]
    #[case(json!(3), "number")]
    #[case(json!(true), "boolean")]
    #[case(json!(null), "null")]
    fn test_from_json_rejects_non_objects(#[case] value: Value, #[case] kind: &str) {
        let result = Dictionary::from_json(value);

        assert!(matches!(result, Err(FetchError::InvalidStructure(k)) if k == kind));
    }

    #[rstest]
    fn test_from_json_accepts_empty_object() {
        let dictionary = Dictionary::from_json(json!({})).unwrap();

        assert_that!(dictionary.is_empty(), eq(true));
    }

    #[rstest]
    #[case("common.hello", Some("Hello"))]
    #[case("errors.network.offline", Some("You are offline"))]
    #[case("common.missing", None)]
    #[case("common.hello.deeper", None)]
    #[case("missing.hello", None)]
    #[case("", None)]
    fn test_get_text(#[case] key: &str, #[case] expected: Option<&str>) {
        let dictionary = sample();

        let text = match dictionary.get(key) {
            Some(Node::Text(text)) => Some(text.as_str()),
            _ => None,
        };
        assert_that!(text, eq(expected));
    }

    #[rstest]
    fn test_get_distinguishes_node_kinds() {
        let dictionary = sample();

        assert!(matches!(dictionary.get("items"), Some(Node::Plural(rules)) if rules.other == "{count} items"));
        assert!(matches!(dictionary.get("common"), Some(Node::Tree(_))));
        assert!(matches!(dictionary.get("limit"), Some(Node::Other(_))));
    }

    #[rstest]
    fn test_flatten_nested() {
        let flattened = sample().flatten();

        let keys: Vec<&str> = flattened.keys().map(String::as_str).collect();
        assert_that!(
            keys,
            elements_are![
                eq(&"common.goodbye"),
                eq(&"common.hello"),
                eq(&"errors.network.offline"),
                eq(&"errors.notFound"),
                eq(&"items"),
                eq(&"limit"),
            ]
        );
        assert_that!(flattened.get("items"), some(eq(&LeafKind::Plural)));
        assert_that!(flattened.get("limit"), some(eq(&LeafKind::Other)));
    }

    #[rstest]
    fn test_flatten_skips_empty_groups() {
        let dictionary = Dictionary::from_json(json!({"empty": {}, "a": {"b": {}}})).unwrap();

        assert_that!(dictionary.flatten().is_empty(), eq(true));
        assert_that!(dictionary.len(), eq(2));
    }

    #[rstest]
    fn test_insert_replaces_entry() {
        let mut dictionary = sample();
        dictionary.insert("limit", Node::Text("No limit".to_string()));

        assert!(matches!(dictionary.get("limit"), Some(Node::Text(text)) if text == "No limit"));
    }
}
