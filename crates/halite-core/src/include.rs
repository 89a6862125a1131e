//! Include trees
//!
//! An include tree describes which relationship paths a caller wants expanded,
//! and how deep. Callers may express it as a nested map, a dotted
//! comma-separated string, an array mixing both, or `null`. Every form
//! normalizes to the same canonical nested map.

use crate::value::{deep_merge, is_off_marker};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Canonical include specification.
///
/// Top-level keys are relationship names. Values are either nested maps
/// (requests for deeper relationships) or leaf flags such as `true`, `1`,
/// `"0"` or `{}`.
///
/// # Examples
///
/// ```
/// use halite_core::IncludeTree;
/// use serde_json::json;
///
/// let from_string = IncludeTree::parse(&json!("a.b,a.c"));
/// let from_array = IncludeTree::parse(&json!(["a.b", "a.c"]));
/// let from_map = IncludeTree::parse(&json!({"a": {"b": {}, "c": {}}}));
///
/// assert_eq!(from_string, from_map);
/// assert_eq!(from_array, from_map);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeTree(Map<String, Value>);

impl IncludeTree {
	/// Create an empty include tree
	pub fn new() -> Self {
		Self::default()
	}

	/// Normalize any accepted input form into a canonical tree.
	///
	/// - maps are taken as-is (values are not re-parsed)
	/// - strings are split on `,`, then each token on its first `.`
	/// - arrays are parsed element-wise and deep-merged left to right
	/// - `null` yields an empty tree
	pub fn parse(input: &Value) -> Self {
		match input {
			Value::Object(map) => Self(map.clone()),
			Value::String(text) => Self::parse_str(text),
			Value::Array(items) => items.iter().fold(Self::new(), |tree, item| {
				tree.merge(&Self::parse(item))
			}),
			Value::Null => Self::new(),
			other => {
				tracing::debug!(input = %other, "ignoring unsupported include input");
				Self::new()
			}
		}
	}

	fn parse_str(text: &str) -> Self {
		let mut tree = Map::new();

		for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
			let (head, rest) = match token.split_once('.') {
				Some((head, rest)) => (head, Some(rest)),
				None => (token, None),
			};

			let nested = match rest {
				Some(rest) => Self::parse_str(rest).into_map(),
				None => Map::new(),
			};

			let mut entry = Map::new();
			entry.insert(head.to_string(), Value::Object(nested));
			deep_merge(&mut tree, &entry);
		}

		Self(tree)
	}

	/// Deep-merge `other` on top of this tree, returning a new tree.
	///
	/// Overlapping maps merge recursively; any other overlap is won by
	/// `other`.
	pub fn merge(&self, other: &IncludeTree) -> IncludeTree {
		let mut merged = self.0.clone();
		deep_merge(&mut merged, &other.0);
		Self(merged)
	}

	/// Get the include value stored under a key
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Check if a key is explicitly present
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Check if a relationship has been requested.
	///
	/// A key must be present and its value must not be an "off" marker.
	///
	/// # Examples
	///
	/// ```
	/// use halite_core::IncludeTree;
	/// use serde_json::json;
	///
	/// let tree = IncludeTree::parse(&json!({"food": true, "friends": "0"}));
	/// assert!(tree.is_requested("food"));
	/// assert!(!tree.is_requested("friends"));
	/// assert!(!tree.is_requested("enemies"));
	/// ```
	pub fn is_requested(&self, key: &str) -> bool {
		self.0.get(key).is_some_and(|value| !is_off_marker(value))
	}

	/// Get the sub-tree stored under a key.
	///
	/// Leaf values (`true`, `1`, ...) become an empty tree, so `{report: 1}`
	/// scopes to `{}`.
	pub fn subtree(&self, key: &str) -> IncludeTree {
		match self.0.get(key) {
			Some(Value::Object(nested)) => Self(nested.clone()),
			_ => Self::new(),
		}
	}

	/// Iterate over the top-level keys in insertion order
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Borrow the underlying map
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}

	/// Convert into a JSON value suitable for an option bag
	pub fn to_value(&self) -> Value {
		Value::Object(self.0.clone())
	}
}

impl From<&Value> for IncludeTree {
	fn from(value: &Value) -> Self {
		Self::parse(value)
	}
}

impl From<Value> for IncludeTree {
	fn from(value: Value) -> Self {
		Self::parse(&value)
	}
}

impl From<&str> for IncludeTree {
	fn from(text: &str) -> Self {
		Self::parse_str(text)
	}
}

impl From<IncludeTree> for Value {
	fn from(tree: IncludeTree) -> Self {
		Value::Object(tree.0)
	}
}

impl Serialize for IncludeTree {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.0.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for IncludeTree {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Value::deserialize(deserializer)?;
		Ok(Self::parse(&raw))
	}
}
