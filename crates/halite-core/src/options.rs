//! Render option bags
//!
//! [`Options`] is the bag of knobs a caller hands to a serializer. Keys are
//! normalized to snake_case once, at construction, and the bag is treated as
//! immutable by the rendering engine.

use crate::exception::OptionsError;
use crate::include::IncludeTree;
use crate::value::{is_truthy, normalize_key};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Include specification for relationships (any accepted form)
pub const INCLUDE: &str = "include";
/// Root wrapping switch or explicit root name
pub const INCLUDE_ROOT: &str = "include_root";
/// Toggle for the `_links` layer (default on)
pub const INCLUDE_LINKS: &str = "include_links";
/// Toggle for the `_meta` layer (default on)
pub const INCLUDE_META: &str = "include_meta";
/// Toggle for the `_permissions` layer (default on)
pub const INCLUDE_PERMISSIONS: &str = "include_permissions";
/// Keys that child contexts inherit from their parent
pub const FORWARD: &str = "forward";
/// Reserved: parents are linked by the engine, never through options
pub const PARENT: &str = "parent";

/// Root wrapping setting resolved from the `include_root` option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeRoot {
	/// Return the rendered body unwrapped
	Disabled,
	/// Wrap under the schema's declared resource or collection name
	Enabled,
	/// Wrap under an explicit name
	Named(String),
}

impl IncludeRoot {
	/// Interpret a raw option value.
	///
	/// Strings name the root; any other truthy value enables the default
	/// name; `null` and `false` disable wrapping.
	pub fn from_value(value: &Value) -> Self {
		match value {
			Value::String(name) => IncludeRoot::Named(name.clone()),
			other if is_truthy(other) => IncludeRoot::Enabled,
			_ => IncludeRoot::Disabled,
		}
	}

	/// Resolve the root key, falling back to `default`.
	///
	/// Returns `None` when wrapping is disabled.
	pub fn root_name<'a>(&'a self, default: &'a str) -> Option<&'a str> {
		match self {
			IncludeRoot::Disabled => None,
			IncludeRoot::Enabled => Some(default),
			IncludeRoot::Named(name) => Some(name),
		}
	}

	pub fn to_value(&self) -> Value {
		match self {
			IncludeRoot::Disabled => Value::Bool(false),
			IncludeRoot::Enabled => Value::Bool(true),
			IncludeRoot::Named(name) => Value::String(name.clone()),
		}
	}
}

impl From<bool> for IncludeRoot {
	fn from(enabled: bool) -> Self {
		if enabled {
			IncludeRoot::Enabled
		} else {
			IncludeRoot::Disabled
		}
	}
}

impl From<&str> for IncludeRoot {
	fn from(name: &str) -> Self {
		IncludeRoot::Named(name.to_string())
	}
}

impl From<String> for IncludeRoot {
	fn from(name: String) -> Self {
		IncludeRoot::Named(name)
	}
}

/// Key-normalized render options.
///
/// # Examples
///
/// ```
/// use halite_core::{IncludeRoot, Options};
/// use serde_json::json;
///
/// let options = Options::new()
///     .include("food.ingredients")
///     .include_root("mallard")
///     .include_links(false);
///
/// assert_eq!(options.fetch("include_root"), Some(&json!("mallard")));
/// assert!(!options.flag("includeLinks", true));
/// assert!(options.include_tree().contains_key("food"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
	/// Create an empty option bag
	pub fn new() -> Self {
		Self::default()
	}

	/// Build an option bag from a raw map, normalizing every key.
	///
	/// The reserved `parent` key is dropped.
	pub fn from_map(map: Map<String, Value>) -> Self {
		let mut options = Self::new();
		for (key, value) in map {
			options.insert(&key, value);
		}
		options
	}

	/// Parse options from a JSON document
	pub fn from_json_str(source: &str) -> Result<Self, OptionsError> {
		let raw: Value = serde_json::from_str(source)?;
		Self::try_from(raw)
	}

	/// Parse options from a TOML document
	///
	/// # Examples
	///
	/// ```
	/// use halite_core::Options;
	///
	/// let options = Options::from_toml_str(r#"
	/// include = "food.ingredients"
	/// include-links = false
	/// "#).unwrap();
	///
	/// assert!(!options.flag("include_links", true));
	/// ```
	#[cfg(feature = "toml")]
	pub fn from_toml_str(source: &str) -> Result<Self, OptionsError> {
		let raw: Value = toml::from_str(source)?;
		Self::try_from(raw)
	}

	/// Insert a value under a normalized key
	pub fn insert(&mut self, key: &str, value: Value) {
		let key = normalize_key(key);
		if key == PARENT {
			tracing::debug!("dropping reserved `parent` option");
			return;
		}
		self.0.insert(key, value);
	}

	/// Set a value under a normalized key, builder-style
	pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.insert(key, value.into());
		self
	}

	/// Set the include specification (any accepted form)
	pub fn include(self, include: impl Into<Value>) -> Self {
		self.set(INCLUDE, include)
	}

	/// Set the root wrapping behaviour
	pub fn include_root(self, root: impl Into<IncludeRoot>) -> Self {
		let root = root.into();
		self.set(INCLUDE_ROOT, root.to_value())
	}

	pub fn include_links(self, enabled: bool) -> Self {
		self.set(INCLUDE_LINKS, enabled)
	}

	pub fn include_meta(self, enabled: bool) -> Self {
		self.set(INCLUDE_META, enabled)
	}

	pub fn include_permissions(self, enabled: bool) -> Self {
		self.set(INCLUDE_PERMISSIONS, enabled)
	}

	/// Declare option keys that child contexts inherit from this one
	pub fn forward<I, S>(self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let keys: Vec<Value> = keys
			.into_iter()
			.map(|key| Value::String(normalize_key(key.as_ref())))
			.collect();
		self.set(FORWARD, Value::Array(keys))
	}

	/// Get a value by (normalized) key
	pub fn fetch(&self, key: &str) -> Option<&Value> {
		self.0.get(&normalize_key(key))
	}

	/// Get a value by key, falling back to `default`
	pub fn fetch_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
		self.fetch(key).unwrap_or(default)
	}

	/// Read a boolean knob: present values are judged by truthiness, absent
	/// ones fall back to `default`
	pub fn flag(&self, key: &str, default: bool) -> bool {
		self.fetch(key).map(is_truthy).unwrap_or(default)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(&normalize_key(key))
	}

	/// Parse the `include` option into a canonical tree
	pub fn include_tree(&self) -> IncludeTree {
		self.fetch(INCLUDE)
			.map(IncludeTree::parse)
			.unwrap_or_default()
	}

	/// Get the explicit root setting, if any
	pub fn root_setting(&self) -> Option<IncludeRoot> {
		self.fetch(INCLUDE_ROOT).map(IncludeRoot::from_value)
	}

	/// Get the keys listed in the `forward` option.
	///
	/// Accepts an array of strings or a comma-separated string.
	pub fn forwarded_keys(&self) -> Vec<String> {
		match self.fetch(FORWARD) {
			Some(Value::Array(items)) => items
				.iter()
				.filter_map(Value::as_str)
				.map(normalize_key)
				.collect(),
			Some(Value::String(list)) => list
				.split(',')
				.map(str::trim)
				.filter(|key| !key.is_empty())
				.map(normalize_key)
				.collect(),
			_ => Vec::new(),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}
}

impl TryFrom<Value> for Options {
	type Error = OptionsError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Object(map) => Ok(Self::from_map(map)),
			Value::Null => Ok(Self::new()),
			Value::Bool(_) => Err(OptionsError::NotAMap("a boolean")),
			Value::Number(_) => Err(OptionsError::NotAMap("a number")),
			Value::String(_) => Err(OptionsError::NotAMap("a string")),
			Value::Array(_) => Err(OptionsError::NotAMap("an array")),
		}
	}
}

impl From<Map<String, Value>> for Options {
	fn from(map: Map<String, Value>) -> Self {
		Self::from_map(map)
	}
}

impl<'de> Deserialize<'de> for Options {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let map = Map::deserialize(deserializer)?;
		Ok(Self::from_map(map))
	}
}
