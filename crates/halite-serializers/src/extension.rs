//! Extensions
//!
//! Extensions supply named capabilities that method references resolve
//! against, such as URL path helpers from a host framework. They are
//! injected explicitly at schema-build time, either one at a time with
//! [`SchemaBuilder::extension`](crate::SchemaBuilder::extension) or as a
//! group through a [`Configuration`].
//!
//! ## Examples
//!
//! ```
//! use halite_core::Options;
//! use halite_serializers::{Configuration, FieldOptions, Helpers, Schema};
//! use serde_json::json;
//!
//! let configuration = Configuration::new().extension(
//!     Helpers::new("routes").helper("ducks_path", |_| json!("/ducks")),
//! );
//!
//! let schema = Schema::<()>::builder()
//!     .configure(&configuration)
//!     .link_with("self", FieldOptions::new(), |s, ctx| s.call_method("ducks_path", ctx))
//!     .build()
//!     .unwrap();
//!
//! let output = schema.serializer((), Options::new()).render().unwrap();
//! assert_eq!(output, json!({"_links": {"self": {"href": "/ducks"}}}));
//! ```

use crate::context::Context;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named capability method references can resolve to
pub trait Extension: Send + Sync {
	fn name(&self) -> &str;

	/// Answer a method reference, or `None` to let the next resolver try
	fn call(&self, method: &str, context: &Context<'_>) -> Option<Value>;
}

/// Helper callable receiving the render context
pub type HelperFn = Arc<dyn Fn(&Context<'_>) -> Value + Send + Sync>;

/// An extension built from named closures
#[derive(Clone)]
pub struct Helpers {
	name: String,
	helpers: HashMap<String, HelperFn>,
}

impl Helpers {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			helpers: HashMap::new(),
		}
	}

	pub fn helper<F>(mut self, method: impl Into<String>, helper: F) -> Self
	where
		F: Fn(&Context<'_>) -> Value + Send + Sync + 'static,
	{
		self.helpers.insert(method.into(), Arc::new(helper));
		self
	}

	pub fn contains(&self, method: &str) -> bool {
		self.helpers.contains_key(method)
	}
}

impl Extension for Helpers {
	fn name(&self) -> &str {
		&self.name
	}

	fn call(&self, method: &str, context: &Context<'_>) -> Option<Value> {
		self.helpers.get(method).map(|helper| helper(context))
	}
}

impl fmt::Debug for Helpers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut methods: Vec<&String> = self.helpers.keys().collect();
		methods.sort();
		f.debug_struct("Helpers")
			.field("name", &self.name)
			.field("methods", &methods)
			.finish()
	}
}

/// Extensions to install into every schema built with it
#[derive(Clone, Default)]
pub struct Configuration {
	extensions: Vec<Arc<dyn Extension>>,
}

impl Configuration {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add an extension, builder-style
	pub fn extension(mut self, extension: impl Extension + 'static) -> Self {
		self.push(extension);
		self
	}

	pub fn push(&mut self, extension: impl Extension + 'static) {
		self.extensions.push(Arc::new(extension));
	}

	pub fn extensions(&self) -> &[Arc<dyn Extension>] {
		&self.extensions
	}

	pub fn len(&self) -> usize {
		self.extensions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.extensions.is_empty()
	}
}

impl fmt::Debug for Configuration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(self.extensions.iter().map(|extension| extension.name()))
			.finish()
	}
}
