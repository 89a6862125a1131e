//! Serializers
//!
//! A [`Serializer`] binds a [`Schema`] to one subject (a resource or a list)
//! and the options bag supplied at construction. The [`Render`] trait is its
//! object-safe face, used wherever serializers of different subject types
//! meet, such as relationship and collection members.

use crate::collection;
use crate::context::Context;
use crate::resource;
use crate::schema::{Schema, SchemaKind};
use halite_core::{Options, RenderResult};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A value a serializer can be bound to.
///
/// Every serializable type is a subject. Its accessors are the top-level
/// fields of its JSON form, which `read` looks up for attribute defaults
/// and method references.
pub trait Subject: Send + Sync + 'static {
	/// The subject's JSON form, or `null` if it cannot be serialized
	fn snapshot(&self) -> Value;

	fn read(&self, name: &str) -> Option<Value> {
		match self.snapshot() {
			Value::Object(mut fields) => fields.remove(name),
			_ => None,
		}
	}
}

impl<T> Subject for T
where
	T: Serialize + Send + Sync + 'static,
{
	fn snapshot(&self) -> Value {
		serde_json::to_value(self).unwrap_or_else(|err| {
			tracing::debug!(error = %err, "subject has no JSON form, accessors read as missing");
			Value::Null
		})
	}
}

/// The serializer capability: anything that can run the render pipeline
pub trait Render: Send + Sync {
	/// Check if this serializer's primary entity is a collection
	fn is_collection(&self) -> bool;

	/// Options supplied at construction
	fn options(&self) -> &Options;

	/// Render against an existing context
	fn render_with(&self, context: &Context<'_>) -> RenderResult<Value>;

	/// Render from a fresh root context built from the construction options
	fn render(&self) -> RenderResult<Value> {
		let context = Context::root(self.options().clone());
		self.render_with(&context)
	}

	fn render_to_json(&self) -> RenderResult<String> {
		Ok(serde_json::to_string(&self.render()?)?)
	}

	fn render_to_json_pretty(&self) -> RenderResult<String> {
		Ok(serde_json::to_string_pretty(&self.render()?)?)
	}
}

/// A schema bound to a subject and an options bag.
///
/// # Examples
///
/// ```
/// use halite_core::Options;
/// use halite_serializers::{FieldOptions, Schema};
/// use serde_json::json;
///
/// #[derive(serde::Serialize)]
/// struct Duck {
///     name: String,
/// }
///
/// let schema = Schema::<Duck>::builder()
///     .resource("duck")
///     .attribute("name", FieldOptions::new())
///     .build()
///     .unwrap();
///
/// let serializer = schema.serializer(Duck { name: "Ferdi".into() }, Options::new());
/// assert_eq!(serializer.render().unwrap(), json!({"duck": {"name": "Ferdi"}}));
/// ```
pub struct Serializer<T> {
	schema: Arc<Schema<T>>,
	subject: T,
	options: Options,
	// subject's JSON form, serialized on the first accessor lookup
	snapshot: OnceCell<Value>,
}

impl<T: Subject> Serializer<T> {
	pub fn new(schema: Arc<Schema<T>>, subject: T, options: Options) -> Self {
		Self {
			schema,
			subject,
			options,
			snapshot: OnceCell::new(),
		}
	}

	pub fn schema(&self) -> &Arc<Schema<T>> {
		&self.schema
	}

	pub fn subject(&self) -> &T {
		&self.subject
	}

	/// The bound resource, when the schema declares one
	pub fn resource(&self) -> Option<&T> {
		self.schema.resource_name().map(|_| &self.subject)
	}

	/// The bound list, when the schema declares a collection
	pub fn collection(&self) -> Option<&T> {
		self.schema.collection_name().map(|_| &self.subject)
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn is_collection(&self) -> bool {
		self.schema.is_collection()
	}

	/// Read a same-named accessor off the subject
	///
	/// The subject is serialized once per serializer; later lookups read
	/// from that snapshot.
	pub fn read(&self, name: &str) -> Option<Value> {
		self.snapshot
			.get_or_init(|| self.subject.snapshot())
			.get(name)
			.cloned()
	}

	/// Invoke a zero-argument method by name.
	///
	/// Lookup order is schema helpers, then installed extensions, then the
	/// subject's accessors. Unresolved names evaluate to `null`.
	pub fn call_method(&self, name: &str, context: &Context<'_>) -> Value {
		if let Some(helper) = self.schema.helper(name) {
			return helper(self, context);
		}

		for extension in self.schema.extensions() {
			if let Some(value) = extension.call(name, context) {
				return value;
			}
		}

		if let Some(value) = self.read(name) {
			return value;
		}

		tracing::debug!(
			method = name,
			schema = self.schema.name(),
			"unresolved method reference, evaluating to null"
		);
		Value::Null
	}

	pub fn render(&self) -> RenderResult<Value> {
		Render::render(self)
	}

	pub fn render_to_json(&self) -> RenderResult<String> {
		Render::render_to_json(self)
	}

	pub fn render_to_json_pretty(&self) -> RenderResult<String> {
		Render::render_to_json_pretty(self)
	}
}

impl<T: Subject> Render for Serializer<T> {
	fn is_collection(&self) -> bool {
		self.schema.is_collection()
	}

	fn options(&self) -> &Options {
		&self.options
	}

	fn render_with(&self, context: &Context<'_>) -> RenderResult<Value> {
		match self.schema.kind() {
			SchemaKind::Plain => {
				let body = self.schema.pipeline().render(self, context)?;
				Ok(Value::Object(body))
			}
			SchemaKind::Resource(name) => resource::render(self, name, context),
			SchemaKind::Collection(name) => collection::render(self, name, context),
		}
	}
}

impl<T: Subject> fmt::Debug for Serializer<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Serializer")
			.field("schema", &self.schema.name())
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}
