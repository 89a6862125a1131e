//! Layer pipeline
//!
//! A serializer's output object is composed by an ordered list of layers.
//! Each layer receives the body built so far and may contribute to it,
//! usually by inserting one reserved key. The order is plain data: it can be
//! inspected with [`Pipeline::layer_names`] and replaced per schema.
//!
//! The standard pipeline is:
//!
//! | Layer           | Contributes         | Gate                          |
//! |-----------------|---------------------|-------------------------------|
//! | `attributes`    | fields by name      | none                          |
//! | `links`         | `_links`            | `include_links` (default on)  |
//! | `meta`          | `_meta`             | `include_meta` (default on)   |
//! | `permissions`   | `_permissions`      | `include_permissions` (on)    |
//! | `relationships` | `_relationships`    | include tree                  |

use crate::context::Context;
use crate::field::Category;
use crate::relationships::RelationshipsLayer;
use crate::serializer::{Serializer, Subject};
use halite_core::RenderResult;
use halite_core::options::{INCLUDE_LINKS, INCLUDE_META, INCLUDE_PERMISSIONS};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

pub const LINKS_KEY: &str = "_links";
pub const META_KEY: &str = "_meta";
pub const PERMISSIONS_KEY: &str = "_permissions";
pub const RELATIONSHIPS_KEY: &str = "_relationships";

/// One step of the render composition
pub trait Layer<T>: Send + Sync {
	/// Name reported by [`Pipeline::layer_names`]
	fn name(&self) -> &'static str;

	/// Contribute to the body built by the preceding layers
	fn apply(
		&self,
		serializer: &Serializer<T>,
		context: &Context<'_>,
		body: &mut Map<String, Value>,
	) -> RenderResult<()>;
}

/// Ordered list of layers applied to an initially empty body.
///
/// # Examples
///
/// ```
/// use halite_serializers::Pipeline;
/// use halite_serializers::pipeline::{AttributesLayer, LinksLayer};
///
/// let pipeline: Pipeline<()> = Pipeline::new()
///     .with_layer(AttributesLayer)
///     .with_layer(LinksLayer);
///
/// assert_eq!(pipeline.layer_names(), vec!["attributes", "links"]);
/// ```
pub struct Pipeline<T> {
	layers: Vec<Arc<dyn Layer<T>>>,
}

impl<T: Subject> Pipeline<T> {
	/// Create an empty pipeline
	pub fn new() -> Self {
		Self { layers: Vec::new() }
	}

	/// Attributes, links, meta, permissions, relationships
	pub fn standard() -> Self {
		Self::new()
			.with_layer(AttributesLayer)
			.with_layer(LinksLayer)
			.with_layer(MetaLayer)
			.with_layer(PermissionsLayer)
			.with_layer(RelationshipsLayer)
	}

	/// Append a layer
	pub fn with_layer(mut self, layer: impl Layer<T> + 'static) -> Self {
		self.layers.push(Arc::new(layer));
		self
	}

	pub fn layer_names(&self) -> Vec<&'static str> {
		self.layers.iter().map(|layer| layer.name()).collect()
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	/// Run every layer in order and return the composed body
	pub fn render(
		&self,
		serializer: &Serializer<T>,
		context: &Context<'_>,
	) -> RenderResult<Map<String, Value>> {
		let mut body = Map::new();
		for layer in &self.layers {
			layer.apply(serializer, context, &mut body)?;
		}
		Ok(body)
	}
}

impl<T: Subject> Default for Pipeline<T> {
	fn default() -> Self {
		Self::standard()
	}
}

impl<T> Clone for Pipeline<T> {
	fn clone(&self) -> Self {
		Self {
			layers: self.layers.clone(),
		}
	}
}

impl<T> fmt::Debug for Pipeline<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(self.layers.iter().map(|layer| layer.name()))
			.finish()
	}
}

/// Render every enabled field of a category into a map, in declaration order
pub(crate) fn render_category<T: Subject>(
	serializer: &Serializer<T>,
	context: &Context<'_>,
	category: Category,
) -> Map<String, Value> {
	let mut rendered = Map::new();
	for field in serializer.schema().fields().for_category(category) {
		if !field.is_enabled(serializer, context) {
			continue;
		}
		if let Some(value) = field.render_value(serializer, context) {
			rendered.insert(field.name().to_string(), value);
		}
	}
	rendered
}

/// Insert `section` under a reserved key unless it is empty
pub(crate) fn decorate(body: &mut Map<String, Value>, key: &str, section: Map<String, Value>) {
	if section.is_empty() {
		return;
	}
	tracing::trace!(key, entries = section.len(), "layer contributed section");
	body.insert(key.to_string(), Value::Object(section));
}

/// Merges enabled attributes into the body under their own names
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributesLayer;

impl<T: Subject> Layer<T> for AttributesLayer {
	fn name(&self) -> &'static str {
		"attributes"
	}

	fn apply(
		&self,
		serializer: &Serializer<T>,
		context: &Context<'_>,
		body: &mut Map<String, Value>,
	) -> RenderResult<()> {
		let attributes = render_category(serializer, context, Category::Attribute);
		tracing::trace!(entries = attributes.len(), "attributes layer contributed");
		body.extend(attributes);
		Ok(())
	}
}

/// Renders enabled links under `_links`
#[derive(Debug, Clone, Copy, Default)]
pub struct LinksLayer;

impl<T: Subject> Layer<T> for LinksLayer {
	fn name(&self) -> &'static str {
		"links"
	}

	fn apply(
		&self,
		serializer: &Serializer<T>,
		context: &Context<'_>,
		body: &mut Map<String, Value>,
	) -> RenderResult<()> {
		if context.flag(INCLUDE_LINKS, true) {
			let links = render_category(serializer, context, Category::Link);
			decorate(body, LINKS_KEY, links);
		}
		Ok(())
	}
}

/// Renders enabled meta fields under `_meta`
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaLayer;

impl<T: Subject> Layer<T> for MetaLayer {
	fn name(&self) -> &'static str {
		"meta"
	}

	fn apply(
		&self,
		serializer: &Serializer<T>,
		context: &Context<'_>,
		body: &mut Map<String, Value>,
	) -> RenderResult<()> {
		if context.flag(INCLUDE_META, true) {
			let meta = render_category(serializer, context, Category::Meta);
			decorate(body, META_KEY, meta);
		}
		Ok(())
	}
}

/// Renders enabled permissions under `_permissions`; values are booleans
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionsLayer;

impl<T: Subject> Layer<T> for PermissionsLayer {
	fn name(&self) -> &'static str {
		"permissions"
	}

	fn apply(
		&self,
		serializer: &Serializer<T>,
		context: &Context<'_>,
		body: &mut Map<String, Value>,
	) -> RenderResult<()> {
		if context.flag(INCLUDE_PERMISSIONS, true) {
			let permissions = render_category(serializer, context, Category::Permission);
			decorate(body, PERMISSIONS_KEY, permissions);
		}
		Ok(())
	}
}
