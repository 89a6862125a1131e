//! Relationship recursion
//!
//! Relationships are nested serializers rendered only when the caller asks
//! for them through the include tree. This module holds the relationship
//! layer, the include key validation that guards it, and [`render_child`],
//! the single entry point for rendering any nested serializer.

use crate::context::Context;
use crate::field::Category;
use crate::node::{Embedded, Node};
use crate::pipeline::{Layer, RELATIONSHIPS_KEY, decorate};
use crate::serializer::{Serializer, Subject};
use halite_core::{IncludeTree, RenderError, RenderResult};
use serde_json::{Map, Value};

/// Render a nested candidate under a child context.
///
/// Returns `Ok(None)` when the candidate is not a serializer. Otherwise the
/// child's own include options are deep-merged with `overrides` (overrides
/// win on conflicting leaves) and the child renders under a context derived
/// from `context`.
pub fn render_child(
	candidate: &Node,
	context: &Context<'_>,
	overrides: &IncludeTree,
) -> RenderResult<Option<Value>> {
	let Some(child) = candidate.as_render() else {
		tracing::debug!(?candidate, "skipping non-serializer child");
		return Ok(None);
	};

	let include = child.options().include_tree().merge(overrides);
	let options = child.options().clone().include(include.to_value());
	let child_context = context.child(options);

	child.render_with(&child_context).map(Some)
}

/// Check every explicitly requested include key against the declared
/// relationships.
///
/// Collections below the root skip the check; they forward the include
/// tree to their members untouched. A root collection also accepts its own
/// collection name, which scopes the include tree for its members.
pub fn validate_include<T: Subject>(
	serializer: &Serializer<T>,
	context: &Context<'_>,
) -> RenderResult<()> {
	let schema = serializer.schema();
	let collection = schema.collection_name();

	if collection.is_some() && context.depth() > 0 {
		return Ok(());
	}

	let fields = schema.fields();
	for key in context.include_options().keys() {
		let declared =
			fields.relationship_names().any(|name| name == key) || collection == Some(key);
		if !declared {
			tracing::warn!(
				parameter = key,
				resource = schema.resource_name(),
				"rejecting undeclared include path"
			);
			return Err(RenderError::unknown_relationship(schema.resource_name(), key));
		}
	}

	Ok(())
}

/// Renders requested relationships under `_relationships`
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipsLayer;

impl<T: Subject> Layer<T> for RelationshipsLayer {
	fn name(&self) -> &'static str {
		"relationships"
	}

	fn apply(
		&self,
		serializer: &Serializer<T>,
		context: &Context<'_>,
		body: &mut Map<String, Value>,
	) -> RenderResult<()> {
		validate_include(serializer, context)?;

		let mut relationships = Map::new();
		for field in serializer
			.schema()
			.fields()
			.for_category(Category::Relationship)
		{
			if !field.is_enabled(serializer, context) {
				continue;
			}

			let overrides = context.include_options().subtree(field.name());
			let rendered = match field.embedded(serializer, context) {
				Embedded::None => None,
				Embedded::One(node) if node.is_falsy() => None,
				Embedded::One(node) => render_child(&node, context, &overrides)?,
				Embedded::Many(nodes) => {
					let mut items = Vec::with_capacity(nodes.len());
					for node in &nodes {
						if let Some(item) = render_child(node, context, &overrides)? {
							items.push(item);
						}
					}
					Some(Value::Array(items))
				}
			};

			if let Some(value) = rendered {
				relationships.insert(field.name().to_string(), value);
			}
		}

		decorate(body, RELATIONSHIPS_KEY, relationships);
		Ok(())
	}
}
