//! Collection rendering
//!
//! A collection schema's primary entity is a list. Its members procedure
//! either yields items, each rendered as a child, or another collection
//! serializer that renders in place of the iteration.
//!
//! Include scoping differs by depth: at the root, members see the subtree
//! under the collection's own name (`{ducks: {food: true}}` gives each duck
//! `{food: true}`); below the root the whole tree is forwarded and members
//! interpret the keys themselves.

use crate::context::Context;
use crate::node::{Members, Node};
use crate::relationships::render_child;
use crate::serializer::{Serializer, Subject};
use halite_core::{IncludeTree, RenderResult};
use serde_json::{Map, Value};

pub(crate) fn render<T: Subject>(
	serializer: &Serializer<T>,
	collection: &str,
	context: &Context<'_>,
) -> RenderResult<Value> {
	let schema = serializer.schema();
	let field = schema.collection_field()?;
	let body = schema.pipeline().render(serializer, context)?;

	let scoped = scoped_include(context, field.name());
	let items = match field.members(serializer, context) {
		Members::Nested(nested) => {
			let node = Node::Serializer(nested);
			render_child(&node, context, &scoped)?.unwrap_or(Value::Null)
		}
		Members::Items(nodes) => Value::Array(render_items(&nodes, context, &scoped)?),
	};

	let root = context.include_root();
	match root.root_name(collection) {
		Some(key) => {
			let mut wrapped = Map::new();
			wrapped.insert(key.to_string(), items);
			for (name, value) in body {
				wrapped.entry(name).or_insert(value);
			}
			Ok(Value::Object(wrapped))
		}
		None => Ok(items),
	}
}

fn scoped_include(context: &Context<'_>, name: &str) -> IncludeTree {
	if context.depth() == 0 {
		context.include_options().subtree(name)
	} else {
		context.include_options().clone()
	}
}

fn render_items(
	nodes: &[Node],
	context: &Context<'_>,
	include: &IncludeTree,
) -> RenderResult<Vec<Value>> {
	let mut rendered = Vec::with_capacity(nodes.len());

	for node in nodes {
		match node.as_render() {
			Some(item) if item.is_collection() => {
				tracing::debug!("skipping collection serializer nested as a collection item");
			}
			Some(_) => {
				if let Some(value) = render_child(node, context, include)? {
					rendered.push(value);
				}
			}
			None => {
				tracing::debug!(?node, "skipping non-serializer collection item");
			}
		}
	}

	Ok(rendered)
}
