//! Child candidates produced by relationship and collection procedures.

use crate::serializer::{Render, Serializer, Subject};
use halite_core::is_truthy;
use serde_json::Value;
use std::fmt;

/// A single child candidate.
///
/// Only [`Node::Serializer`] renders; plain values are non-serializer leaves
/// and are skipped.
pub enum Node {
	Serializer(Box<dyn Render>),
	Value(Value),
}

impl Node {
	pub fn serializer(render: impl Render + 'static) -> Self {
		Node::Serializer(Box::new(render))
	}

	pub fn value(value: impl Into<Value>) -> Self {
		Node::Value(value.into())
	}

	/// Borrow the serializer capability, if this node has one
	pub fn as_render(&self) -> Option<&dyn Render> {
		match self {
			Node::Serializer(render) => Some(render.as_ref()),
			Node::Value(_) => None,
		}
	}

	/// Check if the node is `null`/`false`
	pub fn is_falsy(&self) -> bool {
		matches!(self, Node::Value(value) if !is_truthy(value))
	}
}

impl<T: Subject> From<Serializer<T>> for Node {
	fn from(serializer: Serializer<T>) -> Self {
		Node::Serializer(Box::new(serializer))
	}
}

impl From<Box<dyn Render>> for Node {
	fn from(render: Box<dyn Render>) -> Self {
		Node::Serializer(render)
	}
}

impl From<Value> for Node {
	fn from(value: Value) -> Self {
		Node::Value(value)
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Node::Serializer(render) => f
				.debug_struct("Serializer")
				.field("collection", &render.is_collection())
				.finish_non_exhaustive(),
			Node::Value(value) => f.debug_tuple("Value").field(value).finish(),
		}
	}
}

/// Result of a relationship procedure
#[derive(Debug, Default)]
pub enum Embedded {
	/// Nothing to render; the relationship is omitted
	#[default]
	None,
	/// A single child
	One(Node),
	/// A list of children; non-serializer entries are skipped
	Many(Vec<Node>),
}

impl Embedded {
	pub fn one(node: impl Into<Node>) -> Self {
		Embedded::One(node.into())
	}

	pub fn many<I, N>(nodes: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<Node>,
	{
		Embedded::Many(nodes.into_iter().map(Into::into).collect())
	}

	/// Check if the raw result should omit the relationship entirely
	pub fn is_falsy(&self) -> bool {
		match self {
			Embedded::None => true,
			Embedded::One(node) => node.is_falsy(),
			Embedded::Many(_) => false,
		}
	}
}

impl<N: Into<Node>> From<Option<N>> for Embedded {
	fn from(node: Option<N>) -> Self {
		match node {
			Some(node) => Embedded::One(node.into()),
			None => Embedded::None,
		}
	}
}

/// Result of a collection procedure
pub enum Members {
	/// Items to render one by one
	Items(Vec<Node>),
	/// Another collection serializer whose render replaces iteration
	Nested(Box<dyn Render>),
}

impl Members {
	pub fn items<I, N>(nodes: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<Node>,
	{
		Members::Items(nodes.into_iter().map(Into::into).collect())
	}

	pub fn nested(render: impl Render + 'static) -> Self {
		Members::Nested(Box::new(render))
	}
}

impl fmt::Debug for Members {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Members::Items(nodes) => f.debug_tuple("Items").field(nodes).finish(),
			Members::Nested(_) => f.write_str("Nested(..)"),
		}
	}
}

impl Default for Members {
	fn default() -> Self {
		Members::Items(Vec::new())
	}
}
