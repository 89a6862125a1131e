//! Evaluation sources
//!
//! Guards and procedures come in three shapes: a literal value, a callable
//! run against the serializer and its context, or a reference to a named
//! method on the serializer. [`Context::call_instance`](crate::Context::call_instance)
//! resolves all three.

use crate::context::Context;
use crate::node::{Embedded, Members};
use crate::serializer::Serializer;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Callable producing a plain value
pub type ValueFn<T> = Arc<dyn Fn(&Serializer<T>, &Context<'_>) -> Value + Send + Sync>;

/// Callable producing relationship candidates
pub type EmbedFn<T> = Arc<dyn Fn(&Serializer<T>, &Context<'_>) -> Embedded + Send + Sync>;

/// Callable producing the members of a primary collection
pub type MembersFn<T> = Arc<dyn Fn(&Serializer<T>, &Context<'_>) -> Members + Send + Sync>;

/// A guard or value source.
///
/// # Examples
///
/// ```
/// use halite_serializers::Source;
/// use serde_json::json;
///
/// let literal: Source<()> = Source::literal(true);
/// let method: Source<()> = Source::method("is_admin");
/// let callable: Source<()> = Source::callable(|_, ctx| json!(ctx.depth() == 0));
///
/// assert!(matches!(literal, Source::Literal(_)));
/// assert!(matches!(method, Source::Method(_)));
/// assert!(matches!(callable, Source::Callable(_)));
/// ```
pub enum Source<T> {
	/// Returned as-is
	Literal(Value),
	/// Run with the serializer as receiver and the context as argument
	Callable(ValueFn<T>),
	/// Invoked as a zero-argument method on the serializer
	Method(String),
}

impl<T> Source<T> {
	pub fn literal(value: impl Into<Value>) -> Self {
		Source::Literal(value.into())
	}

	pub fn callable<F>(procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Value + Send + Sync + 'static,
	{
		Source::Callable(Arc::new(procedure))
	}

	pub fn method(name: impl Into<String>) -> Self {
		Source::Method(name.into())
	}
}

impl<T> Clone for Source<T> {
	fn clone(&self) -> Self {
		match self {
			Source::Literal(value) => Source::Literal(value.clone()),
			Source::Callable(procedure) => Source::Callable(Arc::clone(procedure)),
			Source::Method(name) => Source::Method(name.clone()),
		}
	}
}

impl<T> fmt::Debug for Source<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Source::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Source::Callable(_) => f.write_str("Callable(..)"),
			Source::Method(name) => f.debug_tuple("Method").field(name).finish(),
		}
	}
}

impl<T> From<bool> for Source<T> {
	fn from(flag: bool) -> Self {
		Source::Literal(Value::Bool(flag))
	}
}

/// Identifiers name serializer methods, as with [`Source::method`]
impl<T> From<&str> for Source<T> {
	fn from(name: &str) -> Self {
		Source::Method(name.to_string())
	}
}

/// The computation attached to a field
pub enum Procedure<T> {
	/// Plain value (attributes, links, meta, permissions)
	Value(ValueFn<T>),
	/// Relationship candidates
	Embed(EmbedFn<T>),
	/// Primary collection members
	Members(MembersFn<T>),
}

impl<T> Procedure<T> {
	pub fn value<F>(procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Value + Send + Sync + 'static,
	{
		Procedure::Value(Arc::new(procedure))
	}

	pub fn embed<F>(procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Embedded + Send + Sync + 'static,
	{
		Procedure::Embed(Arc::new(procedure))
	}

	pub fn members<F>(procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Members + Send + Sync + 'static,
	{
		Procedure::Members(Arc::new(procedure))
	}

	/// Short label used in error messages
	pub fn kind(&self) -> &'static str {
		match self {
			Procedure::Value(_) => "value",
			Procedure::Embed(_) => "relationship",
			Procedure::Members(_) => "collection",
		}
	}
}

impl<T> Clone for Procedure<T> {
	fn clone(&self) -> Self {
		match self {
			Procedure::Value(procedure) => Procedure::Value(Arc::clone(procedure)),
			Procedure::Embed(procedure) => Procedure::Embed(Arc::clone(procedure)),
			Procedure::Members(procedure) => Procedure::Members(Arc::clone(procedure)),
		}
	}
}

impl<T> fmt::Debug for Procedure<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Procedure::{}(..)", self.kind())
	}
}
