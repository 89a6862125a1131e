//! Schemas
//!
//! A [`Schema`] is the frozen description of one serializer type: its
//! categorized fields, its primary entity (resource or collection), the
//! named helpers and extensions method references resolve against, and the
//! layer pipeline that composes its output.
//!
//! Schemas are built once through [`SchemaBuilder`], shared behind an
//! [`Arc`], and never mutated afterwards.

use crate::context::Context;
use crate::extension::{Configuration, Extension};
use crate::field::{Category, Field, FieldOptions};
use crate::fields::FieldSet;
use crate::node::{Embedded, Members};
use crate::pipeline::Pipeline;
use crate::serializer::{Serializer, Subject};
use crate::source::{Procedure, ValueFn};
use halite_core::{DefinitionError, Options};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const DEFAULT_SCHEMA_NAME: &str = "Schema";

/// The primary entity a schema is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
	/// No primary entity; rendered output is never root-wrapped
	Plain,
	/// A single resource with the given type name
	Resource(String),
	/// A list under the given collection name
	Collection(String),
}

/// A frozen serializer description
pub struct Schema<T> {
	name: String,
	kind: SchemaKind,
	fields: FieldSet<T>,
	helpers: HashMap<String, ValueFn<T>>,
	extensions: Vec<Arc<dyn Extension>>,
	pipeline: Pipeline<T>,
}

impl<T: Subject> Schema<T> {
	pub fn builder() -> SchemaBuilder<T> {
		SchemaBuilder::new()
	}

	/// Schema name used in definition error messages
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> &SchemaKind {
		&self.kind
	}

	/// Declared resource type name
	pub fn resource_name(&self) -> Option<&str> {
		match &self.kind {
			SchemaKind::Resource(name) => Some(name),
			_ => None,
		}
	}

	/// Declared collection name
	pub fn collection_name(&self) -> Option<&str> {
		match &self.kind {
			SchemaKind::Collection(name) => Some(name),
			_ => None,
		}
	}

	pub fn is_collection(&self) -> bool {
		matches!(self.kind, SchemaKind::Collection(_))
	}

	pub fn fields(&self) -> &FieldSet<T> {
		&self.fields
	}

	pub fn pipeline(&self) -> &Pipeline<T> {
		&self.pipeline
	}

	pub fn extensions(&self) -> &[Arc<dyn Extension>] {
		&self.extensions
	}

	pub fn helper(&self, name: &str) -> Option<&ValueFn<T>> {
		self.helpers.get(name)
	}

	/// Get the collection field, failing if none was declared
	pub fn collection_field(&self) -> Result<&Field<T>, DefinitionError> {
		self.fields
			.collection_field()
			.ok_or_else(|| DefinitionError::missing_collection(&self.name))
	}

	/// Bind this schema to a subject and an options bag
	pub fn serializer(self: &Arc<Self>, subject: T, options: Options) -> Serializer<T> {
		Serializer::new(Arc::clone(self), subject, options)
	}
}

impl<T> fmt::Debug for Schema<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Schema")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("fields", &self.fields)
			.field("helpers", &self.helpers.keys().collect::<Vec<_>>())
			.field("extensions", &self.extensions.len())
			.finish()
	}
}

/// Builder for [`Schema`].
///
/// Every declaration is validated as it is added. The first definition
/// error is kept and returned from [`build`](SchemaBuilder::build); later
/// declarations are ignored once an error is recorded.
///
/// # Examples
///
/// ```
/// use halite_serializers::{FieldOptions, Schema};
/// use halite_core::DefinitionError;
///
/// let result = Schema::<()>::builder()
///     .named("DuckSerializer")
///     .collection("ducks", |_, _| Default::default())
///     .resource("duck")
///     .build();
///
/// assert_eq!(
///     result.unwrap_err(),
///     DefinitionError::resource_after_collection("DuckSerializer")
/// );
/// ```
pub struct SchemaBuilder<T> {
	name: String,
	kind: SchemaKind,
	fields: FieldSet<T>,
	helpers: HashMap<String, ValueFn<T>>,
	extensions: Vec<Arc<dyn Extension>>,
	pipeline: Option<Pipeline<T>>,
	error: Option<DefinitionError>,
}

impl<T: Subject> SchemaBuilder<T> {
	pub fn new() -> Self {
		Self {
			name: DEFAULT_SCHEMA_NAME.to_string(),
			kind: SchemaKind::Plain,
			fields: FieldSet::new(),
			helpers: HashMap::new(),
			extensions: Vec::new(),
			pipeline: None,
			error: None,
		}
	}

	/// Name the schema; the name appears in definition error messages
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Declare the primary entity as a single resource of the given type
	pub fn resource(mut self, name: impl Into<String>) -> Self {
		if self.error.is_some() {
			return self;
		}
		if self.kind_is_collection() {
			let err = DefinitionError::resource_after_collection(&self.name);
			return self.fail(err);
		}
		self.kind = SchemaKind::Resource(name.into());
		self
	}

	/// Declare the primary entity as a collection produced by `procedure`
	pub fn collection<F>(self, name: impl Into<String>, procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Members + Send + Sync + 'static,
	{
		self.collection_with(name, FieldOptions::new(), procedure)
	}

	pub fn collection_with<F>(
		self,
		name: impl Into<String>,
		options: FieldOptions<T>,
		procedure: F,
	) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Members + Send + Sync + 'static,
	{
		self.add_field(
			Category::Collection,
			name,
			options,
			Some(Procedure::members(procedure)),
		)
	}

	/// Declare a plain attribute.
	///
	/// Without a `value` option, resource schemas read the same-named field
	/// of the bound resource; other schemas resolve it as a method reference.
	pub fn attribute(self, name: impl Into<String>, options: FieldOptions<T>) -> Self {
		self.add_field(Category::Attribute, name, options, None)
	}

	pub fn attribute_with<F>(self, name: impl Into<String>, options: FieldOptions<T>, procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Value + Send + Sync + 'static,
	{
		self.add_field(
			Category::Attribute,
			name,
			options,
			Some(Procedure::value(procedure)),
		)
	}

	pub fn link(self, name: impl Into<String>, options: FieldOptions<T>) -> Self {
		self.add_field(Category::Link, name, options, None)
	}

	pub fn link_with<F>(self, name: impl Into<String>, options: FieldOptions<T>, procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Value + Send + Sync + 'static,
	{
		self.add_field(Category::Link, name, options, Some(Procedure::value(procedure)))
	}

	pub fn meta(self, name: impl Into<String>, options: FieldOptions<T>) -> Self {
		self.add_field(Category::Meta, name, options, None)
	}

	pub fn meta_with<F>(self, name: impl Into<String>, options: FieldOptions<T>, procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Value + Send + Sync + 'static,
	{
		self.add_field(Category::Meta, name, options, Some(Procedure::value(procedure)))
	}

	pub fn permission(self, name: impl Into<String>, options: FieldOptions<T>) -> Self {
		self.add_field(Category::Permission, name, options, None)
	}

	pub fn permission_with<F>(
		self,
		name: impl Into<String>,
		options: FieldOptions<T>,
		procedure: F,
	) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Value + Send + Sync + 'static,
	{
		self.add_field(
			Category::Permission,
			name,
			options,
			Some(Procedure::value(procedure)),
		)
	}

	/// Declare a relationship rendered only when requested via `include`
	pub fn relationship<F>(self, name: impl Into<String>, options: FieldOptions<T>, procedure: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Embedded + Send + Sync + 'static,
	{
		self.add_field(
			Category::Relationship,
			name,
			options,
			Some(Procedure::embed(procedure)),
		)
	}

	/// Register a field into its category.
	///
	/// Collection fields also declare the schema's primary entity.
	pub fn add_field(
		self,
		category: Category,
		name: impl Into<String>,
		options: FieldOptions<T>,
		procedure: Option<Procedure<T>>,
	) -> Self {
		self.field(Field::new(category, name, options, procedure))
	}

	pub fn field(mut self, field: Field<T>) -> Self {
		if self.error.is_some() {
			return self;
		}

		if field.category() == Category::Collection {
			let conflict = match &self.kind {
				SchemaKind::Resource(_) => Some(DefinitionError::collection_after_resource(&self.name)),
				SchemaKind::Collection(_) => Some(DefinitionError::duplicate_collection(&self.name)),
				SchemaKind::Plain => None,
			};
			if let Some(err) = conflict {
				return self.fail(err);
			}
		}

		let collection = (field.category() == Category::Collection).then(|| field.name().to_string());
		match self.fields.add(field) {
			Ok(_) => {
				if let Some(name) = collection {
					self.kind = SchemaKind::Collection(name);
				}
				self
			}
			Err(err) => self.fail(err),
		}
	}

	/// Register a named helper that method references resolve to first
	pub fn helper<F>(mut self, name: impl Into<String>, helper: F) -> Self
	where
		F: Fn(&Serializer<T>, &Context<'_>) -> Value + Send + Sync + 'static,
	{
		self.helpers.insert(name.into(), Arc::new(helper));
		self
	}

	pub fn extension(mut self, extension: impl Extension + 'static) -> Self {
		self.extensions.push(Arc::new(extension));
		self
	}

	/// Install every extension from a configuration, in order
	pub fn configure(mut self, configuration: &Configuration) -> Self {
		self.extensions
			.extend(configuration.extensions().iter().cloned());
		self
	}

	/// Replace the standard layer pipeline
	pub fn pipeline(mut self, pipeline: Pipeline<T>) -> Self {
		self.pipeline = Some(pipeline);
		self
	}

	pub fn build(self) -> Result<Arc<Schema<T>>, DefinitionError> {
		if let Some(err) = self.error {
			return Err(err);
		}

		Ok(Arc::new(Schema {
			name: self.name,
			kind: self.kind,
			fields: self.fields,
			helpers: self.helpers,
			extensions: self.extensions,
			pipeline: self.pipeline.unwrap_or_else(Pipeline::standard),
		}))
	}

	fn kind_is_collection(&self) -> bool {
		matches!(self.kind, SchemaKind::Collection(_))
	}

	fn fail(mut self, error: DefinitionError) -> Self {
		self.error.get_or_insert(error);
		self
	}
}

impl<T: Subject> Default for SchemaBuilder<T> {
	fn default() -> Self {
		Self::new()
	}
}
