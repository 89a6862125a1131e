//! Fields
//!
//! A [`Field`] is a single named, guarded, value-producing declaration. Its
//! [`Category`] decides which render layer picks it up and which extra rules
//! apply:
//!
//! - links wrap their value as `{href, ...attrs}` and drop `null`
//! - permissions always render as booleans
//! - relationships render only when requested through the include tree
//! - collections must carry a members procedure

use crate::context::Context;
use crate::node::{Embedded, Members};
use crate::serializer::{Serializer, Subject};
use crate::source::{Procedure, Source};
use halite_core::{DefinitionError, is_truthy};
use serde_json::{Map, Value};
use std::fmt;

/// Link keywords recognized at definition time
const LINK_KEYWORDS: &[&str] = &["templated"];

/// The kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
	Attribute,
	Link,
	Meta,
	Permission,
	Relationship,
	Collection,
}

impl Category {
	pub fn label(&self) -> &'static str {
		match self {
			Category::Attribute => "Attribute",
			Category::Link => "Link",
			Category::Meta => "Meta",
			Category::Permission => "Permission",
			Category::Relationship => "Relationship",
			Category::Collection => "Collection",
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Immutable option bag attached to a field.
///
/// # Examples
///
/// ```
/// use halite_serializers::{FieldOptions, Source};
/// use serde_json::json;
///
/// let options: FieldOptions<()> = FieldOptions::new()
///     .value("Ferdi")
///     .unless(Source::method("anonymous"));
///
/// assert_eq!(options.get_value(), Some(&json!("Ferdi")));
/// assert!(options.get_when().is_none());
/// ```
pub struct FieldOptions<T> {
	value: Option<Value>,
	when: Option<Source<T>>,
	unless: Option<Source<T>>,
	attrs: Map<String, Value>,
	keywords: Vec<String>,
	flags: Map<String, Value>,
}

impl<T> FieldOptions<T> {
	pub fn new() -> Self {
		Self {
			value: None,
			when: None,
			unless: None,
			attrs: Map::new(),
			keywords: Vec::new(),
			flags: Map::new(),
		}
	}

	/// Literal value returned verbatim, with no evaluation
	pub fn value(mut self, value: impl Into<Value>) -> Self {
		self.value = Some(value.into());
		self
	}

	/// Render only when the source is truthy (the `if` guard)
	pub fn when(mut self, source: impl Into<Source<T>>) -> Self {
		self.when = Some(source.into());
		self
	}

	/// Render only when the source is falsy
	pub fn unless(mut self, source: impl Into<Source<T>>) -> Self {
		self.unless = Some(source.into());
		self
	}

	/// Extra attribute merged into each rendered link object
	pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attrs.insert(key.into(), value.into());
		self
	}

	pub fn attrs(mut self, attrs: Map<String, Value>) -> Self {
		self.attrs.extend(attrs);
		self
	}

	/// Link keyword such as `templated`; unknown keywords fail validation
	pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
		self.keywords.push(keyword.into());
		self
	}

	pub fn templated(self) -> Self {
		self.keyword("templated")
	}

	/// Link flag with an explicit value, such as `("templated", true)`.
	///
	/// Flags are rendered into the link object like keywords and face the
	/// same check: unknown names fail validation.
	pub fn flag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.flags.insert(key.into(), value.into());
		self
	}

	pub fn get_value(&self) -> Option<&Value> {
		self.value.as_ref()
	}

	pub fn get_when(&self) -> Option<&Source<T>> {
		self.when.as_ref()
	}

	pub fn get_unless(&self) -> Option<&Source<T>> {
		self.unless.as_ref()
	}

	pub fn get_attrs(&self) -> &Map<String, Value> {
		&self.attrs
	}

	pub fn get_keywords(&self) -> &[String] {
		&self.keywords
	}

	pub fn get_flag(&self, key: &str) -> Option<&Value> {
		self.flags.get(key)
	}

	/// Resolve link attrs: caller attrs overlaid with keywords, then flags
	fn link_attrs(&self) -> Result<Map<String, Value>, DefinitionError> {
		let mut attrs = self.attrs.clone();
		for keyword in &self.keywords {
			if !LINK_KEYWORDS.contains(&keyword.as_str()) {
				return Err(DefinitionError::unknown_link_keyword(keyword));
			}
			attrs.insert(keyword.clone(), Value::Bool(true));
		}
		for (flag, value) in &self.flags {
			if !LINK_KEYWORDS.contains(&flag.as_str()) {
				return Err(DefinitionError::unknown_link_keyword(flag));
			}
			attrs.insert(flag.clone(), value.clone());
		}
		Ok(attrs)
	}
}

impl<T> Default for FieldOptions<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Clone for FieldOptions<T> {
	fn clone(&self) -> Self {
		Self {
			value: self.value.clone(),
			when: self.when.clone(),
			unless: self.unless.clone(),
			attrs: self.attrs.clone(),
			keywords: self.keywords.clone(),
			flags: self.flags.clone(),
		}
	}
}

impl<T> fmt::Debug for FieldOptions<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldOptions")
			.field("value", &self.value)
			.field("when", &self.when)
			.field("unless", &self.unless)
			.field("attrs", &self.attrs)
			.field("keywords", &self.keywords)
			.field("flags", &self.flags)
			.finish()
	}
}

/// A named, guarded, value-producing schema declaration
pub struct Field<T> {
	name: String,
	category: Category,
	options: FieldOptions<T>,
	procedure: Option<Procedure<T>>,
}

impl<T> Field<T> {
	pub fn new(
		category: Category,
		name: impl Into<String>,
		options: FieldOptions<T>,
		procedure: Option<Procedure<T>>,
	) -> Self {
		Self {
			name: name.into(),
			category,
			options,
			procedure,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn category(&self) -> Category {
		self.category
	}

	pub fn options(&self) -> &FieldOptions<T> {
		&self.options
	}

	pub fn procedure(&self) -> Option<&Procedure<T>> {
		self.procedure.as_ref()
	}
}

impl<T: Subject> Field<T> {
	/// Check the declaration against the base rule and its category rules.
	///
	/// # Examples
	///
	/// ```
	/// use halite_serializers::{Category, Field, FieldOptions, Procedure};
	/// use serde_json::json;
	///
	/// let field: Field<()> = Field::new(
	///     Category::Attribute,
	///     "name",
	///     FieldOptions::new().value("Ferdi"),
	///     Some(Procedure::value(|_, _| json!("Duck"))),
	/// );
	///
	/// let err = field.validate().unwrap_err();
	/// assert_eq!(err.to_string(), "Cannot specify both value and procedure for name");
	/// ```
	pub fn validate(&self) -> Result<(), DefinitionError> {
		if self.options.value.is_some() && self.procedure.is_some() {
			return Err(DefinitionError::value_with_procedure(&self.name));
		}

		match self.category {
			Category::Link => {
				if self.procedure.is_none() && self.options.value.is_none() {
					return Err(DefinitionError::link_without_href(&self.name));
				}
				self.options.link_attrs()?;
				self.expect_procedure_kind(|p| matches!(p, Procedure::Value(_)))
			}
			Category::Relationship => match &self.procedure {
				None => Err(DefinitionError::relationship_without_procedure(&self.name)),
				Some(_) => self.expect_procedure_kind(|p| matches!(p, Procedure::Embed(_))),
			},
			Category::Collection => match &self.procedure {
				None => Err(DefinitionError::collection_without_procedure(&self.name)),
				Some(_) => self.expect_procedure_kind(|p| matches!(p, Procedure::Members(_))),
			},
			Category::Attribute | Category::Meta | Category::Permission => {
				self.expect_procedure_kind(|p| matches!(p, Procedure::Value(_)))
			}
		}
	}

	fn expect_procedure_kind(
		&self,
		accepts: impl Fn(&Procedure<T>) -> bool,
	) -> Result<(), DefinitionError> {
		match &self.procedure {
			Some(procedure) if !accepts(procedure) => Err(DefinitionError::procedure_mismatch(
				self.category.label(),
				&self.name,
				procedure.kind(),
			)),
			_ => Ok(()),
		}
	}

	/// Evaluate the field's guards.
	///
	/// `when` takes precedence: if it is present, `unless` is not consulted.
	/// Relationships additionally require their name to be requested in the
	/// context's include tree.
	pub fn is_enabled(&self, serializer: &Serializer<T>, context: &Context<'_>) -> bool {
		let guarded = if let Some(when) = &self.options.when {
			is_truthy(&context.call_instance(serializer, when))
		} else if let Some(unless) = &self.options.unless {
			!is_truthy(&context.call_instance(serializer, unless))
		} else {
			true
		};

		if !guarded {
			return false;
		}

		match self.category {
			Category::Relationship => context.include_options().is_requested(&self.name),
			_ => true,
		}
	}

	/// Compute the raw value.
	///
	/// An explicit `value` option wins; otherwise the value procedure runs;
	/// otherwise the serializer's same-named method is invoked. Attributes of
	/// a resource schema read the bound resource instead of the serializer.
	pub fn value(&self, serializer: &Serializer<T>, context: &Context<'_>) -> Value {
		if let Some(value) = &self.options.value {
			return value.clone();
		}

		match &self.procedure {
			Some(Procedure::Value(procedure)) => procedure(serializer, context),
			_ if self.reads_resource(serializer) => {
				serializer.read(&self.name).unwrap_or(Value::Null)
			}
			_ => serializer.call_method(&self.name, context),
		}
	}

	fn reads_resource(&self, serializer: &Serializer<T>) -> bool {
		self.category == Category::Attribute && serializer.schema().resource_name().is_some()
	}

	/// Compute the value as it should appear in rendered output.
	///
	/// Returns `None` when the field should be omitted.
	pub fn render_value(&self, serializer: &Serializer<T>, context: &Context<'_>) -> Option<Value> {
		let raw = self.value(serializer, context);

		match self.category {
			Category::Link => self.link_value(raw),
			Category::Permission => Some(Value::Bool(is_truthy(&raw))),
			_ => Some(raw),
		}
	}

	fn link_value(&self, raw: Value) -> Option<Value> {
		// validated at definition time
		let attrs = self.options.link_attrs().unwrap_or_default();

		let wrap = |href: Value| {
			let mut link = Map::new();
			link.insert("href".to_string(), href);
			for (key, value) in &attrs {
				if key != "href" {
					link.insert(key.clone(), value.clone());
				}
			}
			Value::Object(link)
		};

		match raw {
			Value::Null => None,
			Value::Array(hrefs) => Some(Value::Array(hrefs.into_iter().map(wrap).collect())),
			href => Some(wrap(href)),
		}
	}

	/// Run the relationship procedure
	pub fn embedded(&self, serializer: &Serializer<T>, context: &Context<'_>) -> Embedded {
		match &self.procedure {
			Some(Procedure::Embed(procedure)) => procedure(serializer, context),
			_ => Embedded::None,
		}
	}

	/// Run the collection procedure
	pub fn members(&self, serializer: &Serializer<T>, context: &Context<'_>) -> Members {
		match &self.procedure {
			Some(Procedure::Members(procedure)) => procedure(serializer, context),
			_ => Members::default(),
		}
	}
}

impl<T> fmt::Debug for Field<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("category", &self.category)
			.field("options", &self.options)
			.field("procedure", &self.procedure)
			.finish()
	}
}
