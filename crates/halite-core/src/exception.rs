//! Error taxonomy for halite.
//!
//! Two families of errors exist:
//!
//! - [`DefinitionError`]: mistakes made while authoring a schema. These are
//!   programming errors and surface from schema builders before any value can
//!   be rendered.
//! - [`RenderError`]: conditions raised while rendering a request. The only
//!   client-facing one is [`RenderError::InvalidQueryParameter`], which callers
//!   translate into a transport-level response (e.g. HTTP 400).

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Schema authoring errors
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
	/// A field declaration is inconsistent (value plus procedure, missing
	/// procedure, unknown keyword)
	#[error("{0}")]
	InvalidField(String),

	/// A resource declaration conflicts with the schema's existing shape
	#[error("{0}")]
	InvalidResource(String),

	/// A collection declaration conflicts with the schema's existing shape
	#[error("{0}")]
	InvalidCollection(String),
}

impl DefinitionError {
	pub fn value_with_procedure(field: &str) -> Self {
		Self::InvalidField(format!(
			"Cannot specify both value and procedure for {}",
			field
		))
	}

	pub fn link_without_href(field: &str) -> Self {
		Self::InvalidField(format!(
			"Link {} requires either procedure or explicit value",
			field
		))
	}

	pub fn relationship_without_procedure(field: &str) -> Self {
		Self::InvalidField(format!("Relationship {} must be defined with a proc", field))
	}

	pub fn collection_without_procedure(field: &str) -> Self {
		Self::InvalidField(format!("Collection {} must be defined with a proc", field))
	}

	pub fn procedure_mismatch(category: &str, field: &str, procedure: &str) -> Self {
		Self::InvalidField(format!(
			"{} {} cannot be defined with a {} procedure",
			category, field, procedure
		))
	}

	pub fn unknown_link_keyword(keyword: &str) -> Self {
		Self::InvalidField(format!("Unrecognized link keyword: {}", keyword))
	}

	pub fn resource_after_collection(schema: &str) -> Self {
		Self::InvalidResource(format!("{} has already defined a collection", schema))
	}

	pub fn collection_after_resource(schema: &str) -> Self {
		Self::InvalidCollection(format!("{} has already defined a resource", schema))
	}

	pub fn duplicate_collection(schema: &str) -> Self {
		Self::InvalidCollection(format!("{} collection is already defined", schema))
	}

	pub fn missing_collection(schema: &str) -> Self {
		Self::InvalidCollection(format!("{} collection is not defined", schema))
	}

	/// Get the error message
	pub fn message(&self) -> &str {
		match self {
			DefinitionError::InvalidField(message) => message,
			DefinitionError::InvalidResource(message) => message,
			DefinitionError::InvalidCollection(message) => message,
		}
	}
}

/// Errors raised while rendering
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	/// The caller asked for an include path the resource does not declare
	#[error("{message}")]
	InvalidQueryParameter { parameter: String, message: String },

	/// A schema invariant was found broken at render time
	#[error(transparent)]
	Definition(#[from] DefinitionError),

	/// Rendered output could not be written as JSON text
	#[error("Serde error: {0}")]
	Json(#[from] serde_json::Error),
}

impl RenderError {
	/// Build the error for an include key that matches no declared relationship.
	///
	/// # Examples
	///
	/// ```
	/// use halite_core::RenderError;
	///
	/// let err = RenderError::unknown_relationship(Some("duck"), "goose");
	/// assert_eq!(
	///     err.to_string(),
	///     "The duck resource does not have a `goose` relationship path."
	/// );
	/// assert_eq!(err.parameter(), Some("goose"));
	/// ```
	pub fn unknown_relationship(resource_type: Option<&str>, key: &str) -> Self {
		let subject = match resource_type {
			Some(name) => format!("The {} resource", name),
			None => "The resource".to_string(),
		};

		Self::InvalidQueryParameter {
			parameter: key.to_string(),
			message: format!("{} does not have a `{}` relationship path.", subject, key),
		}
	}

	/// Get the offending query parameter, if this error carries one
	pub fn parameter(&self) -> Option<&str> {
		match self {
			RenderError::InvalidQueryParameter { parameter, .. } => Some(parameter),
			_ => None,
		}
	}

	/// Check if this error was caused by the request rather than the schema
	pub fn is_client_error(&self) -> bool {
		matches!(self, RenderError::InvalidQueryParameter { .. })
	}
}

/// Errors produced while building an [`Options`](crate::Options) bag
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
	#[error("Options must be a map, got {0}")]
	NotAMap(&'static str),

	#[error("Invalid JSON options: {0}")]
	Json(#[from] serde_json::Error),

	#[cfg(feature = "toml")]
	#[error("Invalid TOML options: {0}")]
	Toml(#[from] toml::de::Error),
}
