//! # Halite
//!
//! Declarative rendering of domain objects into nested JSON resources.
//!
//! A schema names the fields of a serializer type (plain attributes, links,
//! meta entries, permissions, relationships, and an optional primary
//! collection). Rendering a serializer composes those fields into a JSON
//! tree, and the caller decides through the `include` option which
//! relationships are expanded and how deep.
//!
//! ## Crates
//!
//! - [`halite_core`]: include trees, option bags, error taxonomy
//! - [`halite_serializers`]: fields, schemas, contexts, the layer pipeline
//!   and relationship recursion
//!
//! ## Feature Flags
//!
//! - `toml` (default): parse option bags from TOML documents
//!
//! ## Quick Example
//!
//! ```rust
//! use halite::prelude::*;
//! use serde_json::json;
//!
//! #[derive(Serialize)]
//! struct Duck {
//!     name: &'static str,
//! }
//!
//! let schema = Schema::<Duck>::builder()
//!     .resource("duck")
//!     .attribute("name", FieldOptions::new())
//!     .link("self", FieldOptions::new().value("/ducks/ferdi"))
//!     .build()
//!     .unwrap();
//!
//! let output = schema
//!     .serializer(Duck { name: "Ferdi" }, Options::new())
//!     .render()
//!     .unwrap();
//!
//! assert_eq!(
//!     output,
//!     json!({"duck": {"name": "Ferdi", "_links": {"self": {"href": "/ducks/ferdi"}}}})
//! );
//! ```
//!
//! ## Errors
//!
//! Schema authoring mistakes surface from [`SchemaBuilder::build`] as
//! [`DefinitionError`]. Requests for undeclared include paths surface from
//! `render()` as [`RenderError::InvalidQueryParameter`]; callers map
//! [`RenderError::is_client_error`] onto their transport's client error.

pub use halite_core::{
	DefinitionError, IncludeRoot, IncludeTree, Options, OptionsError, RenderError, RenderResult,
	is_off_marker, is_truthy,
};
pub use halite_serializers::{
	Category, Configuration, Context, Embedded, Extension, Field, FieldOptions, FieldSet, Helpers,
	Layer, Members, Node, Pipeline, Procedure, Render, Schema, SchemaBuilder, SchemaKind,
	Serializer, Source, Subject, render_child,
};

/// Option key constants
pub mod options {
	pub use halite_core::options::{
		FORWARD, INCLUDE, INCLUDE_LINKS, INCLUDE_META, INCLUDE_PERMISSIONS, INCLUDE_ROOT, PARENT,
	};
}

/// Built-in render layers
pub mod layers {
	pub use halite_serializers::pipeline::{
		AttributesLayer, LINKS_KEY, LinksLayer, META_KEY, MetaLayer, PERMISSIONS_KEY,
		PermissionsLayer, RELATIONSHIPS_KEY,
	};
	pub use halite_serializers::relationships::RelationshipsLayer;
}

pub mod prelude {
	pub use crate::{
		Configuration, Context, DefinitionError, Embedded, FieldOptions, Helpers, IncludeTree,
		Members, Node, Options, Render, RenderError, Schema, Serializer, Source,
	};

	// External
	pub use serde::{Deserialize, Serialize};
}
