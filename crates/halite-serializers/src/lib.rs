//! # halite-serializers
//!
//! Schema-driven rendering engine for nested JSON resources.
//!
//! A [`Schema`] declares named fields by category (attributes, links, meta,
//! permissions, relationships, and an optional primary collection). Binding a
//! schema to a subject and an [`Options`](halite_core::Options) bag yields a
//! [`Serializer`]; rendering it runs the layer [`Pipeline`] under a root
//! [`Context`] and recurses into relationships the caller asked for through
//! the `include` option.
//!
//! ## Features
//!
//! - **Guards**: `when`/`unless` sources evaluated as literals, callables or
//!   method references ([`Source`])
//! - **Partial inclusion**: relationships render only when requested, to any
//!   depth, with include keys validated against declared relationships
//! - **Layers**: the output composition is an explicit, replaceable list
//! - **Root wrapping**: resources and collections wrap under their type name
//!   at depth 0, or as configured by `include_root`
//! - **Extensions**: named helpers injected at schema-build time
//!
//! ## Example
//!
//! ```rust
//! use halite_core::Options;
//! use halite_serializers::{Embedded, FieldOptions, Schema};
//! use serde_json::json;
//!
//! #[derive(serde::Serialize)]
//! struct Duck {
//!     name: &'static str,
//! }
//!
//! let food = Schema::<()>::builder()
//!     .resource("food")
//!     .attribute("kind", FieldOptions::new().value("bread"))
//!     .build()
//!     .unwrap();
//!
//! let duck = Schema::<Duck>::builder()
//!     .resource("duck")
//!     .attribute("name", FieldOptions::new())
//!     .relationship("food", FieldOptions::new(), move |_, _| {
//!         Embedded::one(food.serializer((), Options::new()))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let plain = duck.serializer(Duck { name: "Ferdi" }, Options::new());
//! assert_eq!(plain.render().unwrap(), json!({"duck": {"name": "Ferdi"}}));
//!
//! let included = duck.serializer(Duck { name: "Ferdi" }, Options::new().include("food"));
//! assert_eq!(
//!     included.render().unwrap(),
//!     json!({"duck": {"name": "Ferdi", "_relationships": {"food": {"kind": "bread"}}}})
//! );
//! ```

mod collection;
pub mod context;
pub mod extension;
pub mod field;
pub mod fields;
pub mod node;
pub mod pipeline;
pub mod relationships;
mod resource;
pub mod schema;
pub mod serializer;
pub mod source;

pub use context::Context;
pub use extension::{Configuration, Extension, HelperFn, Helpers};
pub use field::{Category, Field, FieldOptions};
pub use fields::FieldSet;
pub use node::{Embedded, Members, Node};
pub use pipeline::{Layer, Pipeline};
pub use relationships::{render_child, validate_include};
pub use schema::{Schema, SchemaBuilder, SchemaKind};
pub use serializer::{Render, Serializer, Subject};
pub use source::{EmbedFn, MembersFn, Procedure, Source, ValueFn};
