//! # halite-core
//!
//! Foundation types shared by the halite rendering engine.
//!
//! This crate knows nothing about serializers. It provides:
//!
//! - **Include trees**: canonical nested maps describing which relationship
//!   paths a caller wants expanded ([`IncludeTree`])
//! - **Option bags**: key-normalized render options ([`Options`])
//! - **Errors**: definition-time and render-time error taxonomies
//! - **Value rules**: truthiness and include "off" markers
//!
//! ## Examples
//!
//! ```rust
//! use halite_core::IncludeTree;
//! use serde_json::json;
//!
//! let dotted = IncludeTree::parse(&json!("a.b,a.c"));
//! let nested = IncludeTree::parse(&json!({"a": {"b": {}, "c": {}}}));
//! assert_eq!(dotted, nested);
//! ```

pub mod exception;
pub mod include;
pub mod options;
pub mod value;

pub use exception::{DefinitionError, OptionsError, RenderError, RenderResult};
pub use include::IncludeTree;
pub use options::{IncludeRoot, Options};
pub use value::{is_off_marker, is_truthy};
