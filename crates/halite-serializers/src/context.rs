//! Render contexts
//!
//! A [`Context`] is created once per render call and once per child render.
//! It never changes after construction: deriving a child always builds a new
//! value that borrows its parent, so depth accounting follows the chain of
//! serializers that produced it.

use crate::serializer::{Serializer, Subject};
use crate::source::Source;
use halite_core::options::{FORWARD, INCLUDE};
use halite_core::{IncludeRoot, IncludeTree, Options};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::fmt;

/// Immutable per-render state: resolved options, parent link and depth.
///
/// # Examples
///
/// ```
/// use halite_core::Options;
/// use halite_serializers::Context;
///
/// let root = Context::root(Options::new().include("food.ingredients"));
/// let child = root.child(Options::new());
///
/// assert_eq!(root.depth(), 0);
/// assert_eq!(child.depth(), 1);
/// assert!(root.include_options().is_requested("food"));
/// ```
pub struct Context<'p> {
	options: Options,
	parent: Option<&'p Context<'p>>,
	depth: usize,
	include: OnceCell<IncludeTree>,
}

impl Context<'static> {
	/// Create a root context; its depth is 0
	pub fn root(options: Options) -> Self {
		Self {
			options,
			parent: None,
			depth: 0,
			include: OnceCell::new(),
		}
	}
}

impl<'p> Context<'p> {
	/// Derive a child context whose parent is `self`.
	///
	/// Keys listed in this context's `forward` option are copied into the
	/// child's options unless the child already sets them. The `forward` list
	/// itself is inherited the same way.
	pub fn child(&self, options: Options) -> Context<'_> {
		let mut options = options;

		let forwarded = self.options.forwarded_keys();
		if !forwarded.is_empty() && !options.contains_key(FORWARD) {
			if let Some(list) = self.options.fetch(FORWARD) {
				options.insert(FORWARD, list.clone());
			}
		}
		for key in forwarded {
			if key == INCLUDE || options.contains_key(&key) {
				continue;
			}
			if let Some(value) = self.options.fetch(&key) {
				options.insert(&key, value.clone());
			}
		}

		let depth = self.depth + 1;
		tracing::trace!(depth, "derived child render context");

		Context {
			options,
			parent: Some(self),
			depth,
			include: OnceCell::new(),
		}
	}

	pub fn parent(&self) -> Option<&Context<'p>> {
		self.parent
	}

	/// 0 for a root context, else the parent's depth plus one
	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn is_root(&self) -> bool {
		self.parent.is_none()
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn fetch(&self, key: &str) -> Option<&Value> {
		self.options.fetch(key)
	}

	pub fn fetch_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
		self.options.fetch_or(key, default)
	}

	pub fn flag(&self, key: &str, default: bool) -> bool {
		self.options.flag(key, default)
	}

	/// The include tree parsed from the `include` option, computed on first use
	pub fn include_options(&self) -> &IncludeTree {
		self.include.get_or_init(|| self.options.include_tree())
	}

	/// Resolve root wrapping.
	///
	/// An explicit `include_root` option wins. Otherwise wrapping is enabled
	/// only at depth 0.
	pub fn include_root(&self) -> IncludeRoot {
		match self.options.root_setting() {
			Some(setting) => setting,
			None if self.depth == 0 => IncludeRoot::Enabled,
			None => IncludeRoot::Disabled,
		}
	}

	/// Evaluate a guard or value source against a serializer.
	///
	/// Literals are returned as-is, callables run with the serializer as
	/// receiver and this context as argument, and method references are
	/// resolved through [`Serializer::call_method`].
	pub fn call_instance<T: Subject>(&self, instance: &Serializer<T>, source: &Source<T>) -> Value {
		match source {
			Source::Literal(value) => value.clone(),
			Source::Callable(procedure) => procedure(instance, self),
			Source::Method(name) => instance.call_method(name, self),
		}
	}
}

impl fmt::Debug for Context<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("options", &self.options)
			.field("depth", &self.depth)
			.field("has_parent", &self.parent.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_root_context_has_depth_zero() {
		let context = Context::root(Options::new());

		assert_eq!(context.depth(), 0);
		assert!(context.is_root());
		assert!(context.parent().is_none());
	}

	#[rstest]
	fn test_child_points_to_parent() {
		// Arrange
		let root = Context::root(Options::new().set("marker", "root"));

		// Act
		let child = root.child(Options::new().set("marker", "child"));
		let grandchild = child.child(Options::new());

		// Assert
		assert_eq!(child.depth(), 1);
		assert_eq!(grandchild.depth(), 2);
		assert_eq!(
			grandchild.parent().and_then(|p| p.fetch("marker")),
			Some(&json!("child"))
		);
		assert_eq!(
			grandchild
				.parent()
				.and_then(Context::parent)
				.and_then(|p| p.fetch("marker")),
			Some(&json!("root"))
		);
	}

	#[rstest]
	fn test_child_does_not_inherit_unforwarded_keys() {
		let root = Context::root(Options::new().include_links(false));

		let child = root.child(Options::new());

		assert!(!root.flag("include_links", true));
		assert!(child.flag("include_links", true));
	}

	#[rstest]
	fn test_forwarded_keys_are_inherited() {
		// Arrange
		let root = Context::root(
			Options::new()
				.include_links(false)
				.set("locale", "de")
				.forward(["include_links", "locale"]),
		);

		// Act
		let child = root.child(Options::new().set("locale", "fr"));
		let grandchild = child.child(Options::new());

		// Assert
		assert!(!child.flag("include_links", true));
		assert_eq!(child.fetch("locale"), Some(&json!("fr")));
		assert!(!grandchild.flag("include_links", true));
		assert_eq!(grandchild.fetch("locale"), Some(&json!("fr")));
	}

	#[rstest]
	fn test_include_is_never_forwarded() {
		let root = Context::root(Options::new().include("food").forward(["include"]));

		let child = root.child(Options::new());

		assert!(child.include_options().is_empty());
	}

	#[rstest]
	#[case(Options::new(), 0, Some("duck"))]
	#[case(Options::new(), 1, None)]
	#[case(Options::new().include_root(false), 0, None)]
	#[case(Options::new().include_root(true), 1, Some("duck"))]
	#[case(Options::new().include_root("goose"), 0, Some("goose"))]
	fn test_include_root_resolution(
		#[case] options: Options,
		#[case] depth: usize,
		#[case] expected: Option<&str>,
	) {
		let root = Context::root(if depth == 0 { options.clone() } else { Options::new() });
		let child = root.child(options);
		let context = if depth == 0 { &root } else { &child };

		let setting = context.include_root();

		assert_eq!(setting.root_name("duck"), expected);
	}

	#[rstest]
	fn test_include_options_are_parsed_lazily_from_any_form() {
		let context = Context::root(Options::new().include(json!(["food.ingredients", "friends"])));

		let tree = context.include_options();

		assert_eq!(
			tree.to_value(),
			json!({"food": {"ingredients": {}}, "friends": {}})
		);
		assert!(std::ptr::eq(tree, context.include_options()));
	}

	fn chain_depth(context: &Context<'_>, remaining: usize) -> (usize, usize) {
		if remaining == 0 {
			let mut walked = 0;
			let mut cursor = context.parent();
			while let Some(parent) = cursor {
				walked += 1;
				cursor = parent.parent();
			}
			return (context.depth(), walked);
		}
		let child = context.child(Options::new());
		assert_eq!(child.depth(), context.depth() + 1);
		chain_depth(&child, remaining - 1)
	}

	proptest! {
		#[test]
		fn test_depth_is_monotonic(length in 0usize..24) {
			let root = Context::root(Options::new());

			let (depth, walked) = chain_depth(&root, length);

			prop_assert_eq!(depth, length);
			prop_assert_eq!(walked, length);
		}
	}
}
