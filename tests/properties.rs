//! Rendering property tests
//!
//! Property-based and table-driven checks of behaviour that must hold for
//! any schema: relationship gating, root wrapping, idempotence and error
//! reporting.

use assert_json_diff::assert_json_eq;
use halite::prelude::*;
use proptest::prelude::*;
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;

fn food_schema() -> Arc<Schema<()>> {
	Schema::<()>::builder()
		.named("FoodSerializer")
		.attribute("name", FieldOptions::new().value("Bread"))
		.build()
		.unwrap()
}

fn duck_schema() -> Arc<Schema<()>> {
	let food = food_schema();

	Schema::<()>::builder()
		.named("DuckSerializer")
		.resource("duck")
		.attribute("name", FieldOptions::new().value("Ferdi"))
		.relationship("food", FieldOptions::new(), move |_, _| {
			Embedded::one(food.serializer((), Options::new()))
		})
		.build()
		.unwrap()
}

fn empty_collection_schema() -> Arc<Schema<Vec<u32>>> {
	let food = food_schema();

	Schema::<Vec<u32>>::builder()
		.collection("ducks", move |s, _| {
			Members::items(s.subject().iter().map(|_| food.serializer((), Options::new())))
		})
		.build()
		.unwrap()
}

fn include_flag() -> impl Strategy<Value = (Value, bool)> {
	prop_oneof![
		Just((json!(0), false)),
		Just((json!(false), false)),
		Just((json!("0"), false)),
		Just((json!("false"), false)),
		Just((json!(true), true)),
		Just((json!({}), true)),
		(1u32..100).prop_map(|n| (json!(n), true)),
	]
}

proptest! {
	/// Test: relationship enablement
	///
	/// Category: Property
	/// Verifies that a relationship renders if and only if it is an
	/// explicit include key whose value is not an off marker.
	#[rstest]
	fn prop_relationship_follows_include_flag((flag, enabled) in include_flag()) {
		let output = duck_schema()
			.serializer((), Options::new().include(json!({"food": flag})))
			.render()
			.unwrap();

		let relationships = output["duck"].get("_relationships");
		prop_assert_eq!(relationships.is_some(), enabled);
		if enabled {
			prop_assert_eq!(relationships, Some(&json!({"food": {"name": "Bread"}})));
		}
	}

	/// Test: render idempotence
	///
	/// Category: Property
	/// Verifies that rendering the same serializer twice yields equal output.
	#[rstest]
	fn prop_render_is_idempotent(include_food in any::<bool>(), root in "[a-z]{1,8}") {
		let include = if include_food { json!("food") } else { json!(null) };
		let serializer = duck_schema()
			.serializer((), Options::new().include(include).include_root(root.as_str()));

		let first = serializer.render().unwrap();
		let second = serializer.render().unwrap();

		prop_assert_eq!(&first, &second);
		prop_assert!(first.get(root.as_str()).is_some());
	}

	/// Test: undeclared include keys
	///
	/// Category: Property
	/// Verifies that any undeclared include key fails with a message naming
	/// both the resource type and the key.
	#[rstest]
	fn prop_undeclared_include_key_fails(key in "[a-z]{1,10}".prop_filter("declared", |k| k != "food")) {
		let err = duck_schema()
			.serializer((), Options::new().include(json!({key.clone(): true})))
			.render()
			.unwrap_err();

		prop_assert_eq!(err.parameter(), Some(key.as_str()));
		prop_assert!(err.to_string().contains("duck"));
		let quoted_key = format!("`{}`", key);
		prop_assert!(err.to_string().contains(&quoted_key));
	}
}

/// Test the resource rendering with and without a requested relationship
#[rstest]
#[case::excluded(Options::new(), json!({"duck": {"name": "Ferdi"}}))]
#[case::included(
	Options::new().include(json!({"food": true})),
	json!({"duck": {"name": "Ferdi", "_relationships": {"food": {"name": "Bread"}}}})
)]
fn test_resource_relationship_inclusion(#[case] options: Options, #[case] expected: Value) {
	let output = duck_schema().serializer((), options).render().unwrap();

	assert_json_eq!(output, expected);
}

/// Test an empty collection with and without root wrapping
#[rstest]
#[case::wrapped(Options::new(), json!({"ducks": []}))]
#[case::unwrapped(Options::new().include_root(false), json!([]))]
fn test_empty_collection(#[case] options: Options, #[case] expected: Value) {
	let output = empty_collection_schema()
		.serializer(Vec::new(), options)
		.render()
		.unwrap();

	assert_json_eq!(output, expected);
}

/// Test that option documents drive rendering the same as builder calls
#[rstest]
#[case::json(Options::from_json_str(r#"{"includeRoot": "mallard", "include": "food"}"#).unwrap())]
#[case::toml(Options::from_toml_str("include_root = \"mallard\"\ninclude = [\"food\"]").unwrap())]
fn test_options_from_documents(#[case] options: Options) {
	let output = duck_schema().serializer((), options).render().unwrap();

	assert_json_eq!(
		output,
		json!({"mallard": {"name": "Ferdi", "_relationships": {"food": {"name": "Bread"}}}})
	);
}
