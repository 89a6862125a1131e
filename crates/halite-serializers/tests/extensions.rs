//! Method resolution and extension tests
//!
//! Tests how method references are resolved through schema helpers,
//! installed extensions and the bound subject, and how forwarded options
//! reach child serializers.

use assert_json_diff::assert_json_eq;
use halite_core::Options;
use halite_serializers::{
	Configuration, Context, Embedded, Extension, FieldOptions, Helpers, Schema, SchemaBuilder,
};
use rstest::*;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct Duck {
	name: &'static str,
	mood: &'static str,
	flying: bool,
}

fn ferdi() -> Duck {
	Duck {
		name: "Ferdi",
		mood: "grumpy",
		flying: false,
	}
}

/// An extension that counts how deep it was called from
struct Depth;

impl Extension for Depth {
	fn name(&self) -> &str {
		"depth"
	}

	fn call(&self, method: &str, context: &Context<'_>) -> Option<Value> {
		(method == "depth").then(|| json!(context.depth()))
	}
}

fn routes() -> Helpers {
	Helpers::new("routes")
		.helper("ducks_path", |_| json!("/ducks"))
		.helper("mood", |_| json!("from extension"))
}

fn meta_schema(builder: SchemaBuilder<Duck>) -> SchemaBuilder<Duck> {
	builder
		.meta("ducks_path", FieldOptions::new())
		.meta("depth", FieldOptions::new())
		.meta("mood", FieldOptions::new())
		.meta("name", FieldOptions::new())
		.meta("shoe_size", FieldOptions::new())
}

/// Test the lookup order of method references
///
/// This test verifies that:
/// 1. Schema helpers shadow extensions
/// 2. Extensions shadow the subject's fields
/// 3. The subject answers what neither registers
/// 4. Unknown methods evaluate to null
#[rstest]
fn test_method_resolution_order() {
	// Arrange
	let configuration = Configuration::new().extension(routes()).extension(Depth);
	let schema = meta_schema(Schema::<Duck>::builder())
		.configure(&configuration)
		.helper("ducks_path", |s, _| json!(format!("/ducks/{}", s.subject().name)))
		.build()
		.unwrap();

	// Act
	let output = schema.serializer(ferdi(), Options::new()).render().unwrap();

	// Assert
	assert_json_eq!(
		output,
		json!({
			"_meta": {
				"ducks_path": "/ducks/Ferdi",
				"depth": 0,
				"mood": "from extension",
				"name": "Ferdi",
				"shoe_size": null
			}
		})
	);
}

/// Test that extensions are tried in installation order
#[rstest]
fn test_first_extension_wins() {
	let schema = Schema::<Duck>::builder()
		.extension(Helpers::new("first").helper("mood", |_| json!("first")))
		.extension(Helpers::new("second").helper("mood", |_| json!("second")))
		.meta("mood", FieldOptions::new())
		.build()
		.unwrap();

	let output = schema.serializer(ferdi(), Options::new()).render().unwrap();

	assert_json_eq!(output, json!({"_meta": {"mood": "first"}}));
}

/// Test guards given as method references
#[rstest]
#[case::when_subject_true(FieldOptions::new().value(1).when("flying"), false)]
#[case::unless_subject_false(FieldOptions::new().value(1).unless("flying"), true)]
#[case::when_extension(FieldOptions::new().value(1).when("ducks_path"), true)]
#[case::when_unknown(FieldOptions::new().value(1).when("wings"), false)]
fn test_method_reference_guards(#[case] options: FieldOptions<Duck>, #[case] shown: bool) {
	let schema = Schema::<Duck>::builder()
		.extension(routes())
		.attribute("guarded", options)
		.build()
		.unwrap();

	let output = schema.serializer(ferdi(), Options::new()).render().unwrap();

	assert_eq!(output.get("guarded").is_some(), shown);
}

/// Test that forwarded options reach every descendant
///
/// This test verifies that:
/// 1. Keys named in `forward` are inherited by children and grandchildren
/// 2. A child's own setting for a forwarded key wins
/// 3. Keys not named in `forward` stay with the serializer that set them
#[rstest]
fn test_forwarded_options_reach_descendants() {
	// Arrange
	let leaf = Schema::<()>::builder()
		.attribute_with("locale", FieldOptions::new(), |_, ctx| {
			ctx.fetch_or("locale", &Value::Null).clone()
		})
		.attribute_with("secret", FieldOptions::new(), |_, ctx| {
			ctx.fetch_or("secret", &Value::Null).clone()
		})
		.build()
		.unwrap();
	let middle_leaf = leaf.clone();
	let middle = Schema::<()>::builder()
		.attribute_with("locale", FieldOptions::new(), |_, ctx| {
			ctx.fetch_or("locale", &Value::Null).clone()
		})
		.relationship("leaf", FieldOptions::new(), move |_, _| {
			Embedded::one(middle_leaf.serializer((), Options::new()))
		})
		.relationship("local", FieldOptions::new(), move |_, _| {
			Embedded::one(leaf.serializer((), Options::new().set("locale", "nl")))
		})
		.build()
		.unwrap();
	let root = Schema::<()>::builder()
		.relationship("middle", FieldOptions::new(), move |_, _| {
			Embedded::one(middle.serializer((), Options::new()))
		})
		.build()
		.unwrap();
	let options = Options::new()
		.include("middle.leaf,middle.local")
		.set("locale", "en")
		.set("secret", "hunter2")
		.forward(["locale"]);

	// Act
	let output = root.serializer((), options).render().unwrap();

	// Assert
	assert_json_eq!(
		output,
		json!({
			"_relationships": {
				"middle": {
					"locale": "en",
					"_relationships": {
						"leaf": {"locale": "en", "secret": null},
						"local": {"locale": "nl", "secret": null}
					}
				}
			}
		})
	);
}
