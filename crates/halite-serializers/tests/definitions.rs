//! Schema definition tests
//!
//! Tests that authoring mistakes fail at build time with the expected
//! error kind and message, before anything can be rendered.

use halite_core::{DefinitionError, Options};
use halite_serializers::{
	Category, Embedded, Field, FieldOptions, FieldSet, Members, Procedure, Schema, SchemaBuilder,
};
use rstest::*;
use serde_json::json;

fn builder() -> SchemaBuilder<()> {
	Schema::builder().named("DuckSerializer")
}

/// Test field-level definition errors
#[rstest]
#[case::value_and_procedure(
	builder().meta_with("age", FieldOptions::new().value(9.2), |_, _| json!(9.2)),
	"Cannot specify both value and procedure for age"
)]
#[case::link_without_href(
	builder().link("self", FieldOptions::new()),
	"Link self requires either procedure or explicit value"
)]
#[case::unknown_link_keyword(
	builder().link("find", FieldOptions::new().value("/ducks/{?id}").keyword("fancy")),
	"Unrecognized link keyword: fancy"
)]
#[case::unknown_link_flag(
	builder().link("find", FieldOptions::new().value("/ducks/{?id}").flag("fancy", true)),
	"Unrecognized link keyword: fancy"
)]
#[case::relationship_without_procedure(
	builder().add_field(Category::Relationship, "ducklings", FieldOptions::new(), None),
	"Relationship ducklings must be defined with a proc"
)]
#[case::collection_without_procedure(
	builder().add_field(Category::Collection, "ducks", FieldOptions::new(), None),
	"Collection ducks must be defined with a proc"
)]
#[case::mismatched_procedure(
	builder().add_field(
		Category::Relationship,
		"ducklings",
		FieldOptions::new(),
		Some(Procedure::value(|_, _| json!(null))),
	),
	"Relationship ducklings cannot be defined with a value procedure"
)]
fn test_invalid_fields(#[case] builder: SchemaBuilder<()>, #[case] message: &str) {
	let err = builder.build().unwrap_err();

	assert!(matches!(err, DefinitionError::InvalidField(_)));
	assert_eq!(err.to_string(), message);
}

/// Test primary entity conflicts
///
/// This test verifies that:
/// 1. A schema cannot declare both a resource and a collection
/// 2. A collection can only be declared once
#[rstest]
#[case::resource_then_collection(
	builder().resource("duck").collection("ducks", |_, _| Members::default()),
	DefinitionError::InvalidCollection("DuckSerializer has already defined a resource".into())
)]
#[case::collection_then_resource(
	builder().collection("ducks", |_, _| Members::default()).resource("duck"),
	DefinitionError::InvalidResource("DuckSerializer has already defined a collection".into())
)]
#[case::duplicate_collection(
	builder()
		.collection("ducks", |_, _| Members::default())
		.collection("ducks", |_, _| Members::default()),
	DefinitionError::InvalidCollection("DuckSerializer collection is already defined".into())
)]
fn test_primary_entity_conflicts(
	#[case] builder: SchemaBuilder<()>,
	#[case] expected: DefinitionError,
) {
	let err = builder.build().unwrap_err();

	assert_eq!(err, expected);
}

/// Test that the first error is reported even if later declarations are valid
#[rstest]
fn test_first_error_is_kept() {
	let err = builder()
		.attribute_with("name", FieldOptions::new().value("Ferdi"), |_, _| json!("x"))
		.resource("duck")
		.collection("ducks", |_, _| Members::default())
		.attribute("age", FieldOptions::new().value(9.2))
		.build()
		.unwrap_err();

	assert_eq!(err, DefinitionError::value_with_procedure("name"));
}

/// Test that a valid schema exposes its declarations for introspection
#[rstest]
fn test_valid_schema_introspection() {
	// Arrange
	let schema = builder()
		.resource("duck")
		.attribute("id", FieldOptions::new())
		.link("find", FieldOptions::new().value("/ducks/{?id}").templated())
		.relationship("ducklings", FieldOptions::new(), |_, _| Embedded::None)
		.relationship("parents", FieldOptions::new(), |_, _| Embedded::None)
		.build()
		.unwrap();

	// Act
	let relationships: Vec<_> = schema.fields().relationship_names().collect();
	let links = schema.fields().for_category(Category::Link);

	// Assert
	assert_eq!(schema.name(), "DuckSerializer");
	assert_eq!(schema.resource_name(), Some("duck"));
	assert_eq!(relationships, vec!["ducklings", "parents"]);
	assert_eq!(links.len(), 1);
	assert_eq!(links[0].options().get_keywords(), ["templated".to_string()]);
	assert!(schema.fields().for_category(Category::Meta).is_empty());
}

/// Test that a field set validates before storing
#[rstest]
fn test_field_set_rejects_before_storing() {
	let mut fields = FieldSet::<()>::new();

	let rejected = fields.add(Field::new(
		Category::Collection,
		"ducks",
		FieldOptions::new().value(json!([])),
		Some(Procedure::members(|_, _| Members::default())),
	));

	assert_eq!(
		rejected.unwrap_err(),
		DefinitionError::value_with_procedure("ducks")
	);
	assert!(fields.collection_field().is_none());
}

/// Test that a link flag declared on a schema reaches the rendered link
#[rstest]
fn test_link_flag_is_rendered() {
	let schema = builder()
		.link(
			"find",
			FieldOptions::new().value("/ducks/{?id}").flag("templated", true),
		)
		.build()
		.unwrap();

	let output = schema.serializer((), Options::new()).render().unwrap();

	assert_eq!(
		output,
		json!({"_links": {"find": {"href": "/ducks/{?id}", "templated": true}}})
	);
}
