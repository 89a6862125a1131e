//! Field registry

use crate::field::{Category, Field};
use crate::serializer::Subject;
use halite_core::DefinitionError;
use std::collections::HashMap;
use std::fmt;

/// Ordered, categorized registry of fields for one schema.
///
/// Append-only: fields are validated as they are added and kept in
/// declaration order. Duplicate names are allowed and render in order.
pub struct FieldSet<T> {
	fields: HashMap<Category, Vec<Field<T>>>,
}

impl<T: Subject> FieldSet<T> {
	pub fn new() -> Self {
		Self {
			fields: HashMap::new(),
		}
	}

	/// Validate a field and append it to its category
	pub fn add(&mut self, field: Field<T>) -> Result<&Field<T>, DefinitionError> {
		field.validate()?;

		let fields = self.fields.entry(field.category()).or_default();
		fields.push(field);
		// just pushed
		Ok(&fields[fields.len() - 1])
	}

	/// Fields of a category in declaration order; empty if none were declared
	pub fn for_category(&self, category: Category) -> &[Field<T>] {
		self.fields
			.get(&category)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	pub fn collection_field(&self) -> Option<&Field<T>> {
		self.for_category(Category::Collection).first()
	}

	/// Names of all declared relationships
	pub fn relationship_names(&self) -> impl Iterator<Item = &str> {
		self.for_category(Category::Relationship)
			.iter()
			.map(Field::name)
	}

	pub fn len(&self) -> usize {
		self.fields.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<T: Subject> Default for FieldSet<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for FieldSet<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.fields.iter().map(|(category, fields)| {
				let names: Vec<&str> = fields.iter().map(|field| field.name()).collect();
				(category, names)
			}))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldOptions;
	use crate::node::Embedded;
	use crate::source::Procedure;
	use rstest::rstest;

	fn field(category: Category, name: &str) -> Field<()> {
		match category {
			Category::Relationship => Field::new(
				category,
				name,
				FieldOptions::new(),
				Some(Procedure::embed(|_, _| Embedded::None)),
			),
			_ => Field::new(category, name, FieldOptions::new().value(name), None),
		}
	}

	#[rstest]
	fn test_add_returns_stored_field() {
		let mut set = FieldSet::new();

		let added = set.add(field(Category::Meta, "version")).unwrap();

		assert_eq!(added.name(), "version");
		assert_eq!(added.category(), Category::Meta);
	}

	#[rstest]
	fn test_add_rejects_invalid_fields() {
		// Arrange
		let mut set = FieldSet::<()>::new();
		let invalid = Field::new(Category::Link, "self", FieldOptions::new(), None);

		// Act
		let result = set.add(invalid);

		// Assert
		assert!(result.is_err());
		assert!(set.is_empty());
	}

	#[rstest]
	fn test_for_category_preserves_declaration_order() {
		let mut set = FieldSet::new();
		for name in ["name", "age", "name"] {
			set.add(field(Category::Attribute, name)).unwrap();
		}
		set.add(field(Category::Link, "self")).unwrap();

		let names: Vec<_> = set
			.for_category(Category::Attribute)
			.iter()
			.map(Field::name)
			.collect();

		assert_eq!(names, vec!["name", "age", "name"]);
		assert_eq!(set.len(), 4);
	}

	#[rstest]
	#[case(Category::Permission)]
	#[case(Category::Relationship)]
	#[case(Category::Collection)]
	fn test_for_category_is_empty_when_undeclared(#[case] category: Category) {
		let set = FieldSet::<()>::new();

		assert!(set.for_category(category).is_empty());
	}

	#[rstest]
	fn test_relationship_names() {
		let mut set = FieldSet::new();
		set.add(field(Category::Relationship, "food")).unwrap();
		set.add(field(Category::Attribute, "name")).unwrap();
		set.add(field(Category::Relationship, "friends")).unwrap();

		let names: Vec<_> = set.relationship_names().collect();

		assert_eq!(names, vec!["food", "friends"]);
	}
}
