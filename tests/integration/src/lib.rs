//! Integration test utilities for the storefront
//!
//! Shared setup for end-to-end scenarios that cross the storage,
//! serializer and application crates.

use serde_json::{Value, json};
use storefront_apps::models::{Category, User, database};
use storefront_apps::users::UserRegisterSerializer;
use storefront_db::{ConnectionExt, Database};
use storefront_serializers::Serializer;

/// A fresh database with every storefront table registered
pub fn empty_store() -> Database {
	database()
}

/// Register a user through the public registration serializer
pub fn register(db: &Database, first_name: &str, email: &str) -> User {
	let mut serializer = UserRegisterSerializer::from_data(
		db,
		json!({
			"first_name": first_name,
			"last_name": "Doe",
			"email": email,
			"password": "Passw0rd",
		}),
	)
	.expect("registration payload should bind");
	assert!(
		serializer.is_valid().expect("validation should run"),
		"{:?}",
		serializer.errors()
	);
	serializer.save().expect("registration should persist")
}

/// Insert categories by name, returning their identifiers in order
pub fn seed_categories(db: &Database, names: &[&str]) -> Vec<i64> {
	names
		.iter()
		.map(|name| {
			let mut category = Category {
				id: None,
				name: name.to_string(),
			};
			db.insert(&mut category).expect("category should insert");
			category.id.unwrap_or_default()
		})
		.collect()
}

/// Field names of every error entry, `None` standing for data-level failures
pub fn error_fields(errors: &[storefront_serializers::ErrorEntry]) -> Vec<Option<String>> {
	errors.iter().map(|e| e.field.clone()).collect()
}

/// Build a raw query object from a JSON literal
pub fn raw_query(value: Value) -> storefront_serializers::Data {
	value.as_object().cloned().unwrap_or_default()
}
