//! Default shipping address switching across users and updates

use rstest::*;
use serde_json::{Value, json};
use storefront::prelude::*;
use storefront_apps::models::{ShippingAddress, User};
use storefront_apps::shipping::{
	DeleteShippingAddressSerializer, ShippingAddressUpdateSerializer, shipping_addresses_for,
};
use storefront_integration_tests::{empty_store, register};

#[fixture]
fn db() -> Database {
	let db = empty_store();
	register(&db, "John", "john@example.com");
	register(&db, "Jane", "jane@example.com");
	db
}

fn add_address(db: &Database, user_id: i64, city: &str, is_default: bool) -> ShippingAddress {
	let mut serializer = ShippingAddressCreateSerializer::from_data(
		db,
		json!({
			"user_id": user_id,
			"address": format!("1 Main St, {city}"),
			"city": city,
			"country": "Egypt",
			"default": is_default,
		}),
	)
	.unwrap();
	assert!(serializer.is_valid().unwrap(), "{:?}", serializer.errors());
	serializer.save().unwrap()
}

fn default_ids(db: &Database, user_id: i64) -> Vec<i64> {
	db.filter::<ShippingAddress, _>(|a| a.user_id == Some(user_id) && a.is_default)
		.unwrap()
		.into_iter()
		.filter_map(|a| a.id)
		.collect()
}

#[rstest]
fn test_exactly_one_default_per_user(db: Database) {
	add_address(&db, 1, "Cairo", true);
	add_address(&db, 2, "Leeds", true);
	add_address(&db, 1, "Giza", false);
	let latest = add_address(&db, 1, "Alexandria", true);

	assert_eq!(default_ids(&db, 1), vec![latest.id.unwrap()]);
	assert_eq!(default_ids(&db, 2), vec![2]);

	let john = db.get::<User>(1).unwrap().unwrap();
	assert_eq!(john.default_address(&db).unwrap().map(|a| a.city), Some("Alexandria".to_string()));
}

#[rstest]
fn test_update_moves_the_default(db: Database) {
	add_address(&db, 1, "Cairo", true);
	add_address(&db, 1, "Giza", false);

	let mut update = ShippingAddressUpdateSerializer::from_data(
		&db,
		json!({
			"id": 2,
			"user_id": 1,
			"address": "2 Pyramid Rd",
			"city": "Giza",
			"state": "N/A",
			"country": "Egypt",
			"default": true,
		}),
	)
	.unwrap();
	assert!(update.is_valid().unwrap(), "{:?}", update.errors());
	let updated = update.save().unwrap();

	assert_eq!(updated.id, Some(2));
	assert_eq!(updated.address, "2 Pyramid Rd");
	assert_eq!(default_ids(&db, 1), vec![2]);
	assert_eq!(db.count::<ShippingAddress>().unwrap(), 2);
}

#[rstest]
fn test_listing_and_delete(db: Database) {
	add_address(&db, 1, "Cairo", true);
	add_address(&db, 1, "Giza", false);

	let john = db.get::<User>(1).unwrap().unwrap();
	let listed = shipping_addresses_for(&db, &john).unwrap();
	let cities: Vec<&Value> = listed
		.as_array()
		.unwrap()
		.iter()
		.map(|a| &a["city"])
		.collect();
	assert_eq!(cities, vec![&json!("Cairo"), &json!("Giza")]);

	let mut delete =
		DeleteShippingAddressSerializer::from_data(&db, json!({"user_id": 1, "id": 1})).unwrap();
	assert!(delete.is_valid().unwrap(), "{:?}", delete.errors());
	delete.delete().unwrap();

	assert!(!db.exists::<ShippingAddress>(1).unwrap());
	assert_eq!(john.shipping_addresses(&db).unwrap().len(), 1);
}

#[rstest]
fn test_foreign_address_is_not_found(db: Database) {
	add_address(&db, 2, "Leeds", false);

	let mut delete =
		DeleteShippingAddressSerializer::from_data(&db, json!({"user_id": 1, "id": 1})).unwrap();
	assert!(!delete.is_valid().unwrap());
	let entry = &delete.errors()[0];
	assert_eq!(entry.message, "Shipping Address not found among User Addresses");
	assert_eq!(entry.kind, ErrorKind::NotFound);
	assert!(db.exists::<ShippingAddress>(1).unwrap());
}
