//! Catalog management and the product listing query

use rstest::*;
use serde_json::json;
use storefront::prelude::*;
use storefront_apps::models::Product;
use storefront_apps::products::{
	CreateProductSerializer, GetProductSerializer, all_categories, list_products,
};
use storefront_integration_tests::{empty_store, raw_query, seed_categories};

#[fixture]
fn shop() -> Database {
	let db = empty_store();
	seed_categories(&db, &["Consoles", "Games"]);
	for (name, price, category_id) in [
		("PS5 Console", 499, 1),
		("DualSense", 69, 1),
		("Astro Bot", 59, 2),
	] {
		let mut create = CreateProductSerializer::from_data(
			&db,
			json!({
				"name": name,
				"price": price,
				"description": null,
				"stock": 3,
				"category_id": category_id,
				"image_url": format!("https://cdn.example.com/{}.png", name.replace(' ', "-").to_lowercase()),
			}),
		)
		.unwrap();
		assert!(create.is_valid().unwrap(), "{:?}", create.errors());
		create.save().unwrap();
	}
	db
}

#[rstest]
fn test_categories_are_listed(shop: Database) {
	assert_eq!(
		all_categories(&shop).unwrap(),
		json!([{"id": 1, "name": "Consoles"}, {"id": 2, "name": "Games"}])
	);
}

#[rstest]
fn test_listing_filters_sorts_and_nests_category(shop: Database) {
	let listed = list_products(
		&shop,
		&raw_query(json!({"category": 1, "sort_by": "price_desc"})),
	)
	.unwrap();

	let names: Vec<_> = listed
		.as_array()
		.unwrap()
		.iter()
		.map(|p| p["name"].clone())
		.collect();
	assert_eq!(names, vec![json!("PS5 Console"), json!("DualSense")]);
	assert_eq!(listed[0]["category"], json!({"id": 1, "name": "Consoles"}));
}

#[rstest]
fn test_bad_query_is_rejected_with_entries(shop: Database) {
	let err = list_products(&shop, &raw_query(json!({"sort_by": "rating"}))).unwrap_err();
	let Some(AppError::InvalidQuery(entries)) = err.downcast_ref::<AppError>() else {
		panic!("expected an invalid query, got {err:?}");
	};
	assert_eq!(entries[0].kind, ErrorKind::SchemaError);
}

#[rstest]
fn test_get_product_by_identifier(shop: Database) {
	let mut get = GetProductSerializer::from_data(&shop, json!({"id": 3})).unwrap();
	assert!(get.is_valid().unwrap());
	assert_eq!(get.data().unwrap()["name"], "Astro Bot");

	let mut missing = GetProductSerializer::from_data(&shop, json!({"id": 30})).unwrap();
	assert!(!missing.is_valid().unwrap());
	assert_eq!(missing.errors()[0].message, "Product does not exist");
	assert_eq!(missing.errors()[0].kind, ErrorKind::NotFound);
	assert_eq!(shop.count::<Product>().unwrap(), 3);
}
