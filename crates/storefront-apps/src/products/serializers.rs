use super::query::ProductsQuery;
use crate::config;
use crate::models::{Category, Product};
use serde_json::Value;
use storefront_db::{Connection, ConnectionExt};
use storefront_serializers::{
	Data, FieldError, FieldValidators, MetaConfig, NestedSerializers, Representer, Serializer,
	SerializerKind, SerializerResult, ValidationContext,
};
use storefront_validators::value::{expect_f64, expect_i64, expect_str};
use storefront_validators::{ImageUrlValidator, LengthValidator, ValidationError, Validator};

const NAME_MIN_LENGTH: usize = 3;
const NAME_MAX_LENGTH: usize = 255;

fn product_named(conn: &dyn Connection, name: &Value) -> Result<Option<Product>, FieldError> {
	Ok(conn.find_by::<Product>("name", name)?)
}

fn validate_product_name(value: &Value) -> Result<(), FieldError> {
	LengthValidator::new("Name", NAME_MIN_LENGTH, NAME_MAX_LENGTH).validate(expect_str(value)?)?;
	Ok(())
}

fn validate_price(
	_ctx: &mut ValidationContext<'_, Product>,
	value: Value,
) -> Result<Value, FieldError> {
	if expect_f64(&value)? < 0.0 {
		return Err(FieldError::value("Price cannot be negative"));
	}
	Ok(value)
}

fn validate_stock(
	_ctx: &mut ValidationContext<'_, Product>,
	value: Value,
) -> Result<Value, FieldError> {
	if expect_i64(&value)? <= 0 {
		return Err(FieldError::value("Stock must be more than 0"));
	}
	Ok(value)
}

fn validate_description(
	_ctx: &mut ValidationContext<'_, Product>,
	value: Value,
) -> Result<Value, FieldError> {
	if !value.is_null() {
		expect_str(&value)?;
	}
	Ok(value)
}

fn validate_category_id(
	ctx: &mut ValidationContext<'_, Product>,
	value: Value,
) -> Result<Value, FieldError> {
	let id = expect_i64(&value)?;
	if !ctx.conn().exists::<Category>(id)? {
		return Err(FieldError::not_found("Category does not exist"));
	}
	Ok(value)
}

/// `null` becomes the configured default image, anything else must be an
/// https URL of a jpg/jpeg/png
fn image_url_or_default(value: Value) -> Result<Value, FieldError> {
	if value.is_null() {
		return Ok(Value::String(config::get().default_image().to_string()));
	}
	ImageUrlValidator::new().validate(expect_str(&value)?)?;
	Ok(value)
}

fn validate_product_id(
	ctx: &mut ValidationContext<'_, Product>,
	value: Value,
) -> Result<Product, FieldError> {
	let id = value.as_i64().ok_or(ValidationError::InvalidId)?;
	ctx.conn()
		.get::<Product>(id)?
		.ok_or_else(|| FieldError::not_found("Product does not exist"))
}

pub struct CategorySerializer;

impl Serializer for CategorySerializer {
	type Model = Category;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::new(["id", "name"])
	}
}

/// Every category, represented with `many = true`
pub fn all_categories(conn: &dyn Connection) -> SerializerResult<Value> {
	CategorySerializer::from_instances(conn, conn.all::<Category>()?)?.data()
}

pub struct CreateCategorySerializer;

impl Serializer for CreateCategorySerializer {
	type Model = Category;

	fn meta() -> MetaConfig {
		MetaConfig::new(["name"])
	}

	fn validators(v: &mut FieldValidators<Category>) {
		v.add("name", |ctx, value| {
			expect_str(&value)?;
			if ctx.conn().find_by::<Category>("name", &value)?.is_some() {
				return Err(FieldError::value("Category already exists"));
			}
			Ok(value)
		});
	}
}

pub struct DeleteCategorySerializer;

impl Serializer for DeleteCategorySerializer {
	type Model = Category;

	fn meta() -> MetaConfig {
		MetaConfig::new(["id"])
	}

	fn validators(v: &mut FieldValidators<Category>) {
		v.add("id", |ctx, value| {
			let id = value.as_i64().ok_or(ValidationError::InvalidId)?;
			let category = ctx
				.conn()
				.get::<Category>(id)?
				.ok_or_else(|| FieldError::not_found("Category does not exist"))?;
			ctx.set_instance(category);
			Ok(value)
		});
	}
}

/// Product with its category nested
pub struct ProductSerializer;

impl Serializer for ProductSerializer {
	type Model = Product;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::new([
			"id",
			"name",
			"price",
			"description",
			"stock",
			"image_url",
			"category",
		])
	}

	fn nested(nested: &mut NestedSerializers) {
		nested.add::<CategorySerializer>("category");
	}
}

/// Run a listing query and represent the page with [`ProductSerializer`]
///
/// A rejected query surfaces as a custom error holding
/// [`AppError::InvalidQuery`](crate::error::AppError::InvalidQuery).
pub fn list_products(conn: &dyn Connection, raw: &Data) -> SerializerResult<Value> {
	let products = ProductsQuery::parse(raw)?.apply(conn)?;
	ProductSerializer::from_instances(conn, products)?.data()
}

/// Lookup by identifier; represents as [`ProductSerializer`] and supports `delete()`
pub struct GetProductSerializer;

impl Serializer for GetProductSerializer {
	type Model = Product;

	fn meta() -> MetaConfig {
		MetaConfig::new(["id"])
	}

	fn validators(v: &mut FieldValidators<Product>) {
		v.add("id", |ctx, value| {
			let product = validate_product_id(ctx, value.clone())?;
			ctx.set_instance(product);
			Ok(value)
		});
	}

	fn represent(repr: &Representer<'_>, record: &Product) -> SerializerResult<Value> {
		ProductSerializer::from_instance(repr.conn(), record.clone())?.data()
	}
}

pub struct CreateProductSerializer;

impl Serializer for CreateProductSerializer {
	type Model = Product;

	fn meta() -> MetaConfig {
		MetaConfig::new([
			"name",
			"price",
			"description",
			"stock",
			"category_id",
			"image_url",
		])
	}

	fn validators(v: &mut FieldValidators<Product>) {
		v.add("name", |ctx, value| {
			validate_product_name(&value)?;
			if product_named(ctx.conn(), &value)?.is_some() {
				return Err(FieldError::value("Product with the same name already exists"));
			}
			Ok(value)
		})
		.add("price", validate_price)
		.add("description", validate_description)
		.add("stock", validate_stock)
		.add("category_id", validate_category_id)
		.add("image_url", |_ctx, value| image_url_or_default(value));
	}
}

pub struct UpdateProductSerializer;

impl Serializer for UpdateProductSerializer {
	type Model = Product;

	fn meta() -> MetaConfig {
		MetaConfig::new([
			"id",
			"name",
			"description",
			"price",
			"stock",
			"category_id",
			"image_url",
		])
	}

	fn validators(v: &mut FieldValidators<Product>) {
		v.add("id", |ctx, value| {
			validate_product_id(ctx, value.clone())?;
			Ok(value)
		})
		.add("name", |ctx, value| {
			validate_product_name(&value)?;
			if product_named(ctx.conn(), &value)?.is_none() {
				return Err(FieldError::value("Product with that name does not exist"));
			}
			Ok(value)
		})
		.add("description", validate_description)
		.add("price", validate_price)
		.add("stock", validate_stock)
		.add("category_id", validate_category_id)
		.add("image_url", |ctx, value| {
			// An image already used by a product is kept as is
			if ctx.conn().find_by::<Product>("image_url", &value)?.is_some() {
				return Ok(value);
			}
			image_url_or_default(value)
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::AppError;
	use crate::models::database;
	use rstest::*;
	use serde_json::json;
	use storefront_db::Database;
	use storefront_serializers::ErrorKind;

	#[fixture]
	fn shop() -> Database {
		let db = database();
		let mut create = CreateCategorySerializer::from_data(&db, json!({"name": "Consoles"})).unwrap();
		assert!(create.is_valid().unwrap());
		create.save().unwrap();

		let mut product = CreateProductSerializer::from_data(
			&db,
			json!({
				"name": "PS5 Console",
				"price": 499.99,
				"description": "Next gen console",
				"stock": 10,
				"category_id": 1,
				"image_url": "https://cdn.example.com/ps5.png",
			}),
		)
		.unwrap();
		assert!(product.is_valid().unwrap(), "{:?}", product.errors());
		product.save().unwrap();
		db
	}

	#[rstest]
	fn test_product_nests_category(shop: Database) {
		let product = shop.get::<Product>(1).unwrap().unwrap();
		let data = ProductSerializer::from_instance(&shop, product).unwrap().data().unwrap();
		assert_eq!(
			data,
			json!({
				"id": 1,
				"name": "PS5 Console",
				"price": 499.99,
				"description": "Next gen console",
				"stock": 10,
				"image_url": "https://cdn.example.com/ps5.png",
				"category": {"id": 1, "name": "Consoles"},
			})
		);
	}

	#[rstest]
	fn test_create_product_uses_default_image(shop: Database) {
		let mut product = CreateProductSerializer::from_data(
			&shop,
			json!({"name": "DualSense", "price": 69, "stock": 4, "category_id": 1, "image_url": null}),
		)
		.unwrap();
		assert!(product.is_valid().unwrap(), "{:?}", product.errors());
		let saved = product.save().unwrap();
		assert_eq!(saved.image_url, config::get().default_image());
		assert_eq!(saved.description, None);
	}

	#[rstest]
	fn test_create_product_collects_every_failure(shop: Database) {
		let mut product = CreateProductSerializer::from_data(
			&shop,
			json!({
				"name": "PS5 Console",
				"price": -1,
				"stock": 0,
				"category_id": 42,
				"image_url": "http://cdn.example.com/ps5.gif",
			}),
		)
		.unwrap();

		assert!(!product.is_valid().unwrap());
		let failures: Vec<_> = product
			.errors()
			.iter()
			.map(|e| (e.field.as_deref().unwrap_or_default(), e.message.as_str(), e.kind))
			.collect();
		assert_eq!(
			failures,
			vec![
				("name", "Product with the same name already exists", ErrorKind::ValueError),
				("price", "Price cannot be negative", ErrorKind::ValueError),
				("stock", "Stock must be more than 0", ErrorKind::ValueError),
				("category_id", "Category does not exist", ErrorKind::NotFound),
				("image_url", "URL is not valid", ErrorKind::ValueError),
			]
		);
	}

	#[rstest]
	#[case("PS", "Name should be between 3 and 255 characters")]
	#[case("PS5 Console", "Product with the same name already exists")]
	fn test_create_product_name_rules(shop: Database, #[case] name: &str, #[case] message: &str) {
		let mut product = CreateProductSerializer::from_data(
			&shop,
			json!({"name": name, "price": 1, "stock": 1, "category_id": 1}),
		)
		.unwrap();
		assert!(!product.is_valid().unwrap());
		assert_eq!(product.errors()[0].message, message);
	}

	#[rstest]
	fn test_update_product_keeps_identifier(shop: Database) {
		let mut update = UpdateProductSerializer::from_data(
			&shop,
			json!({
				"id": 1,
				"name": "PS5 Console",
				"description": "Slim edition",
				"price": 449.0,
				"stock": 3,
				"category_id": 1,
				"image_url": "https://cdn.example.com/ps5.png",
			}),
		)
		.unwrap();
		assert!(update.is_valid().unwrap(), "{:?}", update.errors());

		let updated = update.save().unwrap();
		assert_eq!(updated.id, Some(1));
		assert_eq!(updated.price, 449.0);
		assert_eq!(updated.description.as_deref(), Some("Slim edition"));
		assert_eq!(shop.count::<Product>().unwrap(), 1);
	}

	#[rstest]
	fn test_get_product_represents_and_deletes(shop: Database) {
		let mut get = GetProductSerializer::from_data(&shop, json!({"id": 1})).unwrap();
		assert!(get.is_valid().unwrap());
		assert_eq!(get.data().unwrap()["category"]["name"], "Consoles");

		get.delete().unwrap();
		assert_eq!(shop.count::<Product>().unwrap(), 0);

		let mut missing = GetProductSerializer::from_data(&shop, json!({"id": 1})).unwrap();
		assert!(!missing.is_valid().unwrap());
		assert_eq!(missing.errors()[0].message, "Product does not exist");
		assert_eq!(missing.errors()[0].kind, ErrorKind::NotFound);
	}

	#[rstest]
	fn test_category_lifecycle(shop: Database) {
		let mut duplicate =
			CreateCategorySerializer::from_data(&shop, json!({"name": "Consoles"})).unwrap();
		assert!(!duplicate.is_valid().unwrap());
		assert_eq!(duplicate.errors()[0].message, "Category already exists");

		let mut delete = DeleteCategorySerializer::from_data(&shop, json!({"id": 1})).unwrap();
		assert!(delete.is_valid().unwrap());
		delete.delete().unwrap();
		assert_eq!(all_categories(&shop).unwrap(), json!([]));
	}

	#[rstest]
	fn test_list_products(shop: Database) {
		let raw = json!({"search": "console"});
		let page = list_products(&shop, raw.as_object().unwrap()).unwrap();
		assert_eq!(page.as_array().map(Vec::len), Some(1));

		let raw = json!({"sort_by": "cheapest"});
		let err = list_products(&shop, raw.as_object().unwrap()).unwrap_err();
		assert!(matches!(
			err.downcast_ref::<AppError>(),
			Some(AppError::InvalidQuery(entries)) if entries.len() == 1
		));
	}
}
