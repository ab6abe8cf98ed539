use super::{Coupon, Payment, Product, ShippingAddress, User, model_identity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_db::{Attribute, Connection, ConnectionExt, DatabaseResult, Model};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	pub id: Option<i64>,
	#[serde(default = "Utc::now")]
	pub order_date: DateTime<Utc>,
	pub total_amount: f64,
	pub status: String,
	#[serde(default)]
	pub user_id: Option<i64>,
	#[serde(default)]
	pub shipping_address_id: Option<i64>,
	#[serde(default)]
	pub payment_id: Option<i64>,
	#[serde(default)]
	pub coupon_id: Option<i64>,
}

impl Model for Order {
	fn table_name() -> &'static str {
		"orders"
	}

	fn columns() -> &'static [&'static str] {
		&[
			"id",
			"order_date",
			"total_amount",
			"status",
			"user_id",
			"shipping_address_id",
			"payment_id",
			"coupon_id",
		]
	}

	fn relations() -> &'static [&'static str] {
		&["user", "shipping_address", "products", "payment", "coupon"]
	}

	model_identity!();

	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		let attribute = match name {
			"user" => Attribute::one(fetch::<User>(conn, self.user_id)?),
			"shipping_address" => {
				Attribute::one(fetch::<ShippingAddress>(conn, self.shipping_address_id)?)
			}
			"products" => Attribute::many(self.products(conn)?),
			"payment" => match self.id {
				Some(id) => Attribute::one(conn.find_by::<Payment>("order_id", &Value::from(id))?),
				None => Attribute::One(None),
			},
			"coupon" => Attribute::one(fetch::<Coupon>(conn, self.coupon_id)?),
			_ => return Ok(None),
		};
		Ok(Some(attribute))
	}
}

fn fetch<M: Model>(conn: &dyn Connection, id: Option<i64>) -> DatabaseResult<Option<M>> {
	match id {
		Some(id) => conn.get::<M>(id),
		None => Ok(None),
	}
}

impl Order {
	/// Products of the order, one entry per linked product
	pub fn products(&self, conn: &dyn Connection) -> DatabaseResult<Vec<Product>> {
		let links = conn.filter::<OrderProduct, _>(|l| Some(l.order_id) == self.id)?;
		let mut products = Vec::with_capacity(links.len());
		for link in links {
			if let Some(product) = conn.get::<Product>(link.product_id)? {
				products.push(product);
			}
		}
		Ok(products)
	}

	/// Link `product` to this order
	pub fn add_product(
		&self,
		conn: &dyn Connection,
		product: &Product,
		quantity: i64,
	) -> DatabaseResult<OrderProduct> {
		let mut link = OrderProduct {
			id: None,
			order_id: self.id.unwrap_or_default(),
			product_id: product.id.unwrap_or_default(),
			quantity,
		};
		conn.insert(&mut link)?;
		Ok(link)
	}
}

/// Junction between orders and products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProduct {
	pub id: Option<i64>,
	pub order_id: i64,
	pub product_id: i64,
	#[serde(default = "one")]
	pub quantity: i64,
}

fn one() -> i64 {
	1
}

impl Model for OrderProduct {
	fn table_name() -> &'static str {
		"order_product"
	}

	fn columns() -> &'static [&'static str] {
		&["id", "order_id", "product_id", "quantity"]
	}

	model_identity!();
}
