use super::{Order, OrderProduct, model_identity};
use crate::config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_db::{Attribute, Connection, ConnectionExt, DatabaseResult, Model};

fn default_image_url() -> String {
	config::get().default_image().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
	pub id: Option<i64>,
	pub name: String,
}

impl Model for Category {
	fn table_name() -> &'static str {
		"category"
	}

	fn columns() -> &'static [&'static str] {
		&["id", "name"]
	}

	model_identity!();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
	pub id: Option<i64>,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	pub price: f64,
	/// Percentage between 0 and 100
	#[serde(default)]
	pub discount: f64,
	pub stock: i64,
	#[serde(default = "default_image_url")]
	pub image_url: String,
	#[serde(default)]
	pub is_sale: bool,
	#[serde(default = "Utc::now")]
	pub created_at: DateTime<Utc>,
	#[serde(default = "Utc::now")]
	pub updated_at: DateTime<Utc>,
	pub category_id: i64,
}

impl Model for Product {
	fn table_name() -> &'static str {
		"product"
	}

	fn columns() -> &'static [&'static str] {
		&[
			"id",
			"name",
			"description",
			"price",
			"discount",
			"stock",
			"image_url",
			"is_sale",
			"created_at",
			"updated_at",
			"category_id",
		]
	}

	fn relations() -> &'static [&'static str] {
		&["category", "orders"]
	}

	model_identity!();

	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		let attribute = match name {
			"category" => Attribute::one(conn.get::<Category>(self.category_id)?),
			"orders" => {
				let links = conn.filter::<OrderProduct, _>(|l| Some(l.product_id) == self.id)?;
				let mut orders = Vec::with_capacity(links.len());
				for link in links {
					if let Some(order) = conn.get::<Order>(link.order_id)? {
						orders.push(order);
					}
				}
				Attribute::many(orders)
			}
			_ => return Ok(None),
		};
		Ok(Some(attribute))
	}
}

impl Product {
	/// Price after the discount percentage
	pub fn sale_price(&self) -> f64 {
		self.price * (100.0 - self.discount.clamp(0.0, 100.0)) / 100.0
	}
}
