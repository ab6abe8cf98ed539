use super::{Order, User, model_identity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_db::{Attribute, Connection, ConnectionExt, DatabaseResult, Model};

fn default_currency() -> String {
	"$".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
	pub id: Option<i64>,
	/// Amount in the smallest currency unit
	pub amount: i64,
	pub order_id: i64,
	#[serde(default)]
	pub user_id: Option<i64>,
	pub payment_method: String,
	pub payment_status: String,
	#[serde(default = "default_currency")]
	pub currency: String,
	#[serde(default = "Utc::now")]
	pub created_at: DateTime<Utc>,
	#[serde(default = "Utc::now")]
	pub updated_at: DateTime<Utc>,
}

impl Model for Payment {
	fn table_name() -> &'static str {
		"payments"
	}

	fn columns() -> &'static [&'static str] {
		&[
			"id",
			"amount",
			"order_id",
			"user_id",
			"payment_method",
			"payment_status",
			"currency",
			"created_at",
			"updated_at",
		]
	}

	fn relations() -> &'static [&'static str] {
		&["order", "user"]
	}

	/// One payment per order
	fn unique_columns() -> &'static [&'static str] {
		&["order_id"]
	}

	model_identity!();

	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		let attribute = match name {
			"order" => Attribute::one(conn.get::<Order>(self.order_id)?),
			"user" => match self.user_id {
				Some(id) => Attribute::one(conn.get::<User>(id)?),
				None => Attribute::One(None),
			},
			_ => return Ok(None),
		};
		Ok(Some(attribute))
	}
}
