use super::{User, model_identity};
use serde::{Deserialize, Serialize};
use storefront_db::{Attribute, Connection, ConnectionExt, DatabaseResult, Model};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
	pub id: Option<i64>,
	#[serde(default)]
	pub user_id: Option<i64>,
	pub address: String,
	pub city: String,
	pub state: String,
	pub country: String,
	/// Stored in the `default` column
	#[serde(rename = "default", default)]
	pub is_default: bool,
}

impl Model for ShippingAddress {
	fn table_name() -> &'static str {
		"shipping_address"
	}

	fn columns() -> &'static [&'static str] {
		&["id", "user_id", "address", "city", "state", "country", "default"]
	}

	fn relations() -> &'static [&'static str] {
		&["user"]
	}

	model_identity!();

	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		match name {
			"user" => {
				let user = match self.user_id {
					Some(id) => conn.get::<User>(id)?,
					None => None,
				};
				Ok(Some(Attribute::one(user)))
			}
			_ => Ok(None),
		}
	}
}

impl ShippingAddress {
	/// Unset the default flag on every other address of `user_id`
	pub fn clear_default(
		conn: &dyn Connection,
		user_id: i64,
		keep: Option<i64>,
	) -> DatabaseResult<usize> {
		let previous = conn.filter::<ShippingAddress, _>(|a| {
			a.user_id == Some(user_id) && a.is_default && a.id != keep
		})?;
		for mut address in previous.iter().cloned() {
			address.is_default = false;
			conn.update(&address)?;
		}
		Ok(previous.len())
	}
}
