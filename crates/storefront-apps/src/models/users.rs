use super::{Coupon, Order, ShippingAddress, UserCoupon, model_identity};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_auth::{Argon2Hasher, PasswordHasher};
use storefront_db::{
	Attribute, Connection, ConnectionExt, DatabaseResult, ID_FIELD, Model, Row,
};

fn active_default() -> bool {
	true
}

/// A storefront account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
	pub id: Option<i64>,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	/// Argon2 PHC string, never the plaintext
	pub password: String,
	#[serde(default)]
	pub is_staff: bool,
	#[serde(default)]
	pub is_admin: bool,
	#[serde(default = "active_default")]
	pub active: bool,
	#[serde(default = "Utc::now")]
	pub last_login: DateTime<Utc>,
	#[serde(default = "Utc::now")]
	pub created_at: DateTime<Utc>,
	#[serde(default = "Utc::now")]
	pub updated_at: DateTime<Utc>,
}

impl Model for User {
	fn table_name() -> &'static str {
		"user"
	}

	fn columns() -> &'static [&'static str] {
		&[
			"id",
			"first_name",
			"last_name",
			"email",
			"password",
			"is_staff",
			"is_admin",
			"active",
			"last_login",
			"created_at",
			"updated_at",
		]
	}

	fn relations() -> &'static [&'static str] {
		&["shipping_addresses", "orders", "coupons"]
	}

	fn unique_columns() -> &'static [&'static str] {
		&["email"]
	}

	model_identity!();

	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		let attribute = match name {
			"shipping_addresses" => Attribute::many(self.shipping_addresses(conn)?),
			"orders" => Attribute::many(conn.filter::<Order, _>(|o| o.user_id == self.id)?),
			"coupons" => {
				let links = conn.filter::<UserCoupon, _>(|l| Some(l.user_id) == self.id)?;
				let mut coupons = Vec::with_capacity(links.len());
				for link in links {
					if let Some(coupon) = conn.get::<Coupon>(link.coupon_id)? {
						coupons.push(coupon);
					}
				}
				Attribute::many(coupons)
			}
			_ => return Ok(None),
		};
		Ok(Some(attribute))
	}
}

impl User {
	/// Create a user from validated registration data, hashing the password
	///
	/// Fails with [`AppError::ExistingEmail`] when the email is taken.
	pub fn create_user(conn: &dyn Connection, data: &Row) -> AppResult<User> {
		Self::create_user_with(conn, data, &Argon2Hasher::new())
	}

	pub fn create_user_with(
		conn: &dyn Connection,
		data: &Row,
		hasher: &dyn PasswordHasher,
	) -> AppResult<User> {
		let email = data.get("email").cloned().unwrap_or(Value::Null);
		if conn.find_by::<User>("email", &email)?.is_some() {
			return Err(AppError::ExistingEmail(
				email.as_str().unwrap_or_default().to_string(),
			));
		}

		let mut row = data.clone();
		row.shift_remove(ID_FIELD);
		if let Some(Value::String(plain)) = row.get("password") {
			let hashed = hasher.hash(plain)?;
			row.insert("password".to_string(), Value::String(hashed));
		}

		let mut user = User::from_row(row)?;
		conn.insert(&mut user)?;
		Ok(user)
	}

	pub fn check_password(&self, password: &str) -> AppResult<bool> {
		Ok(Argon2Hasher::new().verify(password, &self.password)?)
	}

	pub fn update_last_login(&mut self, conn: &dyn Connection) -> DatabaseResult<()> {
		self.last_login = Utc::now();
		conn.update(self)
	}

	pub fn shipping_addresses(&self, conn: &dyn Connection) -> DatabaseResult<Vec<ShippingAddress>> {
		conn.filter::<ShippingAddress, _>(|a| a.user_id == self.id)
	}

	/// The address flagged as default, if any
	pub fn default_address(&self, conn: &dyn Connection) -> DatabaseResult<Option<ShippingAddress>> {
		Ok(self
			.shipping_addresses(conn)?
			.into_iter()
			.find(|a| a.is_default))
	}
}
