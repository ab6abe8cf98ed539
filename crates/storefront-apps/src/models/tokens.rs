use super::{User, model_identity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_db::{Attribute, Connection, ConnectionExt, DatabaseResult, Model};

/// A revoked access/refresh token pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistedToken {
	pub id: Option<i64>,
	pub access: String,
	pub refresh: String,
	pub user_id: i64,
}

impl Model for BlacklistedToken {
	fn table_name() -> &'static str {
		"blacklisted_tokens"
	}

	fn columns() -> &'static [&'static str] {
		&["id", "access", "refresh", "user_id"]
	}

	fn relations() -> &'static [&'static str] {
		&["user"]
	}

	fn unique_columns() -> &'static [&'static str] {
		&["access", "refresh"]
	}

	model_identity!();

	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		match name {
			"user" => Ok(Some(Attribute::one(conn.get::<User>(self.user_id)?))),
			_ => Ok(None),
		}
	}
}

impl BlacklistedToken {
	/// Check if either token of a pair has been revoked
	pub fn is_revoked(conn: &dyn Connection, token: &str) -> DatabaseResult<bool> {
		let token = Value::from(token);
		Ok(conn.find_by::<BlacklistedToken>("access", &token)?.is_some()
			|| conn.find_by::<BlacklistedToken>("refresh", &token)?.is_some())
	}
}
