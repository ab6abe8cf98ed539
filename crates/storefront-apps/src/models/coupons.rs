use super::{Order, User, model_identity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_db::{Attribute, Connection, ConnectionExt, DatabaseResult, Model};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
	pub id: Option<i64>,
	pub code: String,
	pub discount: f64,
	pub expiration_date: DateTime<Utc>,
}

impl Model for Coupon {
	fn table_name() -> &'static str {
		"coupons"
	}

	fn columns() -> &'static [&'static str] {
		&["id", "code", "discount", "expiration_date"]
	}

	fn relations() -> &'static [&'static str] {
		&["users", "orders"]
	}

	fn unique_columns() -> &'static [&'static str] {
		&["code"]
	}

	model_identity!();

	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		let attribute = match name {
			"users" => {
				let links = conn.filter::<UserCoupon, _>(|l| Some(l.coupon_id) == self.id)?;
				let mut users = Vec::with_capacity(links.len());
				for link in links {
					if let Some(user) = conn.get::<User>(link.user_id)? {
						users.push(user);
					}
				}
				Attribute::many(users)
			}
			"orders" => Attribute::many(conn.filter::<Order, _>(|o| {
				o.coupon_id.is_some() && o.coupon_id == self.id
			})?),
			_ => return Ok(None),
		};
		Ok(Some(attribute))
	}
}

impl Coupon {
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expiration_date <= now
	}

	/// Hand the coupon to `user`
	pub fn grant(&self, conn: &dyn Connection, user: &User) -> DatabaseResult<UserCoupon> {
		let mut link = UserCoupon {
			id: None,
			user_id: user.id.unwrap_or_default(),
			coupon_id: self.id.unwrap_or_default(),
		};
		conn.insert(&mut link)?;
		Ok(link)
	}
}

/// Junction between users and the coupons they hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCoupon {
	pub id: Option<i64>,
	pub user_id: i64,
	pub coupon_id: i64,
}

impl Model for UserCoupon {
	fn table_name() -> &'static str {
		"user_coupons"
	}

	fn columns() -> &'static [&'static str] {
		&["id", "user_id", "coupon_id"]
	}

	model_identity!();
}
