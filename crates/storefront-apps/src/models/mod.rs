//! Record types of the storefront
//!
//! Timestamps default to the current time and flags to their column
//! defaults, so records can be built from validated data that omits them.

mod coupons;
mod orders;
mod payments;
mod products;
mod shipping;
mod tokens;
mod users;

pub use coupons::{Coupon, UserCoupon};
pub use orders::{Order, OrderProduct};
pub use payments::Payment;
pub use products::{Category, Product};
pub use shipping::ShippingAddress;
pub use tokens::BlacklistedToken;
pub use users::User;

use storefront_db::Database;

/// `id()` / `set_id()` over an `id: Option<i64>` field
macro_rules! model_identity {
	() => {
		fn id(&self) -> Option<i64> {
			self.id
		}

		fn set_id(&mut self, id: i64) {
			self.id = Some(id);
		}
	};
}
pub(crate) use model_identity;

/// Register every storefront table with `db`
pub fn register_all(db: &Database) {
	db.register::<User>();
	db.register::<Category>();
	db.register::<Product>();
	db.register::<ShippingAddress>();
	db.register::<Order>();
	db.register::<OrderProduct>();
	db.register::<Payment>();
	db.register::<Coupon>();
	db.register::<UserCoupon>();
	db.register::<BlacklistedToken>();
}

/// A database with every storefront table registered
///
/// # Examples
///
/// ```
/// use storefront_apps::models;
///
/// let db = models::database();
/// assert!(db.table_names().contains(&"user"));
/// assert!(db.table_names().contains(&"order_product"));
/// ```
pub fn database() -> Database {
	let db = Database::new();
	register_all(&db);
	db
}
