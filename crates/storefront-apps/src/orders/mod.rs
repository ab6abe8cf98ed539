//! Orders with their products, payments and coupons

use crate::models::{Coupon, Order, Payment};
use crate::products::ProductSerializer;
use crate::shipping::ShippingAddressSerializer;
use storefront_serializers::{MetaConfig, NestedSerializers, Serializer, SerializerKind};

/// Order with its products and shipping address expanded; the user stays an identifier
pub struct OrderSerializer;

impl Serializer for OrderSerializer {
	type Model = Order;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::new([
			"id",
			"order_date",
			"total_amount",
			"status",
			"user",
			"shipping_address",
			"products",
		])
	}

	fn nested(nested: &mut NestedSerializers) {
		nested
			.add::<ProductSerializer>("products")
			.add::<ShippingAddressSerializer>("shipping_address");
	}
}

pub struct PaymentSerializer;

impl Serializer for PaymentSerializer {
	type Model = Payment;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::new([
			"id",
			"amount",
			"currency",
			"payment_method",
			"payment_status",
			"user_id",
			"order",
		])
	}

	fn nested(nested: &mut NestedSerializers) {
		nested.add::<OrderSerializer>("order");
	}
}

/// Coupon with the identifiers of the users holding it
pub struct CouponSerializer;

impl Serializer for CouponSerializer {
	type Model = Coupon;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::new(["id", "code", "discount", "expiration_date", "users"])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::{Category, Product, ShippingAddress, User, UserCoupon, database};
	use chrono::{Duration, TimeZone, Utc};
	use rstest::*;
	use serde_json::json;
	use storefront_db::{ConnectionExt, Database};

	struct Fixture {
		db: Database,
		order: Order,
	}

	#[fixture]
	fn placed() -> Fixture {
		let db = database();
		let now = Utc::now();
		let mut user = User {
			id: None,
			first_name: "John".to_string(),
			last_name: "Doe".to_string(),
			email: "john@example.com".to_string(),
			password: "not-a-hash".to_string(),
			is_staff: false,
			is_admin: false,
			active: true,
			last_login: now,
			created_at: now,
			updated_at: now,
		};
		db.insert(&mut user).unwrap();

		let mut address = ShippingAddress {
			id: None,
			user_id: user.id,
			address: "1 Nile St".to_string(),
			city: "Cairo".to_string(),
			state: "N/A".to_string(),
			country: "Egypt".to_string(),
			is_default: true,
		};
		db.insert(&mut address).unwrap();

		let mut category = Category {
			id: None,
			name: "Games".to_string(),
		};
		db.insert(&mut category).unwrap();

		let mut product = Product {
			id: None,
			name: "Astro Bot".to_string(),
			description: None,
			price: 59.0,
			discount: 0.0,
			stock: 5,
			image_url: "https://cdn.example.com/astro.png".to_string(),
			is_sale: false,
			created_at: now,
			updated_at: now,
			category_id: 1,
		};
		db.insert(&mut product).unwrap();

		let mut order = Order {
			id: None,
			order_date: now,
			total_amount: 59.0,
			status: "pending".to_string(),
			user_id: user.id,
			shipping_address_id: address.id,
			payment_id: None,
			coupon_id: None,
		};
		db.insert(&mut order).unwrap();
		order.add_product(&db, &product, 1).unwrap();

		Fixture { db, order }
	}

	#[rstest]
	fn test_order_expands_products_and_address(placed: Fixture) {
		let data = OrderSerializer::from_instance(&placed.db, placed.order)
			.unwrap()
			.data()
			.unwrap();

		assert_eq!(data["user"], json!(1));
		assert_eq!(data["status"], "pending");
		assert_eq!(data["products"][0]["name"], "Astro Bot");
		assert_eq!(data["products"][0]["category"], json!({"id": 1, "name": "Games"}));
		assert_eq!(data["shipping_address"]["city"], "Cairo");
		assert_eq!(data["shipping_address"]["user"]["email"], "john@example.com");
	}

	#[rstest]
	fn test_payment_nests_order(placed: Fixture) {
		let mut payment = Payment {
			id: None,
			amount: 5900,
			order_id: 1,
			user_id: Some(1),
			payment_method: "card".to_string(),
			payment_status: "paid".to_string(),
			currency: "$".to_string(),
			created_at: Utc::now(),
			updated_at: Utc::now(),
		};
		placed.db.insert(&mut payment).unwrap();

		let data = PaymentSerializer::from_instance(&placed.db, payment)
			.unwrap()
			.data()
			.unwrap();
		assert_eq!(data["amount"], 5900);
		assert_eq!(data["order"]["id"], 1);
		assert_eq!(data["order"]["products"][0]["id"], 1);

		let mut second = placed.db.get::<Payment>(1).unwrap().unwrap();
		second.id = None;
		let err = placed.db.insert(&mut second).unwrap_err();
		assert!(err.is_unique_violation());
	}

	#[rstest]
	fn test_coupon_lists_holders(placed: Fixture) {
		let expires = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
		let mut coupon = Coupon {
			id: None,
			code: "SPRING".to_string(),
			discount: 10.0,
			expiration_date: expires,
		};
		placed.db.insert(&mut coupon).unwrap();
		let user = placed.db.get::<User>(1).unwrap().unwrap();
		coupon.grant(&placed.db, &user).unwrap();

		let data = CouponSerializer::from_instance(&placed.db, coupon.clone())
			.unwrap()
			.data()
			.unwrap();
		assert_eq!(data["users"], json!([1]));
		assert_eq!(placed.db.count::<UserCoupon>().unwrap(), 1);
		assert!(!coupon.is_expired(expires - Duration::days(1)));
		assert!(coupon.is_expired(expires));
	}
}
