//! Strict shapes of shipping address input

use serde::{Deserialize, Serialize};
use validator::Validate;

fn not_available() -> String {
	"N/A".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateShippingAddress {
	pub user_id: i64,
	#[validate(length(min = 1, message = "Address cannot be empty"))]
	pub address: String,
	#[validate(length(min = 1, message = "City cannot be empty"))]
	pub city: String,
	#[serde(default = "not_available")]
	pub state: String,
	#[validate(length(min = 1, message = "Country cannot be empty"))]
	pub country: String,
	#[serde(rename = "default", default)]
	pub is_default: bool,
}

/// Every column is required on update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateShippingAddress {
	pub id: i64,
	pub user_id: i64,
	#[validate(length(min = 1, message = "Address cannot be empty"))]
	pub address: String,
	#[validate(length(min = 1, message = "City cannot be empty"))]
	pub city: String,
	pub state: String,
	#[validate(length(min = 1, message = "Country cannot be empty"))]
	pub country: String,
	#[serde(rename = "default")]
	pub is_default: bool,
}
