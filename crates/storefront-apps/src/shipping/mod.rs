//! Shipping addresses of a user
//!
//! A user has at most one default address. Creating or updating an address
//! with `default` set clears the flag on the previous default inside the same
//! transaction as the write.

mod schema;
mod serializers;

pub use schema::{CreateShippingAddress, UpdateShippingAddress};
pub use serializers::{
	DeleteShippingAddressSerializer, ShippingAddressCreateSerializer, ShippingAddressSerializer,
	ShippingAddressUpdateSerializer, shipping_addresses_for,
};
