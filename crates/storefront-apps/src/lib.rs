//! # Storefront Apps
//!
//! The storefront's record types and the serializers built on them.
//!
//! ## Features
//!
//! - **Users**: registration with hashed passwords, login, profile updates, token blacklist
//! - **Shipping addresses**: one default address per user, switched transactionally
//! - **Catalog**: categories, products and the product listing query
//! - **Orders**: orders with nested products, payments and coupons
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use storefront_apps::models;
//! use storefront_apps::users::UserRegisterSerializer;
//! use storefront_serializers::Serializer;
//!
//! let db = models::database();
//! let mut register = UserRegisterSerializer::from_data(
//!     &db,
//!     json!({
//!         "first_name": "John",
//!         "last_name": "Doe",
//!         "email": "john@example.com",
//!         "password": "Passw0rd",
//!     }),
//! )
//! .unwrap();
//!
//! assert!(register.is_valid().unwrap());
//! let user = register.save().unwrap();
//! assert_ne!(user.password, "Passw0rd");
//! assert_eq!(
//!     register.data().unwrap(),
//!     json!({"first_name": "John", "email": "john@example.com", "last_name": "Doe"})
//! );
//! ```
//!
//! ## Architecture
//!
//! - [`models`]: record types and table registration
//! - [`users`], [`shipping`], [`products`], [`orders`]: serializers per area
//! - [`config`]: process-wide application configuration
//! - [`error`]: [`AppError`]

pub mod config;
pub mod error;
pub mod models;
pub mod orders;
pub mod products;
pub mod shipping;
pub mod users;

pub use error::{AppError, AppResult};

/// Install logging and the application configuration from settings
///
/// Returns whether this call installed the configuration.
pub fn init(settings: &storefront_conf::Settings) -> Result<bool, storefront_conf::SettingsError> {
	storefront_conf::logging::init(&settings.logging)?;
	Ok(config::init(settings))
}
