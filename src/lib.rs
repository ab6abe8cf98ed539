//! # Storefront
//!
//! A declarative serializer and validation framework for an e-commerce backend.
//!
//! Serializers declare their fields, per-field validators and nested
//! representations; the framework runs the validation pipeline, produces
//! structured errors, persists accepted data and renders records back out.
//!
//! ## Feature Flags
//!
//! - `minimal` - storage, validators and serializers only
//! - `conf` - layered settings and logging initialisation
//! - `auth` - password hashing
//! - `apps` - the storefront's record types and serializers
//! - `full` (default) - everything above
//!
//! ## Quick Example
//!
//! ```rust
//! use storefront::prelude::*;
//! use serde_json::json;
//!
//! let db = storefront::apps::models::database();
//! let mut register = UserRegisterSerializer::from_data(
//!     &db,
//!     json!({
//!         "first_name": "Jane",
//!         "last_name": "Roe",
//!         "email": "jane@example.com",
//!         "password": "Secr3tpass",
//!     }),
//! )
//! .unwrap();
//!
//! assert!(register.is_valid().unwrap());
//! register.save().unwrap();
//! assert!(register.data().unwrap().get("password").is_none());
//! ```

/// In-memory relational storage and transactions
pub mod db {
	pub use storefront_db::*;
}

/// Value validators
pub mod validators {
	pub use storefront_validators::*;
}

/// Declarative serializers
pub mod serializers {
	pub use storefront_serializers::*;
}

/// Settings and logging
#[cfg(feature = "conf")]
pub mod conf {
	pub use storefront_conf::*;
}

/// Password hashing
#[cfg(feature = "auth")]
pub mod auth {
	pub use storefront_auth::*;
}

/// Storefront record types and serializers
#[cfg(feature = "apps")]
pub mod apps {
	pub use storefront_apps::*;
}

pub use storefront_db::{Connection, ConnectionExt, Database, DatabaseError, Model};
pub use storefront_serializers::{
	Data, ErrorEntry, ErrorKind, FieldError, Serializer, SerializerError, SerializerResult,
};

#[cfg(feature = "conf")]
pub use storefront_conf::{Settings, SettingsBuilder};

/// Re-export commonly used types
pub mod prelude {
	pub use storefront_db::{Attribute, Connection, ConnectionExt, Database, Model, Row};
	pub use storefront_serializers::prelude::*;
	pub use storefront_validators::Validator;

	#[cfg(feature = "conf")]
	pub use storefront_conf::{Settings, SettingsBuilder};

	#[cfg(feature = "auth")]
	pub use storefront_auth::{Argon2Hasher, PasswordHasher};

	#[cfg(feature = "apps")]
	pub use storefront_apps::{
		AppError, AppResult,
		products::{ProductSerializer, ProductsQuery},
		shipping::{ShippingAddressCreateSerializer, ShippingAddressSerializer},
		users::{LoginSerializer, UserRegisterSerializer, UserSerializer},
	};
}
