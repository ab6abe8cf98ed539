//! # Storefront Validators
//!
//! Value validators shared by the storefront serializers.
//!
//! Every validator implements [`Validator`] and reports a [`ValidationError`]
//! whose message is meant to be shown to the client as-is.
//!
//! ```
//! use storefront_validators::{EmailValidator, PasswordValidator, Validator};
//!
//! assert!(EmailValidator::new().validate("john@example.com").is_ok());
//! assert!(PasswordValidator::default().validate("Passw0rd").is_ok());
//! assert!(PasswordValidator::default().validate("password").is_err());
//! ```

pub mod email;
pub mod errors;
pub mod name;
pub mod numeric;
pub mod password;
pub mod string;
pub mod url;
pub mod value;

pub use email::EmailValidator;
pub use errors::{ValidationError, ValidationResult, json_type_name};
pub use name::NameValidator;
pub use numeric::{IdValidator, MinValueValidator};
pub use password::PasswordValidator;
pub use string::LengthValidator;
pub use url::ImageUrlValidator;

/// Trait for validators
pub trait Validator<T: ?Sized> {
	fn validate(&self, value: &T) -> ValidationResult<()>;
}

/// Re-export commonly used types
pub mod prelude {
	pub use crate::email::*;
	pub use crate::errors::*;
	pub use crate::name::*;
	pub use crate::numeric::*;
	pub use crate::password::*;
	pub use crate::string::*;
	pub use crate::url::*;
	pub use crate::value::*;
	pub use crate::Validator;
}
