//! Registration, login, profile updates and token blacklisting

mod serializers;

pub use serializers::{
	BlacklistedTokenSerializer, LoginSerializer, UpdateUserSerializer, UserRegisterSerializer,
	UserSerializer,
};

use crate::models::User;
use serde_json::Value;
use storefront_db::{Connection, ConnectionExt};
use storefront_serializers::FieldError;
use storefront_validators::{IdValidator, ValidationError, Validator};

/// Resolve a raw identifier to an existing user
///
/// Non-integer and negative identifiers are "Invalid ID"; unknown ones are
/// "User not found".
pub(crate) fn existing_user(conn: &dyn Connection, value: &Value) -> Result<User, FieldError> {
	let id = value.as_i64().ok_or(ValidationError::InvalidId)?;
	IdValidator::new().validate(&id)?;
	conn.get::<User>(id)?
		.ok_or_else(|| FieldError::not_found("User not found"))
}
