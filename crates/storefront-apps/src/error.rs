use storefront_auth::HashError;
use storefront_db::DatabaseError;
use storefront_serializers::{ErrorEntry, FieldError, SerializerError};

/// Application-level failures raised by the storefront record types
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	/// Registration with an email that already belongs to a user
	#[error("User with email '{0}' already exists")]
	ExistingEmail(String),

	#[error(transparent)]
	Hash(#[from] HashError),

	#[error(transparent)]
	Database(#[from] DatabaseError),

	/// A product listing query failed its schema
	#[error("Invalid products query: {} error(s)", .0.len())]
	InvalidQuery(Vec<ErrorEntry>),
}

impl AppError {
	pub fn is_existing_email(&self) -> bool {
		matches!(self, AppError::ExistingEmail(_))
	}
}

impl From<AppError> for SerializerError {
	fn from(err: AppError) -> Self {
		match err {
			AppError::Database(e) => SerializerError::Database(e),
			other => SerializerError::custom(other),
		}
	}
}

impl From<AppError> for FieldError {
	fn from(err: AppError) -> Self {
		match err {
			AppError::Database(e) => e.into(),
			other => FieldError::Unexpected(other.into()),
		}
	}
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_storage_errors_stay_storage_errors() {
		let err: SerializerError = AppError::Database(DatabaseError::TransactionClosed).into();
		assert!(err.is_database_error());
	}

	#[test]
	fn test_hash_failures_are_unexpected_field_errors() {
		let err: FieldError = AppError::Hash(HashError::MalformedHash("x".to_string())).into();
		assert_eq!(err.kind(), storefront_serializers::ErrorKind::UnexpectedError);
	}

	#[test]
	fn test_existing_email_can_be_recovered() {
		let err: SerializerError = AppError::ExistingEmail("john@example.com".to_string()).into();
		assert!(err.downcast_ref::<AppError>().is_some_and(AppError::is_existing_email));
	}
}
