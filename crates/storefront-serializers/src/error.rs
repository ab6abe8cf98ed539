//! Serializer errors and error entries
//!
//! Two families of failure exist side by side:
//!
//! - [`SerializerError`] is fatal. It signals a misconfigured serializer, input
//!   of the wrong shape, misuse of the lifecycle (saving before validating) or
//!   a storage failure. It is returned with `?` and never collected.
//! - [`FieldError`] is soft. A field validator returns it, the pipeline turns
//!   it into an [`ErrorEntry`] and moves on to the next field.

use serde::Serialize;
use serde_json::Value;
use storefront_db::DatabaseError;
use storefront_validators::ValidationError;

/// Placeholder echoed instead of the input of sensitive fields
pub const REDACTED: &str = "[REDACTED]";

/// Fatal serializer errors
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
	/// A declared field (or write-only/read-only entry) is not an attribute of the model
	#[error("Field '{field}' does not exist in model '{model}'")]
	UnknownField { field: String, model: &'static str },

	/// The raw data carries a key outside the resolved field set
	#[error("Invalid field: {0}")]
	UnexpectedField(String),

	/// Validation was requested without raw data
	#[error("data: parameter should not be None")]
	MissingData,

	/// The raw data is not a mapping
	#[error("data: parameter should be of type object, got {found}")]
	InvalidData { found: &'static str },

	/// Validated data was requested before `is_valid()` ran
	#[error("You should run .is_valid() method first to validate data")]
	NotValidated,

	/// Validated data was requested although validation failed
	#[error("Validated data is not available: validation failed with {0} error(s)")]
	ValidationFailed(usize),

	/// An operation needs a bound instance and none is set
	#[error("Model instance is not provided")]
	MissingInstance,

	/// `many` does not match the shape of the bound instance
	#[error("Expected {expected} with many set to {many}")]
	InstanceShape { expected: &'static str, many: bool },

	/// A nested serializer received a record of another model
	#[error("Nested serializer for '{field}' expects records of '{expected}', got '{found}'")]
	NestedType {
		field: String,
		expected: &'static str,
		found: &'static str,
	},

	/// The model's table is not registered with the storage
	#[error("Model '{0}' does not support persistence")]
	NotPersistable(&'static str),

	/// A storage failure, propagated untouched
	#[error(transparent)]
	Database(#[from] DatabaseError),

	/// A failure raised by a serializer's own persistence or representation hook
	#[error(transparent)]
	Custom(anyhow::Error),
}

impl SerializerError {
	/// Wrap an application error raised from a serializer hook
	pub fn custom<E>(error: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		SerializerError::Custom(anyhow::Error::new(error))
	}

	/// Check if this is a storage error
	pub fn is_database_error(&self) -> bool {
		matches!(self, SerializerError::Database(_))
	}

	/// Try to view this as a storage error
	pub fn as_database_error(&self) -> Option<&DatabaseError> {
		match self {
			SerializerError::Database(e) => Some(e),
			_ => None,
		}
	}

	/// Try to view a custom error as the given application error type
	pub fn downcast_ref<E>(&self) -> Option<&E>
	where
		E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
	{
		match self {
			SerializerError::Custom(e) => e.downcast_ref::<E>(),
			_ => None,
		}
	}
}

pub type SerializerResult<T> = Result<T, SerializerError>;

/// Soft failure returned by a field validator
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
	/// The value is well-typed but not acceptable
	#[error("{0}")]
	Value(String),

	/// The value has the wrong type
	#[error("{0}")]
	Type(String),

	/// The value refers to a record that does not exist
	#[error("{0}")]
	NotFound(String),

	/// Anything else that went wrong while validating
	#[error(transparent)]
	Unexpected(#[from] anyhow::Error),
}

impl FieldError {
	pub fn value(message: impl Into<String>) -> Self {
		FieldError::Value(message.into())
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		FieldError::NotFound(message.into())
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			FieldError::Value(_) => ErrorKind::ValueError,
			FieldError::Type(_) => ErrorKind::TypeError,
			FieldError::NotFound(_) => ErrorKind::NotFound,
			FieldError::Unexpected(_) => ErrorKind::UnexpectedError,
		}
	}
}

impl From<ValidationError> for FieldError {
	fn from(err: ValidationError) -> Self {
		if err.is_type_error() {
			FieldError::Type(err.to_string())
		} else {
			FieldError::Value(err.to_string())
		}
	}
}

impl From<DatabaseError> for FieldError {
	fn from(err: DatabaseError) -> Self {
		FieldError::Unexpected(anyhow::Error::new(err))
	}
}

/// Category of a collected error entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	ValueError,
	TypeError,
	NotFound,
	SchemaError,
	UnexpectedError,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::ValueError => "value_error",
			ErrorKind::TypeError => "type_error",
			ErrorKind::NotFound => "not_found",
			ErrorKind::SchemaError => "schema_error",
			ErrorKind::UnexpectedError => "unexpected_error",
		}
	}
}

impl std::fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One collected validation failure
///
/// Serializes as `{"msg": .., "field": .., "input": .., "type": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
	#[serde(rename = "msg")]
	pub message: String,
	pub field: Option<String>,
	pub input: Value,
	#[serde(rename = "type")]
	pub kind: ErrorKind,
}

impl ErrorEntry {
	/// Build an entry, redacting `input` when the field is sensitive
	pub fn new(
		field: Option<&str>,
		message: impl Into<String>,
		input: Value,
		kind: ErrorKind,
		write_only: &[String],
	) -> Self {
		let input = match field {
			Some(name) if is_sensitive(name, write_only) => Value::String(REDACTED.to_string()),
			_ => input,
		};
		Self {
			message: message.into(),
			field: field.map(str::to_string),
			input,
			kind,
		}
	}

	/// Entry for a failed field validator
	pub fn from_field_error(
		field: &str,
		error: &FieldError,
		input: Value,
		write_only: &[String],
	) -> Self {
		Self::new(Some(field), error.to_string(), input, error.kind(), write_only)
	}
}

/// Sensitive fields never have their input echoed back
///
/// A field is sensitive when its name mentions a password or when it is
/// write-only.
pub fn is_sensitive(field: &str, write_only: &[String]) -> bool {
	field.to_ascii_lowercase().contains("password") || write_only.iter().any(|w| w == field)
}
