//! Validation errors

/// Errors returned by the value validators
///
/// Messages are user facing: they end up verbatim in serializer error entries.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
	#[error("Invalid email address.")]
	InvalidEmail,

	#[error("Your {label} can only contain characters.")]
	InvalidName { label: String },

	#[error("Password should be longer than {min} characters|numbers|special characters.")]
	PasswordTooShort { min: usize },

	#[error("Password should be less than {max} characters|numbers|special characters.")]
	PasswordTooLong { max: usize },

	#[error("Password should contain at least one character A-Z a-z.")]
	PasswordMissingLetter,

	#[error("Password should contain at least one number 0-9.")]
	PasswordMissingDigit,

	#[error("{label} should be between {min} and {max} characters")]
	LengthOutOfRange {
		label: String,
		min: usize,
		max: usize,
	},

	#[error("{label} cannot be less than {min}")]
	BelowMinimum { label: String, min: f64 },

	#[error("Invalid ID")]
	InvalidId,

	#[error("URL is not valid")]
	InvalidImageUrl,

	/// The value does not have the expected JSON type
	#[error("Expected {expected}, got {found}")]
	WrongType {
		expected: &'static str,
		found: &'static str,
	},

	#[error("{0}")]
	Custom(String),
}

impl ValidationError {
	/// Build a [`ValidationError::WrongType`] from the offending value
	pub fn wrong_type(expected: &'static str, value: &serde_json::Value) -> Self {
		ValidationError::WrongType {
			expected,
			found: json_type_name(value),
		}
	}

	/// Check if the value was rejected for its type rather than its content
	pub fn is_type_error(&self) -> bool {
		matches!(self, ValidationError::WrongType { .. })
	}
}

/// Name of the JSON type of a value, as used in error messages
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
	use serde_json::Value;
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

pub type ValidationResult<T> = Result<T, ValidationError>;
