//! Password policy validator

use crate::{ValidationError, ValidationResult, Validator};

/// Password policy: at least one letter, at least one digit, bounded length
///
/// Character classes are checked before the length, so `"abcdefgh"` reports
/// the missing digit rather than anything about its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordValidator {
	min_length: usize,
	max_length: usize,
}

impl PasswordValidator {
	pub fn new(min_length: usize, max_length: usize) -> Self {
		Self {
			min_length,
			max_length,
		}
	}

	pub fn min_length(&self) -> usize {
		self.min_length
	}

	pub fn max_length(&self) -> usize {
		self.max_length
	}
}

impl Default for PasswordValidator {
	fn default() -> Self {
		Self::new(8, 128)
	}
}

impl Validator<str> for PasswordValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if !value.chars().any(char::is_alphabetic) {
			return Err(ValidationError::PasswordMissingLetter);
		}
		if !value.chars().any(char::is_numeric) {
			return Err(ValidationError::PasswordMissingDigit);
		}
		let length = value.chars().count();
		if length < self.min_length {
			return Err(ValidationError::PasswordTooShort {
				min: self.min_length,
			});
		}
		if length > self.max_length {
			return Err(ValidationError::PasswordTooLong {
				max: self.max_length,
			});
		}
		Ok(())
	}
}
