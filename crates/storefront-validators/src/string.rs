//! String length validator

use crate::{ValidationError, ValidationResult, Validator};

/// Validates that a string has between `min` and `max` characters (inclusive)
#[derive(Debug, Clone)]
pub struct LengthValidator {
	label: String,
	min: usize,
	max: usize,
}

impl LengthValidator {
	/// # Examples
	///
	/// ```
	/// use storefront_validators::{LengthValidator, Validator};
	///
	/// let validator = LengthValidator::new("Name", 3, 255);
	/// assert!(validator.validate("PS5").is_ok());
	/// assert!(validator.validate("PS").is_err());
	/// ```
	pub fn new(label: impl Into<String>, min: usize, max: usize) -> Self {
		Self {
			label: label.into(),
			min,
			max,
		}
	}
}

impl Validator<str> for LengthValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		let length = value.chars().count();
		if (self.min..=self.max).contains(&length) {
			Ok(())
		} else {
			Err(ValidationError::LengthOutOfRange {
				label: self.label.clone(),
				min: self.min,
				max: self.max,
			})
		}
	}
}
