//! Numeric validators

use crate::{ValidationError, ValidationResult, Validator};

/// Validates that a number is at least `min`
#[derive(Debug, Clone)]
pub struct MinValueValidator {
	label: String,
	min: f64,
}

impl MinValueValidator {
	pub fn new(label: impl Into<String>, min: f64) -> Self {
		Self {
			label: label.into(),
			min,
		}
	}
}

impl Validator<f64> for MinValueValidator {
	fn validate(&self, value: &f64) -> ValidationResult<()> {
		if *value >= self.min {
			Ok(())
		} else {
			Err(ValidationError::BelowMinimum {
				label: self.label.clone(),
				min: self.min,
			})
		}
	}
}

/// Validates that a record identifier is non-negative
#[derive(Debug, Clone, Copy, Default)]
pub struct IdValidator;

impl IdValidator {
	pub fn new() -> Self {
		Self
	}
}

impl Validator<i64> for IdValidator {
	fn validate(&self, value: &i64) -> ValidationResult<()> {
		if *value < 0 {
			Err(ValidationError::InvalidId)
		} else {
			Ok(())
		}
	}
}
