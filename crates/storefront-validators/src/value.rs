//! Typed access to raw JSON input

use crate::{ValidationError, ValidationResult};
use serde_json::Value;

pub fn expect_str(value: &Value) -> ValidationResult<&str> {
	value
		.as_str()
		.ok_or_else(|| ValidationError::wrong_type("a string", value))
}

/// Integers only; `3.0` is rejected like any other float
pub fn expect_i64(value: &Value) -> ValidationResult<i64> {
	value
		.as_i64()
		.ok_or_else(|| ValidationError::wrong_type("an integer", value))
}

pub fn expect_f64(value: &Value) -> ValidationResult<f64> {
	value
		.as_f64()
		.ok_or_else(|| ValidationError::wrong_type("a number", value))
}

pub fn expect_bool(value: &Value) -> ValidationResult<bool> {
	value
		.as_bool()
		.ok_or_else(|| ValidationError::wrong_type("a boolean", value))
}
