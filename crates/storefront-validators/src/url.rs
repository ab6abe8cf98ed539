//! Image URL validator

use crate::{ValidationError, ValidationResult, Validator};
use regex::Regex;
use std::sync::LazyLock;

static HTTPS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(concat!(
		r"(?i)^https://",
		r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|",
		r"localhost|",
		r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}|",
		r"\[?[A-F0-9]*:[A-F0-9:]+\]?)",
		r"(?::\d+)?",
		r"(?:/?|[/?]\S+)$",
	))
	.expect("Invalid regex pattern")
});

static IMAGE_EXTENSION_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png)$").expect("Invalid regex pattern"));

/// Validates an HTTPS URL pointing at a jpg, jpeg or png image
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageUrlValidator;

impl ImageUrlValidator {
	pub fn new() -> Self {
		Self
	}
}

impl Validator<str> for ImageUrlValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if HTTPS_URL_RE.is_match(value) && IMAGE_EXTENSION_RE.is_match(value) {
			Ok(())
		} else {
			Err(ValidationError::InvalidImageUrl)
		}
	}
}
