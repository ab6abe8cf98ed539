//! Personal name validator

use crate::{ValidationError, ValidationResult, Validator};

/// Validates that a name is made of alphabetic characters only
#[derive(Debug, Clone)]
pub struct NameValidator {
	label: String,
}

impl NameValidator {
	/// `label` names the field in the error message, e.g. "first name"
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
		}
	}
}

impl Validator<str> for NameValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if !value.is_empty() && value.chars().all(char::is_alphabetic) {
			Ok(())
		} else {
			Err(ValidationError::InvalidName {
				label: self.label.clone(),
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("John", true)]
	#[case("Zoë", true)]
	#[case("", false)]
	#[case("John2", false)]
	#[case("Mary Ann", false)]
	fn test_name(#[case] name: &str, #[case] valid: bool) {
		assert_eq!(NameValidator::new("first name").validate(name).is_ok(), valid);
	}

	#[test]
	fn test_message_uses_label() {
		let err = NameValidator::new("last name").validate("D0e").unwrap_err();
		assert_eq!(err.to_string(), "Your last name can only contain characters.");
	}
}
