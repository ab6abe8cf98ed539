//! Settings types
//!
//! Every section carries serde defaults, so a partial configuration (or none
//! at all) deserializes into usable settings. Boolean and numeric fields also
//! accept their string spelling, as read from the environment or `.env`;
//! string fields take any environment value verbatim.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root settings of the storefront backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	#[serde(deserialize_with = "lenient::flag")]
	pub debug: bool,
	pub secret_key: String,
	pub logging: LoggingSettings,
	pub media: MediaSettings,
	pub auth: AuthSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debug: false,
			secret_key: String::new(),
			logging: LoggingSettings::default(),
			media: MediaSettings::default(),
			auth: AuthSettings::default(),
		}
	}
}

impl Settings {
	/// Check cross-field consistency
	///
	/// # Examples
	///
	/// ```
	/// use storefront_conf::Settings;
	///
	/// let mut settings = Settings::default();
	/// assert!(settings.validate().is_err()); // no secret key outside debug
	///
	/// settings.debug = true;
	/// assert!(settings.validate().is_ok());
	/// ```
	pub fn validate(&self) -> Result<(), SettingsError> {
		if !self.debug && self.secret_key.trim().is_empty() {
			return Err(SettingsError::MissingSecretKey);
		}
		let auth = &self.auth;
		if auth.password_min_length == 0 || auth.password_min_length > auth.password_max_length {
			return Err(SettingsError::PasswordLengthRange {
				min: auth.password_min_length,
				max: auth.password_max_length,
			});
		}
		if self.media.default_image.trim().is_empty() {
			return Err(SettingsError::Invalid(
				"media.default_image must not be empty".to_string(),
			));
		}
		Ok(())
	}
}

mod lenient {
	use serde::de::Error;
	use serde::{Deserialize, Deserializer};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw<T> {
		Typed(T),
		Text(String),
	}

	pub(super) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
		match Raw::<bool>::deserialize(deserializer)? {
			Raw::Typed(value) => Ok(value),
			Raw::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
				"true" | "yes" | "on" | "1" => Ok(true),
				"false" | "no" | "off" | "0" => Ok(false),
				_ => Err(D::Error::custom(format!("invalid boolean: {text}"))),
			},
		}
	}

	pub(super) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
		match Raw::<usize>::deserialize(deserializer)? {
			Raw::Typed(value) => Ok(value),
			Raw::Text(text) => text
				.trim()
				.parse()
				.map_err(|e| D::Error::custom(format!("invalid number {text}: {e}"))),
		}
	}
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Text,
	Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// `EnvFilter` directives, e.g. `info` or `storefront_serializers=debug,warn`
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Text,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
	pub root: PathBuf,
	/// File name, relative to `root`, of the image given to products without one
	pub default_image: String,
}

impl Default for MediaSettings {
	fn default() -> Self {
		Self {
			root: PathBuf::from("media"),
			default_image: "default.png".to_string(),
		}
	}
}

impl MediaSettings {
	pub fn default_image_path(&self) -> PathBuf {
		self.root.join(&self.default_image)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
	#[serde(deserialize_with = "lenient::count")]
	pub password_min_length: usize,
	#[serde(deserialize_with = "lenient::count")]
	pub password_max_length: usize,
}

impl Default for AuthSettings {
	fn default() -> Self {
		Self {
			password_min_length: 8,
			password_max_length: 128,
		}
	}
}

/// Errors raised while building or checking settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: crate::sources::SourceError,
	},

	#[error("Failed to deserialize settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("SECRET_KEY must be set when DEBUG is off")]
	MissingSecretKey,

	#[error("Invalid password length range: min {min}, max {max}")]
	PasswordLengthRange { min: usize, max: usize },

	#[error("Invalid log filter: {0}")]
	LogFilter(String),

	#[error("Invalid settings: {0}")]
	Invalid(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn production() -> Settings {
		Settings {
			secret_key: "s3cret".to_string(),
			..Settings::default()
		}
	}

	#[rstest]
	fn test_defaults() {
		let settings = Settings::default();
		assert_eq!(settings.auth.password_min_length, 8);
		assert_eq!(settings.auth.password_max_length, 128);
		assert_eq!(settings.media.default_image_path(), PathBuf::from("media/default.png"));
		assert_eq!(settings.logging.format, LogFormat::Text);
	}

	#[rstest]
	#[case(0, 128)]
	#[case(20, 10)]
	fn test_password_range_is_checked(#[case] min: usize, #[case] max: usize) {
		let mut settings = production();
		settings.auth = AuthSettings {
			password_min_length: min,
			password_max_length: max,
		};
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::PasswordLengthRange { .. })
		));
	}

	#[rstest]
	fn test_partial_document_uses_defaults() {
		let settings: Settings =
			serde_json::from_value(serde_json::json!({"logging": {"format": "json"}})).unwrap();
		assert_eq!(settings.logging.level, "info");
		assert_eq!(settings.logging.format, LogFormat::Json);
		assert!(production().validate().is_ok());
	}

	#[rstest]
	#[case(serde_json::json!("on"), true)]
	#[case(serde_json::json!("0"), false)]
	#[case(serde_json::json!(true), true)]
	fn test_debug_accepts_env_spellings(#[case] raw: serde_json::Value, #[case] expected: bool) {
		let settings: Settings = serde_json::from_value(serde_json::json!({"debug": raw})).unwrap();
		assert_eq!(settings.debug, expected);
	}

	#[rstest]
	fn test_numeric_strings_stay_strings_where_expected() {
		let settings: Settings = serde_json::from_value(serde_json::json!({
			"secret_key": "1234567890",
			"auth": {"password_min_length": "12", "password_max_length": 64},
		}))
		.unwrap();
		assert_eq!(settings.secret_key, "1234567890");
		assert_eq!(settings.auth.password_min_length, 12);
		assert_eq!(settings.auth.password_max_length, 64);

		let err = serde_json::from_value::<Settings>(serde_json::json!({"debug": "maybe"}));
		assert!(err.is_err());
	}
}
