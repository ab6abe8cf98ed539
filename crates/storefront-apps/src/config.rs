//! Application configuration read by validators and models
//!
//! Installed once at startup from [`Settings`] with [`init`]. Until then
//! [`get`] hands out the defaults, so tests and tools work without setup.

use std::sync::{LazyLock, OnceLock};
use storefront_conf::Settings;
use storefront_validators::PasswordValidator;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

static DEFAULT_CONFIG: LazyLock<AppConfig> =
	LazyLock::new(|| AppConfig::from_settings(&Settings::default()));

#[derive(Debug, Clone)]
pub struct AppConfig {
	password_policy: PasswordValidator,
	default_image: String,
}

impl AppConfig {
	pub fn from_settings(settings: &Settings) -> Self {
		Self {
			password_policy: PasswordValidator::new(
				settings.auth.password_min_length,
				settings.auth.password_max_length,
			),
			default_image: settings
				.media
				.default_image_path()
				.to_string_lossy()
				.into_owned(),
		}
	}

	pub fn password_policy(&self) -> &PasswordValidator {
		&self.password_policy
	}

	/// Image given to products created without one
	pub fn default_image(&self) -> &str {
		&self.default_image
	}
}

/// Install the configuration; `false` when one is already installed
pub fn init(settings: &Settings) -> bool {
	let installed = APP_CONFIG.set(AppConfig::from_settings(settings)).is_ok();
	if installed {
		tracing::debug!(
			min = settings.auth.password_min_length,
			max = settings.auth.password_max_length,
			"application configuration installed"
		);
	} else {
		tracing::warn!("application configuration already installed, ignoring");
	}
	installed
}

pub fn get() -> &'static AppConfig {
	APP_CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}
