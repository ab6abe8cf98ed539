//! Log subscriber initialisation

use crate::settings::{LogFormat, LoggingSettings, SettingsError};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber described by `settings`
///
/// Returns `Ok(false)` when a global subscriber is already installed.
///
/// # Examples
///
/// ```
/// use storefront_conf::logging;
/// use storefront_conf::settings::LoggingSettings;
///
/// let settings = LoggingSettings::default();
/// let first = logging::init(&settings).unwrap();
/// let second = logging::init(&settings).unwrap();
/// assert!(first);
/// assert!(!second);
/// ```
pub fn init(settings: &LoggingSettings) -> Result<bool, SettingsError> {
	let filter = EnvFilter::try_new(&settings.level)
		.map_err(|e| SettingsError::LogFilter(format!("{}: {}", settings.level, e)))?;

	let installed = match settings.format {
		LogFormat::Text => tracing_subscriber::fmt()
			.with_env_filter(filter)
			.try_init()
			.is_ok(),
		LogFormat::Json => tracing_subscriber::fmt()
			.json()
			.with_env_filter(filter)
			.try_init()
			.is_ok(),
	};

	if installed {
		tracing::debug!(level = %settings.level, format = ?settings.format, "logging initialised");
	}
	Ok(installed)
}
