//! Settings drive the application configuration
//!
//! The application configuration is process-wide, so this binary holds the
//! only test that installs it.

use serde_json::json;
use serial_test::serial;
use std::io::Write;
use storefront::prelude::*;
use storefront_conf::sources::{DefaultSource, TomlFileSource};
use storefront_integration_tests::empty_store;

#[test]
#[serial]
fn test_settings_configure_password_policy_and_default_image() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(
		file,
		r#"
debug = true

[logging]
level = "warn"

[media]
root = "static"
default_image = "placeholder.png"

[auth]
password_min_length = 12
"#
	)
	.unwrap();

	let settings = SettingsBuilder::new()
		.add_source(DefaultSource::settings().unwrap())
		.add_source(TomlFileSource::new(file.path()))
		.build()
		.unwrap();
	assert_eq!(settings.auth.password_max_length, 128);

	assert!(storefront_apps::init(&settings).unwrap());
	assert!(!storefront_apps::init(&settings).unwrap());

	let config = storefront_apps::config::get();
	assert_eq!(config.password_policy().min_length(), 12);
	assert_eq!(config.default_image(), "static/placeholder.png");

	let db = empty_store();
	let mut register = UserRegisterSerializer::from_data(
		&db,
		json!({
			"first_name": "John",
			"last_name": "Doe",
			"email": "john@example.com",
			"password": "Passw0rd",
		}),
	)
	.unwrap();
	assert!(!register.is_valid().unwrap());
	assert_eq!(register.errors()[0].field.as_deref(), Some("password"));
	assert_eq!(
		register.errors()[0].message,
		"Password should be longer than 12 characters|numbers|special characters."
	);
}
