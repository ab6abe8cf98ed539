//! Registration, login and profile updates end to end

use rstest::*;
use serde_json::json;
use storefront::prelude::*;
use storefront_apps::models::User;
use storefront_apps::users::UpdateUserSerializer;
use storefront_integration_tests::{empty_store, error_fields, register};

#[fixture]
fn db() -> Database {
	empty_store()
}

#[rstest]
fn test_register_hides_password_and_hashes_it(db: Database) {
	let mut serializer = UserRegisterSerializer::from_data(
		&db,
		json!({
			"first_name": "John",
			"last_name": "Doe",
			"email": "john@example.com",
			"password": "Passw0rd",
		}),
	)
	.unwrap();

	assert!(serializer.is_valid().unwrap());
	let user = serializer.save().unwrap();

	assert_eq!(
		serializer.data().unwrap(),
		json!({"first_name": "John", "email": "john@example.com", "last_name": "Doe"})
	);
	assert_eq!(user.id, Some(1));
	assert_ne!(user.password, "Passw0rd");
	assert!(user.check_password("Passw0rd").unwrap());
}

#[rstest]
fn test_register_duplicate_email_is_an_application_error(db: Database) {
	register(&db, "John", "john@example.com");

	let mut again = UserRegisterSerializer::from_data(
		&db,
		json!({
			"first_name": "Johnny",
			"last_name": "Doe",
			"email": "john@example.com",
			"password": "Passw0rd",
		}),
	)
	.unwrap();
	assert!(again.is_valid().unwrap());

	let err = again.save().unwrap_err();
	let app = err.downcast_ref::<AppError>().expect("application error");
	assert!(app.is_existing_email());
	assert_eq!(db.count::<User>().unwrap(), 1);
}

#[rstest]
fn test_register_reports_every_bad_field_in_order(db: Database) {
	let mut serializer = UserRegisterSerializer::from_data(
		&db,
		json!({
			"first_name": "J0hn",
			"last_name": "Doe",
			"email": "not-an-email",
			"password": "password",
		}),
	)
	.unwrap();

	assert!(!serializer.is_valid().unwrap());
	assert_eq!(
		error_fields(serializer.errors()),
		vec![
			Some("first_name".to_string()),
			Some("email".to_string()),
			Some("password".to_string()),
		]
	);
	let password = &serializer.errors()[2];
	assert_eq!(password.input, json!("[REDACTED]"));
	assert_eq!(db.count::<User>().unwrap(), 0);
}

#[rstest]
fn test_login_then_profile_update(db: Database) {
	let user = register(&db, "John", "john@example.com");
	let before = user.last_login;

	let mut login = LoginSerializer::from_data(
		&db,
		json!({"email": "john@example.com", "password": "Passw0rd"}),
	)
	.unwrap();
	assert!(login.is_valid().unwrap(), "{:?}", login.errors());
	let logged_in = login.save().unwrap();
	assert!(logged_in.last_login >= before);
	assert_eq!(login.data().unwrap()["email"], "john@example.com");

	let mut update = UpdateUserSerializer::from_data(
		&db,
		json!({"id": 1, "first_name": "Jon", "last_name": "Doe", "email": "jon@example.com"}),
	)
	.unwrap();
	assert!(update.is_valid().unwrap(), "{:?}", update.errors());
	update.save().unwrap();

	let stored = db.get::<User>(1).unwrap().unwrap();
	assert_eq!(stored.first_name, "Jon");
	assert_eq!(stored.email, "jon@example.com");
	assert!(stored.check_password("Passw0rd").unwrap());
}

#[rstest]
#[case(json!({"email": "ghost@example.com", "password": "Passw0rd"}), "User does not exist")]
#[case(json!({"email": "john@example.com", "password": "Wrong1234"}), "Incorrect password")]
fn test_login_failures(db: Database, #[case] payload: serde_json::Value, #[case] message: &str) {
	register(&db, "John", "john@example.com");

	let mut login = LoginSerializer::from_data(&db, payload).unwrap();
	assert!(!login.is_valid().unwrap());
	assert!(login.errors().iter().any(|e| e.message == message));
}
