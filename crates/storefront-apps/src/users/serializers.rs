use super::existing_user;
use crate::config;
use crate::models::{BlacklistedToken, User};
use serde_json::Value;
use storefront_db::{Connection, ConnectionExt};
use storefront_serializers::{
	Data, FieldError, FieldValidators, MetaConfig, Representer, Serializer, SerializerError,
	SerializerKind, SerializerResult,
};
use storefront_validators::value::expect_str;
use storefront_validators::{EmailValidator, NameValidator, Validator};

fn validate_name(label: &str, value: Value) -> Result<Value, FieldError> {
	NameValidator::new(label).validate(expect_str(&value)?)?;
	Ok(value)
}

fn validate_email(value: Value) -> Result<Value, FieldError> {
	EmailValidator::new().validate(expect_str(&value)?)?;
	Ok(value)
}

fn user_by_email(conn: &dyn Connection, email: Option<&Value>) -> Result<User, FieldError> {
	let user = match email {
		Some(email) => conn.find_by::<User>("email", email)?,
		None => None,
	};
	user.ok_or_else(|| FieldError::value("User does not exist"))
}

/// Sign-up form; the password is hashed on save and never echoed back
pub struct UserRegisterSerializer;

impl Serializer for UserRegisterSerializer {
	type Model = User;

	fn meta() -> MetaConfig {
		MetaConfig::new(["first_name", "email", "last_name", "password"])
			.with_write_only_fields(["password"])
	}

	fn validators(v: &mut FieldValidators<User>) {
		v.add("first_name", |_ctx, value| validate_name("first name", value))
			.add("last_name", |_ctx, value| validate_name("last name", value))
			.add("email", |_ctx, value| validate_email(value))
			.add("password", |_ctx, value| {
				config::get()
					.password_policy()
					.validate(expect_str(&value)?)?;
				Ok(value)
			});
	}

	fn create(conn: &dyn Connection, data: &Data) -> SerializerResult<User> {
		Ok(User::create_user(conn, data)?)
	}
}

/// Public profile of a user
pub struct UserSerializer;

impl Serializer for UserSerializer {
	type Model = User;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::new(["id", "first_name", "last_name", "email", "shipping_addresses"])
	}
}

/// Credential check
///
/// The email validator binds the user, the password validator checks the
/// hash against it. The representation is the [`UserSerializer`] view and
/// saving only records the login time.
pub struct LoginSerializer;

impl Serializer for LoginSerializer {
	type Model = User;

	fn meta() -> MetaConfig {
		MetaConfig::new(["email", "password"])
	}

	fn validators(v: &mut FieldValidators<User>) {
		v.add("email", |ctx, value| {
			let user = user_by_email(ctx.conn(), Some(&value))?;
			ctx.set_instance(user);
			Ok(value)
		})
		.add("password", |ctx, value| {
			let user = match ctx.instance() {
				Some(user) => user.clone(),
				None => user_by_email(ctx.conn(), ctx.get("email"))?,
			};
			if user.check_password(expect_str(&value)?)? {
				Ok(value)
			} else {
				Err(FieldError::value("Incorrect password"))
			}
		});
	}

	fn represent(repr: &Representer<'_>, record: &User) -> SerializerResult<Value> {
		UserSerializer::from_instance(repr.conn(), record.clone())?.data()
	}

	fn save(
		conn: &dyn Connection,
		_data: &Data,
		instance: Option<&User>,
		_read_only: &[String],
	) -> SerializerResult<User> {
		let mut user = instance.cloned().ok_or(SerializerError::MissingInstance)?;
		user.update_last_login(conn)?;
		tracing::info!(user = ?user.id, "user logged in");
		Ok(user)
	}
}

/// Profile update; `id` must name an existing user
pub struct UpdateUserSerializer;

impl Serializer for UpdateUserSerializer {
	type Model = User;

	fn meta() -> MetaConfig {
		MetaConfig::new(["id", "first_name", "last_name", "email"])
	}

	fn validators(v: &mut FieldValidators<User>) {
		v.add("id", |ctx, value| {
			existing_user(ctx.conn(), &value)?;
			Ok(value)
		})
		.add("first_name", |_ctx, value| validate_name("first name", value))
		.add("last_name", |_ctx, value| validate_name("last name", value))
		.add("email", |_ctx, value| validate_email(value));
	}
}

pub struct BlacklistedTokenSerializer;

impl Serializer for BlacklistedTokenSerializer {
	type Model = BlacklistedToken;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::new(["access", "refresh", "user_id"])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::database;
	use rstest::*;
	use serde_json::json;
	use storefront_db::Database;
	use storefront_serializers::ErrorKind;

	#[fixture]
	fn db() -> Database {
		let db = database();
		let mut register = UserRegisterSerializer::from_data(
			&db,
			json!({
				"first_name": "John",
				"last_name": "Doe",
				"email": "john.doe@example.com",
				"password": "password123",
			}),
		)
		.unwrap();
		assert!(register.is_valid().unwrap());
		register.save().unwrap();
		db
	}

	#[rstest]
	#[case(json!({"first_name": "J0hn"}), "first_name", "Your first name can only contain characters.")]
	#[case(json!({"last_name": "D-e"}), "last_name", "Your last name can only contain characters.")]
	#[case(json!({"email": "not-an-email"}), "email", "Invalid email address.")]
	#[case(
		json!({"password": "short1"}),
		"password",
		"Password should be longer than 8 characters|numbers|special characters."
	)]
	fn test_register_rejects_field(
		#[case] patch: Value,
		#[case] field: &str,
		#[case] message: &str,
	) {
		let db = database();
		let mut data = json!({
			"first_name": "Jane",
			"last_name": "Roe",
			"email": "jane@example.com",
			"password": "password123",
		});
		if let (Some(target), Some(patch)) = (data.as_object_mut(), patch.as_object()) {
			target.extend(patch.clone());
		}

		let mut register = UserRegisterSerializer::from_data(&db, data).unwrap();
		assert!(!register.is_valid().unwrap());
		assert_eq!(register.errors().len(), 1);
		let entry = &register.errors()[0];
		assert_eq!(entry.field.as_deref(), Some(field));
		assert_eq!(entry.message, message);
	}

	#[rstest]
	fn test_register_data_omits_password(db: Database) {
		let user = db.get::<User>(1).unwrap().unwrap();
		let data = UserSerializer::from_instance(&db, user).unwrap().data().unwrap();
		assert_eq!(
			data,
			json!({
				"id": 1,
				"first_name": "John",
				"last_name": "Doe",
				"email": "john.doe@example.com",
				"shipping_addresses": [],
			})
		);
	}

	#[rstest]
	fn test_login_binds_user_and_represents_profile(db: Database) {
		let mut login = LoginSerializer::from_data(
			&db,
			json!({"email": "john.doe@example.com", "password": "password123"}),
		)
		.unwrap();

		assert!(login.is_valid().unwrap());
		assert_eq!(login.instance().map(|u| u.id), Some(Some(1)));
		assert_eq!(login.data().unwrap()["email"], "john.doe@example.com");
		assert!(login.data().unwrap().get("password").is_none());

		let before = db.get::<User>(1).unwrap().unwrap().last_login;
		let user = login.save().unwrap();
		assert!(user.last_login >= before);
		assert_eq!(db.count::<User>().unwrap(), 1);
	}

	#[rstest]
	#[case("john.doe@example.com", "password124", "Incorrect password")]
	#[case("nobody@example.com", "password123", "User does not exist")]
	fn test_login_failures(
		db: Database,
		#[case] email: &str,
		#[case] password: &str,
		#[case] message: &str,
	) {
		let mut login =
			LoginSerializer::from_data(&db, json!({"email": email, "password": password})).unwrap();

		assert!(!login.is_valid().unwrap());
		let password_entry = login
			.errors()
			.iter()
			.find(|e| e.field.as_deref() == Some("password"))
			.unwrap();
		assert_eq!(password_entry.message, message);
		assert_eq!(password_entry.input, json!("[REDACTED]"));
	}

	#[rstest]
	fn test_update_user_changes_profile(db: Database) {
		let mut update = UpdateUserSerializer::from_data(
			&db,
			json!({"id": 1, "first_name": "Johnny", "last_name": "Doe", "email": "johnny@example.com"}),
		)
		.unwrap();
		assert!(update.is_valid().unwrap());

		let user = update.save().unwrap();
		assert_eq!(user.id, Some(1));
		assert_eq!(user.first_name, "Johnny");
		assert!(user.check_password("password123").unwrap());
		assert_eq!(db.count::<User>().unwrap(), 1);
	}

	#[rstest]
	#[case(json!(99), "User not found", ErrorKind::NotFound)]
	#[case(json!(-1), "Invalid ID", ErrorKind::ValueError)]
	#[case(json!("one"), "Invalid ID", ErrorKind::ValueError)]
	fn test_update_user_unknown_id(
		db: Database,
		#[case] id: Value,
		#[case] message: &str,
		#[case] kind: ErrorKind,
	) {
		let mut update =
			UpdateUserSerializer::from_data(&db, json!({"id": id, "first_name": "Johnny"})).unwrap();
		assert!(!update.is_valid().unwrap());
		assert_eq!(update.errors()[0].message, message);
		assert_eq!(update.errors()[0].kind, kind);
	}

	#[rstest]
	fn test_blacklisted_token_round(db: Database) {
		let mut tokens = BlacklistedTokenSerializer::from_data(
			&db,
			json!({"access": "a.b.c", "refresh": "d.e.f", "user_id": 1}),
		)
		.unwrap();
		assert!(tokens.is_valid().unwrap());
		tokens.save().unwrap();

		assert!(BlacklistedToken::is_revoked(&db, "d.e.f").unwrap());
		assert!(!BlacklistedToken::is_revoked(&db, "x.y.z").unwrap());
		assert_eq!(
			tokens.data().unwrap(),
			json!({"access": "a.b.c", "refresh": "d.e.f", "user_id": 1})
		);
	}
}
