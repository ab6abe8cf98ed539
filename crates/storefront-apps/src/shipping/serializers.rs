use super::schema::{CreateShippingAddress, UpdateShippingAddress};
use crate::models::{ShippingAddress, User};
use crate::users::{UserSerializer, existing_user};
use serde_json::Value;
use storefront_db::{Connection, ConnectionExt, DatabaseResult};
use storefront_serializers::persistence::{create_record, update_record};
use storefront_serializers::{
	Data, FieldError, FieldValidators, MetaConfig, NestedSerializers, SchemaModel, Serializer,
	SerializerError, SerializerKind, SerializerResult, ValidationContext,
};
use storefront_validators::ValidationError;

fn validate_user_id(
	ctx: &mut ValidationContext<'_, ShippingAddress>,
	value: Value,
) -> Result<Value, FieldError> {
	existing_user(ctx.conn(), &value)?;
	Ok(value)
}

/// Bind the address named by `id` after checking it belongs to `user_id`
fn validate_owned_address(
	ctx: &mut ValidationContext<'_, ShippingAddress>,
	value: Value,
) -> Result<Value, FieldError> {
	let id = value.as_i64().ok_or(ValidationError::InvalidId)?;
	let address = ctx
		.conn()
		.get::<ShippingAddress>(id)?
		.ok_or_else(|| FieldError::not_found("Shipping Address not found"))?;
	let owner = ctx.get("user_id").and_then(Value::as_i64);
	if address.user_id.is_none() || address.user_id != owner {
		return Err(FieldError::not_found(
			"Shipping Address not found among User Addresses",
		));
	}
	ctx.set_instance(address);
	Ok(value)
}

/// Clear the previous default of the owner when `data` marks a new default
fn release_default(
	conn: &dyn Connection,
	data: &Data,
	keep: Option<i64>,
) -> DatabaseResult<()> {
	let is_default = data.get("default").and_then(Value::as_bool).unwrap_or(false);
	let owner = data.get("user_id").and_then(Value::as_i64);
	if let (true, Some(user_id)) = (is_default, owner) {
		let cleared = ShippingAddress::clear_default(conn, user_id, keep)?;
		tracing::debug!(user_id, cleared, "cleared previous default address");
	}
	Ok(())
}

pub struct ShippingAddressSerializer;

impl Serializer for ShippingAddressSerializer {
	type Model = ShippingAddress;
	const KIND: SerializerKind = SerializerKind::Model;

	fn meta() -> MetaConfig {
		MetaConfig::all()
	}

	fn nested(nested: &mut NestedSerializers) {
		nested.add::<UserSerializer>("user");
	}
}

/// Every address of `user`, represented with `many = true`
pub fn shipping_addresses_for(conn: &dyn Connection, user: &User) -> SerializerResult<Value> {
	let addresses = user.shipping_addresses(conn)?;
	ShippingAddressSerializer::from_instances(conn, addresses)?.data()
}

pub struct ShippingAddressCreateSerializer;

impl Serializer for ShippingAddressCreateSerializer {
	type Model = ShippingAddress;

	fn meta() -> MetaConfig {
		MetaConfig::new(["user_id", "address", "city", "state", "country", "default"])
	}

	fn validators(v: &mut FieldValidators<ShippingAddress>) {
		v.add("user_id", validate_user_id);
	}

	fn schema() -> Option<SchemaModel> {
		Some(SchemaModel::of::<CreateShippingAddress>())
	}

	fn create(conn: &dyn Connection, data: &Data) -> SerializerResult<ShippingAddress> {
		conn.atomic(|tx| {
			release_default(tx, data, None)?;
			create_record(tx, data)
		})
	}
}

pub struct ShippingAddressUpdateSerializer;

impl Serializer for ShippingAddressUpdateSerializer {
	type Model = ShippingAddress;

	fn meta() -> MetaConfig {
		MetaConfig::new([
			"address", "city", "state", "country", "user_id", "id", "default",
		])
	}

	fn validators(v: &mut FieldValidators<ShippingAddress>) {
		v.add("user_id", validate_user_id)
			.add("id", validate_owned_address);
	}

	fn schema() -> Option<SchemaModel> {
		Some(SchemaModel::of::<UpdateShippingAddress>())
	}

	/// Always an update of the address bound by the `id` validator
	fn save(
		conn: &dyn Connection,
		data: &Data,
		instance: Option<&ShippingAddress>,
		read_only: &[String],
	) -> SerializerResult<ShippingAddress> {
		let instance = instance.cloned().ok_or(SerializerError::MissingInstance)?;
		Self::update(conn, data, instance, read_only)
	}

	fn update(
		conn: &dyn Connection,
		data: &Data,
		instance: ShippingAddress,
		read_only: &[String],
	) -> SerializerResult<ShippingAddress> {
		conn.atomic(|tx| {
			release_default(tx, data, instance.id)?;
			update_record(tx, data, instance, read_only)
		})
	}
}

pub struct DeleteShippingAddressSerializer;

impl Serializer for DeleteShippingAddressSerializer {
	type Model = ShippingAddress;

	fn meta() -> MetaConfig {
		MetaConfig::new(["user_id", "id"])
	}

	fn validators(v: &mut FieldValidators<ShippingAddress>) {
		v.add("id", validate_owned_address);
	}
}
