//! Persistence dispatcher
//!
//! Default implementations of the persistence hooks of [`Serializer`]. They
//! are free functions so that a serializer overriding a hook can still call
//! the stock behaviour around its own logic.

use crate::Data;
use crate::error::{SerializerError, SerializerResult};
use crate::serializer::Serializer;
use serde_json::Value;
use storefront_db::{Connection, ConnectionExt, ID_FIELD, Model};

/// Fail unless the model's table is registered with the storage
pub fn ensure_persistable<M: Model>(conn: &dyn Connection) -> SerializerResult<()> {
	if conn.has_table(M::table_name()) {
		Ok(())
	} else {
		Err(SerializerError::NotPersistable(M::table_name()))
	}
}

/// Update the record named by `data["id"]` when it exists, create one otherwise
pub fn dispatch<S: Serializer>(
	conn: &dyn Connection,
	data: &Data,
	read_only: &[String],
) -> SerializerResult<S::Model> {
	let existing = match data.get(ID_FIELD).and_then(Value::as_i64) {
		Some(id) => conn.get::<S::Model>(id)?,
		None => None,
	};
	match existing {
		Some(instance) => {
			tracing::debug!(model = S::Model::table_name(), id = ?instance.id(), "dispatching to update");
			S::update(conn, data, instance, read_only)
		}
		None => {
			tracing::debug!(model = S::Model::table_name(), "dispatching to create");
			S::create(conn, data)
		}
	}
}

/// Build a record from `data` and insert it with a fresh identifier
pub fn create_record<M: Model>(conn: &dyn Connection, data: &Data) -> SerializerResult<M> {
	let mut row = data.clone();
	row.shift_remove(ID_FIELD);
	let mut record = M::from_row(row)?;
	conn.insert(&mut record)?;
	Ok(record)
}

/// Copy writable columns from `data` onto `instance` and store it
///
/// Keys that are not columns of the model, or that are read-only, are skipped.
pub fn update_record<M: Model>(
	conn: &dyn Connection,
	data: &Data,
	mut instance: M,
	read_only: &[String],
) -> SerializerResult<M> {
	for (key, value) in data {
		if !M::has_column(key) || read_only.iter().any(|r| r == key) {
			continue;
		}
		instance.set_attribute(key, value.clone())?;
	}
	conn.update(&instance)?;
	Ok(instance)
}

pub fn delete_record<M: Model>(conn: &dyn Connection, instance: &M) -> SerializerResult<()> {
	conn.delete(instance)?;
	Ok(())
}
