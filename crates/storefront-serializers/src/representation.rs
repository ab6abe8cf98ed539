//! Representation engine
//!
//! Turns bound records into output mappings. Relationship attributes are
//! expanded through a nested serializer when one is declared for the field,
//! and fall back to the related identifiers otherwise.

use crate::Data;
use crate::error::{SerializerError, SerializerResult};
use crate::fields::ResolvedFields;
use crate::serializer::{BoundSerializer, Serializer};
use indexmap::IndexMap;
use serde_json::Value;
use std::marker::PhantomData;
use storefront_db::{Attribute, Connection, Record};

/// Representation of related records through another serializer
pub trait NestedRepresentation: Send + Sync {
	/// Represent `records`; a single mapping unless `many` is set
	fn represent(
		&self,
		conn: &dyn Connection,
		field: &str,
		records: Vec<Box<dyn Record>>,
		many: bool,
	) -> SerializerResult<Value>;
}

struct Nested<S>(PhantomData<fn() -> S>);

impl<S: Serializer> NestedRepresentation for Nested<S> {
	fn represent(
		&self,
		conn: &dyn Connection,
		field: &str,
		records: Vec<Box<dyn Record>>,
		many: bool,
	) -> SerializerResult<Value> {
		let models = records
			.iter()
			.map(|record| {
				record
					.as_any()
					.downcast_ref::<S::Model>()
					.cloned()
					.ok_or_else(|| SerializerError::NestedType {
						field: field.to_string(),
						expected: <S::Model as storefront_db::Model>::table_name(),
						found: record.table(),
					})
			})
			.collect::<SerializerResult<Vec<_>>>()?;

		let bound = if many {
			BoundSerializer::<S>::new(conn)?.with_instances(models)
		} else {
			match models.into_iter().next() {
				Some(model) => BoundSerializer::<S>::new(conn)?.with_instance(model),
				None => return Ok(Value::Null),
			}
		};
		bound.data()
	}
}

/// Nested serializers of a serializer, keyed by relationship field
#[derive(Default)]
pub struct NestedSerializers {
	entries: IndexMap<String, Box<dyn NestedRepresentation>>,
}

impl NestedSerializers {
	pub fn new() -> Self {
		Self::default()
	}

	/// Represent relationship `field` with serializer `S`
	pub fn add<S: Serializer>(&mut self, field: impl Into<String>) -> &mut Self {
		self.entries
			.insert(field.into(), Box::new(Nested::<S>(PhantomData)));
		self
	}

	pub fn get(&self, field: &str) -> Option<&dyn NestedRepresentation> {
		self.entries.get(field).map(|n| &**n)
	}

	pub fn contains(&self, field: &str) -> bool {
		self.entries.contains_key(field)
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl std::fmt::Debug for NestedSerializers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.entries.keys()).finish()
	}
}

/// Read-only view handed to [`Serializer::represent`]
pub struct Representer<'a> {
	conn: &'a dyn Connection,
	fields: &'a ResolvedFields,
	nested: &'a NestedSerializers,
}

impl<'a> Representer<'a> {
	pub(crate) fn new(
		conn: &'a dyn Connection,
		fields: &'a ResolvedFields,
		nested: &'a NestedSerializers,
	) -> Self {
		Self {
			conn,
			fields,
			nested,
		}
	}

	pub fn conn(&self) -> &'a dyn Connection {
		self.conn
	}

	pub fn fields(&self) -> &'a ResolvedFields {
		self.fields
	}

	/// Every readable field of `record`, in field order
	pub fn represent_fields(&self, record: &dyn Record) -> SerializerResult<Data> {
		let mut out = Data::new();
		for field in self.fields.readable() {
			let value = self.represent_field(record, field)?;
			out.insert(field.to_string(), value);
		}
		Ok(out)
	}

	/// A single attribute of `record`
	pub fn represent_field(&self, record: &dyn Record, field: &str) -> SerializerResult<Value> {
		let attribute = record
			.attribute(field, self.conn)?
			.unwrap_or(Attribute::Value(Value::Null));

		match attribute {
			Attribute::Value(value) => Ok(value),
			Attribute::One(None) => Ok(Value::Null),
			Attribute::One(Some(related)) => match self.nested.get(field) {
				Some(nested) => nested.represent(self.conn, field, vec![related], false),
				None => Ok(pk_value(&*related)),
			},
			Attribute::Many(related) => match self.nested.get(field) {
				Some(nested) => nested.represent(self.conn, field, related, true),
				None => Ok(Value::Array(
					related.iter().map(|r| pk_value(&**r)).collect(),
				)),
			},
		}
	}
}

fn pk_value(record: &dyn Record) -> Value {
	record.pk().map(Value::from).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fields::MetaConfig;
	use crate::test_models::{Gadget, Part, PartSerializer, workshop};
	use rstest::rstest;
	use serde_json::json;
	use storefront_db::ConnectionExt;

	#[rstest]
	fn test_relations_fall_back_to_identifiers() {
		let db = workshop();
		let gadget = db.get::<Gadget>(1).unwrap().unwrap();
		let fields = MetaConfig::new(["id", "maker", "parts"])
			.resolve::<Gadget>()
			.unwrap();
		let nested = NestedSerializers::new();

		let out = Representer::new(&db, &fields, &nested)
			.represent_fields(&gadget)
			.unwrap();
		assert_eq!(
			Value::Object(out),
			json!({"id": 1, "maker": 1, "parts": [1, 2]})
		);
	}

	#[rstest]
	fn test_nested_many_uses_nested_serializer() {
		let db = workshop();
		let gadget = db.get::<Gadget>(1).unwrap().unwrap();
		let fields = MetaConfig::new(["id", "parts"]).resolve::<Gadget>().unwrap();
		let mut nested = NestedSerializers::new();
		nested.add::<PartSerializer>("parts");

		let out = Representer::new(&db, &fields, &nested)
			.represent_fields(&gadget)
			.unwrap();
		assert_eq!(
			out["parts"],
			json!([
				{"id": 1, "label": "stick"},
				{"id": 2, "label": "trigger"},
			])
		);
	}

	#[rstest]
	fn test_nested_type_mismatch_is_fatal() {
		let db = workshop();
		let gadget = db.get::<Gadget>(1).unwrap().unwrap();
		let fields = MetaConfig::new(["maker"]).resolve::<Gadget>().unwrap();
		let mut nested = NestedSerializers::new();
		nested.add::<PartSerializer>("maker");

		let err = Representer::new(&db, &fields, &nested)
			.represent_fields(&gadget)
			.unwrap_err();
		assert!(matches!(
			err,
			SerializerError::NestedType { ref expected, .. } if *expected == <Part as storefront_db::Model>::table_name()
		));
	}

	#[rstest]
	fn test_unset_to_one_is_null() {
		let db = workshop();
		let orphan = db.get::<Gadget>(2).unwrap().unwrap();
		let fields = MetaConfig::new(["maker"]).resolve::<Gadget>().unwrap();
		let nested = NestedSerializers::new();

		let out = Representer::new(&db, &fields, &nested)
			.represent_fields(&orphan)
			.unwrap();
		assert_eq!(out["maker"], Value::Null);
	}
}
