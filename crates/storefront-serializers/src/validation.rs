//! Validation pipeline
//!
//! Field validators are registered by name in a [`FieldValidators`] registry.
//! The pipeline walks the resolved fields in order and runs the validator of
//! every field that has one. A failing validator produces an [`ErrorEntry`]
//! and drops the field from the validated data; the remaining fields are still
//! validated. An optional [`SchemaModel`] pass runs last.

use crate::error::{ErrorEntry, FieldError, SerializerError, SerializerResult};
use crate::fields::ResolvedFields;
use crate::schema::SchemaModel;
use crate::{Data, Instance};
use indexmap::IndexMap;
use serde_json::Value;
use storefront_db::{Connection, ConnectionExt, DatabaseResult, ID_FIELD, Model};

/// A field validator: receives the raw value (`null` when absent) and returns
/// the value to keep in the validated data
pub type FieldValidatorFn<M> =
	Box<dyn Fn(&mut ValidationContext<'_, M>, Value) -> Result<Value, FieldError> + Send + Sync>;

/// Registry of field validators, keyed by field name
pub struct FieldValidators<M: Model> {
	validators: IndexMap<String, FieldValidatorFn<M>>,
}

impl<M: Model> FieldValidators<M> {
	pub fn new() -> Self {
		Self {
			validators: IndexMap::new(),
		}
	}

	/// Register the validator of `field`, replacing any previous one
	///
	/// # Examples
	///
	/// ```
	/// # use serde::{Deserialize, Serialize};
	/// # use storefront_db::Model;
	/// # #[derive(Debug, Clone, Serialize, Deserialize)]
	/// # struct Category { id: Option<i64>, name: String }
	/// # impl Model for Category {
	/// #     fn table_name() -> &'static str { "category" }
	/// #     fn columns() -> &'static [&'static str] { &["id", "name"] }
	/// #     fn id(&self) -> Option<i64> { self.id }
	/// #     fn set_id(&mut self, id: i64) { self.id = Some(id); }
	/// # }
	/// use serde_json::Value;
	/// use storefront_serializers::{FieldError, FieldValidators};
	///
	/// let mut validators = FieldValidators::<Category>::new();
	/// validators.add("name", |_ctx, value| match value.as_str() {
	///     Some(name) => Ok(Value::String(name.trim().to_string())),
	///     None => Err(FieldError::value("Name is required")),
	/// });
	///
	/// assert!(validators.contains("name"));
	/// ```
	pub fn add<F>(&mut self, field: impl Into<String>, validator: F) -> &mut Self
	where
		F: Fn(&mut ValidationContext<'_, M>, Value) -> Result<Value, FieldError>
			+ Send
			+ Sync
			+ 'static,
	{
		self.validators.insert(field.into(), Box::new(validator));
		self
	}

	pub fn contains(&self, field: &str) -> bool {
		self.validators.contains_key(field)
	}

	pub fn get(&self, field: &str) -> Option<&FieldValidatorFn<M>> {
		self.validators.get(field)
	}

	pub fn len(&self) -> usize {
		self.validators.len()
	}

	pub fn is_empty(&self) -> bool {
		self.validators.is_empty()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.validators.keys().map(String::as_str)
	}
}

impl<M: Model> Default for FieldValidators<M> {
	fn default() -> Self {
		Self::new()
	}
}

/// What a field validator can see and touch while it runs
pub struct ValidationContext<'a, M: Model> {
	conn: &'a dyn Connection,
	data: &'a Data,
	instance: &'a mut Option<Instance<M>>,
}

impl<'a, M: Model> ValidationContext<'a, M> {
	pub(crate) fn new(
		conn: &'a dyn Connection,
		data: &'a Data,
		instance: &'a mut Option<Instance<M>>,
	) -> Self {
		Self {
			conn,
			data,
			instance,
		}
	}

	pub fn conn(&self) -> &'a dyn Connection {
		self.conn
	}

	/// The whole raw input
	pub fn data(&self) -> &'a Data {
		self.data
	}

	/// Raw value of another field
	pub fn get(&self, field: &str) -> Option<&'a Value> {
		self.data.get(field)
	}

	pub fn instance(&self) -> Option<&M> {
		match self.instance.as_ref() {
			Some(Instance::One(m)) => Some(m),
			_ => None,
		}
	}

	/// Bind the record the serializer acts on (used by `delete`, `save` overrides)
	pub fn set_instance(&mut self, instance: M) {
		*self.instance = Some(Instance::One(instance));
	}

	/// Look up the record whose `find_by` column equals the raw value of that field
	pub fn to_instance(&self, find_by: &str) -> DatabaseResult<Option<M>> {
		find_instance::<M>(self.conn, self.data, find_by)
	}
}

pub(crate) fn find_instance<M: Model>(
	conn: &dyn Connection,
	data: &Data,
	find_by: &str,
) -> DatabaseResult<Option<M>> {
	let Some(value) = data.get(find_by) else {
		return Ok(None);
	};
	if find_by == ID_FIELD {
		match value.as_i64() {
			Some(id) => conn.get::<M>(id),
			None => Ok(None),
		}
	} else {
		conn.find_by::<M>(find_by, value)
	}
}

/// Result of one validation pass
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
	pub validated: Data,
	pub errors: Vec<ErrorEntry>,
}

impl ValidationOutcome {
	pub fn is_valid(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Reject raw keys outside the resolved field set
pub(crate) fn check_input_fields(raw: &Data, fields: &ResolvedFields) -> SerializerResult<()> {
	match raw.keys().find(|key| !fields.contains(key)) {
		Some(key) => Err(SerializerError::UnexpectedField(key.clone())),
		None => Ok(()),
	}
}

/// Run the field validators, then the schema pass when every field passed
pub(crate) fn run<M: Model>(
	ctx: &mut ValidationContext<'_, M>,
	fields: &ResolvedFields,
	validators: &FieldValidators<M>,
	schema: Option<&SchemaModel>,
) -> ValidationOutcome {
	for name in validators.names() {
		if !fields.contains(name) {
			tracing::warn!(
				field = name,
				model = M::table_name(),
				"validator registered for a field outside the serializer fields, ignored"
			);
		}
	}

	let raw = ctx.data();
	let mut validated = raw.clone();
	let mut errors = Vec::new();

	for field in &fields.fields {
		let Some(validator) = validators.get(field) else {
			continue;
		};
		let supplied = raw.get(field);
		let input = supplied.cloned().unwrap_or(Value::Null);

		match validator(&mut *ctx, input.clone()) {
			Ok(value) => {
				if supplied.is_some() {
					validated.insert(field.clone(), value);
				}
			}
			Err(err) => {
				tracing::debug!(field = %field, kind = %err.kind(), "field validation failed");
				validated.shift_remove(field.as_str());
				errors.push(ErrorEntry::from_field_error(
					field,
					&err,
					input,
					&fields.write_only,
				));
			}
		}
	}

	if let Some(schema) = schema {
		if !errors.is_empty() {
			// Failed fields are already reported; the schema would only add
			// "missing field" entries for them
			tracing::debug!(schema = schema.name(), "schema pass skipped after field errors");
			return ValidationOutcome { validated, errors };
		}
		match schema.validate(&validated, &fields.write_only) {
			Ok(normalized) => validated = normalized,
			Err(schema_errors) => {
				tracing::debug!(
					schema = schema.name(),
					count = schema_errors.len(),
					"schema validation failed"
				);
				errors.extend(schema_errors);
			}
		}
	}

	ValidationOutcome { validated, errors }
}
