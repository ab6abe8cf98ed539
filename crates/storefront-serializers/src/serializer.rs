//! Serializer contract
//!
//! [`Serializer`] is the declaration side: bound model, meta configuration,
//! field validators, nested serializers, optional schema model and the
//! persistence/representation hooks. [`BoundSerializer`] is the per-request
//! object built from a declaration, a connection and either an instance to
//! represent or raw data to validate.

use crate::error::{ErrorEntry, SerializerError, SerializerResult};
use crate::fields::{MetaConfig, ResolvedFields};
use crate::persistence;
use crate::representation::{NestedSerializers, Representer};
use crate::schema::SchemaModel;
use crate::validation::{self, FieldValidators, ValidationContext};
use crate::{Data, Instance};
use serde_json::Value;
use storefront_db::{Connection, Model};

/// Variant of a serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerKind {
	/// Without an instance, `data()` echoes the validated data
	Plain,
	/// `data()` always represents the bound instance(s)
	Model,
}

/// Declaration of a serializer
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
/// use storefront_db::{Database, Model};
/// use storefront_serializers::{FieldError, FieldValidators, MetaConfig, Serializer};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Category {
///     id: Option<i64>,
///     name: String,
/// }
///
/// impl Model for Category {
///     fn table_name() -> &'static str { "category" }
///     fn columns() -> &'static [&'static str] { &["id", "name"] }
///     fn id(&self) -> Option<i64> { self.id }
///     fn set_id(&mut self, id: i64) { self.id = Some(id); }
/// }
///
/// struct CreateCategory;
///
/// impl Serializer for CreateCategory {
///     type Model = Category;
///
///     fn meta() -> MetaConfig {
///         MetaConfig::new(["name"])
///     }
///
///     fn validators(v: &mut FieldValidators<Category>) {
///         v.add("name", |_ctx, value| match value.as_str() {
///             Some(name) if !name.is_empty() => Ok(value),
///             _ => Err(FieldError::value("Name is required")),
///         });
///     }
/// }
///
/// let db = Database::new().with_model::<Category>();
/// let mut serializer = CreateCategory::from_data(&db, json!({"name": "Games"})).unwrap();
/// assert!(serializer.is_valid().unwrap());
///
/// let category = serializer.save().unwrap();
/// assert_eq!(category.id, Some(1));
/// assert_eq!(serializer.data().unwrap(), json!({"name": "Games"}));
/// ```
pub trait Serializer: Sized + 'static {
	type Model: Model;

	const KIND: SerializerKind = SerializerKind::Plain;

	fn meta() -> MetaConfig;

	/// Register the field validators
	fn validators(validators: &mut FieldValidators<Self::Model>) {
		let _ = validators;
	}

	/// Register nested serializers for relationship fields
	fn nested(nested: &mut NestedSerializers) {
		let _ = nested;
	}

	/// Schema model run after the field validators
	fn schema() -> Option<SchemaModel> {
		None
	}

	/// Represent one record
	fn represent(repr: &Representer<'_>, record: &Self::Model) -> SerializerResult<Value> {
		repr.represent_fields(record).map(Value::Object)
	}

	/// Persist validated data, returning the stored record
	///
	/// `instance` is whatever a field validator bound during validation.
	fn save(
		conn: &dyn Connection,
		data: &Data,
		instance: Option<&Self::Model>,
		read_only: &[String],
	) -> SerializerResult<Self::Model> {
		let _ = instance;
		persistence::dispatch::<Self>(conn, data, read_only)
	}

	fn create(conn: &dyn Connection, data: &Data) -> SerializerResult<Self::Model> {
		persistence::create_record(conn, data)
	}

	fn update(
		conn: &dyn Connection,
		data: &Data,
		instance: Self::Model,
		read_only: &[String],
	) -> SerializerResult<Self::Model> {
		persistence::update_record(conn, data, instance, read_only)
	}

	fn delete(conn: &dyn Connection, instance: &Self::Model) -> SerializerResult<()> {
		persistence::delete_record(conn, instance)
	}

	/// Bind nothing yet; data or instances are attached with the builders
	fn bind(conn: &dyn Connection) -> SerializerResult<BoundSerializer<'_, Self>> {
		BoundSerializer::new(conn)
	}

	/// Bind raw input for validation
	fn from_data(conn: &dyn Connection, data: Value) -> SerializerResult<BoundSerializer<'_, Self>> {
		Ok(BoundSerializer::new(conn)?.with_data(data))
	}

	/// Bind a single record for representation
	fn from_instance(
		conn: &dyn Connection,
		instance: Self::Model,
	) -> SerializerResult<BoundSerializer<'_, Self>> {
		Ok(BoundSerializer::new(conn)?.with_instance(instance))
	}

	/// Bind a collection of records (`many = true`)
	fn from_instances(
		conn: &dyn Connection,
		instances: Vec<Self::Model>,
	) -> SerializerResult<BoundSerializer<'_, Self>> {
		Ok(BoundSerializer::new(conn)?.with_instances(instances))
	}
}

/// State of the last validation pass
#[derive(Debug, Clone)]
enum Validated {
	NotRun,
	Done(Data),
}

/// A serializer bound to a connection for one operation
pub struct BoundSerializer<'c, S: Serializer> {
	conn: &'c dyn Connection,
	instance: Option<Instance<S::Model>>,
	raw: Option<Value>,
	many: bool,
	errors: Vec<ErrorEntry>,
	fields: ResolvedFields,
	nested: NestedSerializers,
	validated: Validated,
}

impl<'c, S: Serializer> BoundSerializer<'c, S> {
	/// Resolve the declaration of `S`; an unknown declared field is fatal
	pub fn new(conn: &'c dyn Connection) -> SerializerResult<Self> {
		let fields = S::meta().resolve::<S::Model>()?;
		let mut nested = NestedSerializers::new();
		S::nested(&mut nested);
		Ok(Self {
			conn,
			instance: None,
			raw: None,
			many: false,
			errors: Vec::new(),
			fields,
			nested,
			validated: Validated::NotRun,
		})
	}

	pub fn with_instance(mut self, instance: S::Model) -> Self {
		self.instance = Some(Instance::One(instance));
		self
	}

	/// Bind several records and set `many`
	pub fn with_instances(mut self, instances: Vec<S::Model>) -> Self {
		self.instance = Some(Instance::Many(instances));
		self.many = true;
		self
	}

	pub fn with_data(mut self, data: Value) -> Self {
		self.raw = Some(data);
		self
	}

	pub fn with_many(mut self, many: bool) -> Self {
		self.many = many;
		self
	}

	pub fn conn(&self) -> &'c dyn Connection {
		self.conn
	}

	pub fn fields(&self) -> &[String] {
		&self.fields.fields
	}

	pub fn write_only(&self) -> &[String] {
		&self.fields.write_only
	}

	pub fn read_only(&self) -> &[String] {
		&self.fields.read_only
	}

	pub fn many(&self) -> bool {
		self.many
	}

	/// The bound record, when a single one is bound
	pub fn instance(&self) -> Option<&S::Model> {
		match &self.instance {
			Some(Instance::One(m)) => Some(m),
			_ => None,
		}
	}

	/// Errors collected by the last validation pass
	pub fn errors(&self) -> &[ErrorEntry] {
		&self.errors
	}

	/// Validate the raw data
	///
	/// Missing or non-mapping data and keys outside the field set are fatal.
	/// Otherwise returns whether the collected error list is empty. Each call
	/// recomputes the outcome from the raw data.
	pub fn is_valid(&mut self) -> SerializerResult<bool> {
		let raw = match &self.raw {
			None => return Err(SerializerError::MissingData),
			Some(Value::Object(map)) => map,
			Some(other) => {
				return Err(SerializerError::InvalidData {
					found: storefront_validators::json_type_name(other),
				});
			}
		};
		validation::check_input_fields(raw, &self.fields)?;

		let mut validators = FieldValidators::new();
		S::validators(&mut validators);
		let schema = S::schema();

		let mut ctx = ValidationContext::new(self.conn, raw, &mut self.instance);
		let outcome = validation::run(&mut ctx, &self.fields, &validators, schema.as_ref());

		tracing::debug!(
			model = <S::Model as Model>::table_name(),
			errors = outcome.errors.len(),
			"validation finished"
		);
		let valid = outcome.is_valid();
		self.errors = outcome.errors;
		self.validated = Validated::Done(outcome.validated);
		Ok(valid)
	}

	/// Data accepted by the last validation pass
	///
	/// Available once validation has run, even when it collected errors:
	/// fields that failed are absent, every other field keeps its validated
	/// value.
	pub fn validated_data(&self) -> SerializerResult<&Data> {
		match &self.validated {
			Validated::NotRun => Err(SerializerError::NotValidated),
			Validated::Done(data) => Ok(data),
		}
	}

	/// Validated data of a pass that collected no errors
	fn accepted_data(&self) -> SerializerResult<&Data> {
		let data = self.validated_data()?;
		if self.errors.is_empty() {
			Ok(data)
		} else {
			Err(SerializerError::ValidationFailed(self.errors.len()))
		}
	}

	/// Output representation
	///
	/// With a bound instance (or instances when `many` is set) this is their
	/// representation. Without one, a plain serializer echoes its validated
	/// data and a model serializer fails.
	pub fn data(&self) -> SerializerResult<Value> {
		let Some(instance) = &self.instance else {
			return match S::KIND {
				SerializerKind::Plain => Ok(Value::Object(self.accepted_data()?.clone())),
				SerializerKind::Model => Err(SerializerError::MissingInstance),
			};
		};

		let repr = Representer::new(self.conn, &self.fields, &self.nested);
		match (instance, self.many) {
			(Instance::One(record), false) => S::represent(&repr, record),
			(Instance::Many(records), true) => records
				.iter()
				.map(|record| S::represent(&repr, record))
				.collect::<SerializerResult<Vec<_>>>()
				.map(Value::Array),
			(Instance::One(_), true) => Err(SerializerError::InstanceShape {
				expected: "a list of instances",
				many: true,
			}),
			(Instance::Many(_), false) => Err(SerializerError::InstanceShape {
				expected: "a single instance",
				many: false,
			}),
		}
	}

	/// Persist the validated data and bind the stored record
	pub fn save(&mut self) -> SerializerResult<S::Model> {
		let data = self.accepted_data()?.clone();
		persistence::ensure_persistable::<S::Model>(self.conn)?;

		let saved = S::save(self.conn, &data, self.instance(), &self.fields.read_only)?;
		tracing::info!(
			model = <S::Model as Model>::table_name(),
			id = ?saved.id(),
			"saved record"
		);
		self.instance = Some(Instance::One(saved.clone()));
		self.many = false;
		Ok(saved)
	}

	/// Delete the bound record
	pub fn delete(&mut self) -> SerializerResult<()> {
		let Some(instance) = self.instance() else {
			return Err(SerializerError::MissingInstance);
		};
		persistence::ensure_persistable::<S::Model>(self.conn)?;
		S::delete(self.conn, instance)?;
		tracing::info!(
			model = <S::Model as Model>::table_name(),
			id = ?instance.id(),
			"deleted record"
		);
		self.instance = None;
		Ok(())
	}

	/// Look up the record whose `find_by` column equals the raw value of that key
	pub fn to_instance(&self, find_by: &str) -> SerializerResult<Option<S::Model>> {
		match &self.raw {
			Some(Value::Object(raw)) => Ok(validation::find_instance(self.conn, raw, find_by)?),
			_ => Ok(None),
		}
	}
}

impl<S: Serializer> std::fmt::Debug for BoundSerializer<'_, S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BoundSerializer")
			.field("model", &<S::Model as Model>::table_name())
			.field("fields", &self.fields)
			.field("many", &self.many)
			.field("errors", &self.errors)
			.finish()
	}
}
