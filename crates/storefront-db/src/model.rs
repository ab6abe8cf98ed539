//! Model and record traits
//!
//! A [`Model`] is the static description of a persisted entity: its table,
//! its columns and its relationships. Rows are stored as JSON objects, so the
//! conversion between a model and its row goes through serde.
//!
//! [`Record`] is the object-safe view of a model instance. The representation
//! layer walks records without knowing their concrete type, which is what
//! makes nested serialization of relationships generic.

use crate::connection::Connection;
use crate::error::{DatabaseError, DatabaseResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// A stored row: column name to JSON value, in column order
pub type Row = serde_json::Map<String, Value>;

/// Name of the identifier column shared by every table
pub const ID_FIELD: &str = "id";

/// Value of a record attribute as seen by the representation layer
pub enum Attribute {
	/// A plain column value
	Value(Value),
	/// A to-one relationship (`None` when the foreign key is unset)
	One(Option<Box<dyn Record>>),
	/// A to-many relationship
	Many(Vec<Box<dyn Record>>),
}

impl Attribute {
	/// Wrap an optional related model as a to-one attribute
	pub fn one<M: Model>(related: Option<M>) -> Self {
		Attribute::One(related.map(|m| Box::new(m) as Box<dyn Record>))
	}

	/// Wrap related models as a to-many attribute
	pub fn many<M: Model>(related: Vec<M>) -> Self {
		Attribute::Many(
			related
				.into_iter()
				.map(|m| Box::new(m) as Box<dyn Record>)
				.collect(),
		)
	}
}

impl fmt::Debug for Attribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Attribute::Value(v) => f.debug_tuple("Value").field(v).finish(),
			Attribute::One(r) => f
				.debug_tuple("One")
				.field(&r.as_ref().map(|r| (r.table(), r.pk())))
				.finish(),
			Attribute::Many(rs) => f
				.debug_tuple("Many")
				.field(&rs.iter().map(|r| (r.table(), r.pk())).collect::<Vec<_>>())
				.finish(),
		}
	}
}

/// A persisted entity type
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use storefront_db::Model;
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
/// assert_eq!(Category::attributes(), vec!["id", "name"]);
/// assert!(Category::has_attribute("name"));
/// ```
pub trait Model: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
	/// Table the rows of this model live in
	fn table_name() -> &'static str;

	/// Stored columns in declaration order, including `id`
	fn columns() -> &'static [&'static str];

	/// Relationship attributes in declaration order
	fn relations() -> &'static [&'static str] {
		&[]
	}

	/// Columns that must hold distinct values across the table
	fn unique_columns() -> &'static [&'static str] {
		&[]
	}

	fn id(&self) -> Option<i64>;

	fn set_id(&mut self, id: i64);

	/// Resolve a relationship attribute against the storage
	fn relation(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		let _ = (name, conn);
		Ok(None)
	}

	/// Every declared attribute: columns first, then relationships
	fn attributes() -> Vec<&'static str> {
		Self::columns()
			.iter()
			.chain(Self::relations().iter())
			.copied()
			.collect()
	}

	fn has_attribute(name: &str) -> bool {
		Self::columns().contains(&name) || Self::relations().contains(&name)
	}

	fn has_column(name: &str) -> bool {
		Self::columns().contains(&name)
	}

	/// Convert the record to its stored row
	fn to_row(&self) -> DatabaseResult<Row> {
		match serde_json::to_value(self) {
			Ok(Value::Object(row)) => Ok(row),
			Ok(other) => Err(DatabaseError::InvalidRow {
				table: Self::table_name().to_string(),
				message: format!("expected an object, got {}", other),
			}),
			Err(e) => Err(DatabaseError::InvalidRow {
				table: Self::table_name().to_string(),
				message: e.to_string(),
			}),
		}
	}

	/// Build a record from a stored row (or from initializer data)
	fn from_row(row: Row) -> DatabaseResult<Self> {
		serde_json::from_value(Value::Object(row)).map_err(|e| DatabaseError::InvalidRow {
			table: Self::table_name().to_string(),
			message: e.to_string(),
		})
	}

	/// Set a single column from a JSON value
	fn set_attribute(&mut self, name: &str, value: Value) -> DatabaseResult<()> {
		if !Self::has_column(name) {
			return Err(DatabaseError::UnknownColumn {
				table: Self::table_name().to_string(),
				column: name.to_string(),
			});
		}
		let mut row = self.to_row()?;
		row.insert(name.to_string(), value);
		*self = Self::from_row(row)?;
		Ok(())
	}
}

/// Object-safe view of a model instance
pub trait Record: fmt::Debug + Send + Sync {
	fn table(&self) -> &'static str;

	fn pk(&self) -> Option<i64>;

	/// Read an attribute; `None` when the record has no such attribute
	fn attribute(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>>;

	fn as_any(&self) -> &dyn Any;

	fn boxed_clone(&self) -> Box<dyn Record>;
}

impl<M: Model> Record for M {
	fn table(&self) -> &'static str {
		M::table_name()
	}

	fn pk(&self) -> Option<i64> {
		self.id()
	}

	fn attribute(&self, name: &str, conn: &dyn Connection) -> DatabaseResult<Option<Attribute>> {
		if M::has_column(name) {
			let mut row = self.to_row()?;
			let value = row.remove(name).unwrap_or(Value::Null);
			return Ok(Some(Attribute::Value(value)));
		}
		if M::relations().contains(&name) {
			return self.relation(name, conn);
		}
		Ok(None)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn boxed_clone(&self) -> Box<dyn Record> {
		Box::new(self.clone())
	}
}
