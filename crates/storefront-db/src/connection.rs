//! Storage handle
//!
//! [`Database`] owns every table. Each call through a plain `Database`
//! commits immediately; wrap multi-step work in [`ConnectionExt::atomic`] (or
//! an explicit [`Transaction`]) to make it all-or-nothing.

use crate::error::{DatabaseError, DatabaseResult};
use crate::model::{ID_FIELD, Model, Row};
use crate::transaction::Transaction;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::DerefMut;

/// A single table: rows keyed by identifier
#[derive(Debug, Clone)]
pub struct Table {
	name: &'static str,
	columns: Vec<&'static str>,
	unique: Vec<&'static str>,
	rows: BTreeMap<i64, Row>,
	next_id: i64,
}

impl Table {
	fn new(name: &'static str, columns: &[&'static str], unique: &[&'static str]) -> Self {
		Self {
			name,
			columns: columns.to_vec(),
			unique: unique.to_vec(),
			rows: BTreeMap::new(),
			next_id: 1,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn columns(&self) -> &[&'static str] {
		&self.columns
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn get(&self, id: i64) -> Option<&Row> {
		self.rows.get(&id)
	}

	pub fn rows(&self) -> impl Iterator<Item = &Row> {
		self.rows.values()
	}

	fn check_unique(&self, row: &Row, own_id: Option<i64>) -> DatabaseResult<()> {
		for field in &self.unique {
			let Some(value) = row.get(*field) else {
				continue;
			};
			if value.is_null() {
				continue;
			}
			let taken = self
				.rows
				.iter()
				.any(|(id, other)| Some(*id) != own_id && other.get(*field) == Some(value));
			if taken {
				return Err(DatabaseError::UniqueViolation {
					table: self.name.to_string(),
					field: (*field).to_string(),
					value: value.clone(),
				});
			}
		}
		Ok(())
	}

	/// Insert a row, assigning the next identifier when `id` is null
	fn insert(&mut self, mut row: Row) -> DatabaseResult<i64> {
		let id = match row.get(ID_FIELD).and_then(Value::as_i64) {
			Some(id) => {
				if self.rows.contains_key(&id) {
					return Err(DatabaseError::UniqueViolation {
						table: self.name.to_string(),
						field: ID_FIELD.to_string(),
						value: Value::from(id),
					});
				}
				id
			}
			None => self.next_id,
		};
		self.check_unique(&row, Some(id))?;
		row.insert(ID_FIELD.to_string(), Value::from(id));
		self.rows.insert(id, row);
		self.next_id = self.next_id.max(id + 1);
		Ok(id)
	}

	fn update(&mut self, id: i64, mut row: Row) -> DatabaseResult<()> {
		if !self.rows.contains_key(&id) {
			return Err(DatabaseError::NotFound {
				table: self.name.to_string(),
				id,
			});
		}
		self.check_unique(&row, Some(id))?;
		row.insert(ID_FIELD.to_string(), Value::from(id));
		self.rows.insert(id, row);
		Ok(())
	}

	fn delete(&mut self, id: i64) -> DatabaseResult<Row> {
		self.rows.remove(&id).ok_or_else(|| DatabaseError::NotFound {
			table: self.name.to_string(),
			id,
		})
	}
}

/// All tables of a database
#[derive(Debug, Clone, Default)]
pub struct Store {
	tables: IndexMap<&'static str, Table>,
}

impl Store {
	pub fn table(&self, name: &str) -> DatabaseResult<&Table> {
		self.tables
			.get(name)
			.ok_or_else(|| DatabaseError::UnknownTable(name.to_string()))
	}

	fn table_mut(&mut self, name: &str) -> DatabaseResult<&mut Table> {
		self.tables
			.get_mut(name)
			.ok_or_else(|| DatabaseError::UnknownTable(name.to_string()))
	}

	pub fn has_table(&self, name: &str) -> bool {
		self.tables.contains_key(name)
	}

	pub fn table_names(&self) -> Vec<&'static str> {
		self.tables.keys().copied().collect()
	}

	pub fn insert_row(&mut self, table: &str, row: Row) -> DatabaseResult<i64> {
		self.table_mut(table)?.insert(row)
	}

	pub fn update_row(&mut self, table: &str, id: i64, row: Row) -> DatabaseResult<()> {
		self.table_mut(table)?.update(id, row)
	}

	pub fn delete_row(&mut self, table: &str, id: i64) -> DatabaseResult<Row> {
		self.table_mut(table)?.delete(id)
	}
}

/// A handle through which storage is read and written
///
/// Implemented by [`Database`] (autocommit) and [`Transaction`]. Use the
/// typed helpers of [`ConnectionExt`] rather than these primitives.
pub trait Connection {
	/// Borrow the tables for the duration of the returned guard
	///
	/// The guard must be dropped before the connection is used again.
	fn store(&self) -> Box<dyn DerefMut<Target = Store> + '_>;

	/// Run `body` atomically; it returns `true` to keep its writes
	fn atomic_dyn(&self, body: &mut dyn FnMut(&dyn Connection) -> bool) -> DatabaseResult<()>;
}

/// Typed operations available on every connection
pub trait ConnectionExt: Connection {
	fn has_table(&self, name: &str) -> bool {
		self.store().has_table(name)
	}

	fn get<M: Model>(&self, id: i64) -> DatabaseResult<Option<M>> {
		let row = self.store().table(M::table_name())?.get(id).cloned();
		row.map(M::from_row).transpose()
	}

	fn exists<M: Model>(&self, id: i64) -> DatabaseResult<bool> {
		Ok(self.store().table(M::table_name())?.get(id).is_some())
	}

	fn all<M: Model>(&self) -> DatabaseResult<Vec<M>> {
		let rows: Vec<Row> = self
			.store()
			.table(M::table_name())?
			.rows()
			.cloned()
			.collect();
		rows.into_iter().map(M::from_row).collect()
	}

	fn count<M: Model>(&self) -> DatabaseResult<usize> {
		Ok(self.store().table(M::table_name())?.len())
	}

	fn filter<M, F>(&self, predicate: F) -> DatabaseResult<Vec<M>>
	where
		M: Model,
		F: Fn(&M) -> bool,
	{
		Ok(self
			.all::<M>()?
			.into_iter()
			.filter(|m| predicate(m))
			.collect())
	}

	/// First record whose `column` equals `value`
	fn find_by<M: Model>(&self, column: &str, value: &Value) -> DatabaseResult<Option<M>> {
		let row = self
			.store()
			.table(M::table_name())?
			.rows()
			.find(|row| row.get(column) == Some(value))
			.cloned();
		row.map(M::from_row).transpose()
	}

	/// Insert a new record and write the assigned identifier back into it
	fn insert<M: Model>(&self, record: &mut M) -> DatabaseResult<()> {
		let row = record.to_row()?;
		let id = self.store().insert_row(M::table_name(), row)?;
		record.set_id(id);
		tracing::info!(table = M::table_name(), id, "inserted row");
		Ok(())
	}

	fn update<M: Model>(&self, record: &M) -> DatabaseResult<()> {
		let id = record.id().ok_or_else(|| DatabaseError::InvalidRow {
			table: M::table_name().to_string(),
			message: "cannot update a record without an id".to_string(),
		})?;
		let row = record.to_row()?;
		self.store().update_row(M::table_name(), id, row)?;
		tracing::info!(table = M::table_name(), id, "updated row");
		Ok(())
	}

	/// Insert the record, or update it when a row with its id already exists
	fn save<M: Model>(&self, record: &mut M) -> DatabaseResult<()> {
		match record.id() {
			Some(id) if self.exists::<M>(id)? => self.update(record),
			_ => self.insert(record),
		}
	}

	fn delete<M: Model>(&self, record: &M) -> DatabaseResult<()> {
		let id = record.id().ok_or_else(|| DatabaseError::InvalidRow {
			table: M::table_name().to_string(),
			message: "cannot delete a record without an id".to_string(),
		})?;
		self.store().delete_row(M::table_name(), id)?;
		tracing::info!(table = M::table_name(), id, "deleted row");
		Ok(())
	}

	/// Run `f` inside a transaction: committed on `Ok`, rolled back on `Err`
	///
	/// Nested calls on a transaction use a savepoint, so an inner failure
	/// only undoes the inner writes.
	fn atomic<T, E, F>(&self, f: F) -> Result<T, E>
	where
		E: From<DatabaseError>,
		F: FnOnce(&dyn Connection) -> Result<T, E>,
	{
		let mut f = Some(f);
		let mut outcome: Option<Result<T, E>> = None;
		self.atomic_dyn(&mut |conn| {
			let Some(f) = f.take() else {
				return false;
			};
			let result = f(conn);
			let commit = result.is_ok();
			outcome = Some(result);
			commit
		})?;
		outcome.unwrap_or_else(|| Err(DatabaseError::TransactionClosed.into()))
	}
}

impl<C: Connection + ?Sized> ConnectionExt for C {}

/// Process-wide storage
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use storefront_db::{ConnectionExt, Database, Model};
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
/// let db = Database::new().with_model::<Category>();
/// let mut games = Category { id: None, name: "Games".to_string() };
/// db.insert(&mut games).unwrap();
///
/// assert_eq!(games.id, Some(1));
/// assert_eq!(db.get::<Category>(1).unwrap().unwrap().name, "Games");
/// ```
#[derive(Debug, Default)]
pub struct Database {
	store: Mutex<Store>,
}

impl Database {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create the table for `M` if it does not exist yet
	pub fn register<M: Model>(&self) {
		let mut store = self.store.lock();
		if !store.has_table(M::table_name()) {
			tracing::debug!(table = M::table_name(), "registering table");
			store.tables.insert(
				M::table_name(),
				Table::new(M::table_name(), M::columns(), M::unique_columns()),
			);
		}
	}

	/// Builder form of [`Database::register`]
	pub fn with_model<M: Model>(self) -> Self {
		self.register::<M>();
		self
	}

	/// Start a transaction; it holds the database until committed or dropped
	pub fn begin(&self) -> Transaction<'_> {
		Transaction::begin(self.store.lock())
	}

	pub fn table_names(&self) -> Vec<&'static str> {
		self.store.lock().table_names()
	}
}

impl Connection for Database {
	fn store(&self) -> Box<dyn DerefMut<Target = Store> + '_> {
		Box::new(self.store.lock())
	}

	fn atomic_dyn(&self, body: &mut dyn FnMut(&dyn Connection) -> bool) -> DatabaseResult<()> {
		let tx = self.begin();
		if body(&tx) {
			tx.commit()
		} else {
			tx.rollback()
		}
	}
}
