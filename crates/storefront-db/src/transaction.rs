//! Transaction management
//!
//! A [`Transaction`] holds the database lock for its whole lifetime and keeps
//! a snapshot of the tables taken at `begin`. Committing drops the snapshot;
//! rolling back (explicitly, or by dropping an active transaction) restores it.

use crate::connection::{Connection, Store};
use crate::error::{DatabaseError, DatabaseResult};
use parking_lot::MutexGuard;
use std::cell::{Cell, RefCell, RefMut};
use std::ops::DerefMut;

/// Transaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
	Active,
	Committed,
	RolledBack,
}

/// Savepoint for nested transactions
#[derive(Debug, Clone)]
pub struct Savepoint {
	name: String,
	pub depth: usize,
	snapshot: Store,
}

impl Savepoint {
	pub fn name(&self) -> &str {
		&self.name
	}
}

fn validate_savepoint_name(name: &str) -> DatabaseResult<()> {
	let mut chars = name.chars();
	let valid = match chars.next() {
		Some(first) => {
			(first.is_ascii_alphabetic() || first == '_')
				&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		None => false,
	};
	if valid {
		Ok(())
	} else {
		Err(DatabaseError::InvalidSavepointName(name.to_string()))
	}
}

/// An open transaction
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use storefront_db::{ConnectionExt, Database, Model};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Tag {
///     id: Option<i64>,
///     label: String,
/// }
///
/// impl Model for Tag {
///     fn table_name() -> &'static str { "tag" }
///     fn columns() -> &'static [&'static str] { &["id", "label"] }
///     fn id(&self) -> Option<i64> { self.id }
///     fn set_id(&mut self, id: i64) { self.id = Some(id); }
/// }
///
/// let db = Database::new().with_model::<Tag>();
///
/// let tx = db.begin();
/// tx.insert(&mut Tag { id: None, label: "new".to_string() }).unwrap();
/// tx.rollback().unwrap();
///
/// assert_eq!(db.count::<Tag>().unwrap(), 0);
/// ```
pub struct Transaction<'a> {
	guard: RefCell<MutexGuard<'a, Store>>,
	snapshot: Store,
	savepoints: RefCell<Vec<Savepoint>>,
	state: Cell<TransactionState>,
}

impl<'a> Transaction<'a> {
	pub(crate) fn begin(guard: MutexGuard<'a, Store>) -> Self {
		tracing::debug!("transaction started");
		let snapshot = guard.clone();
		Self {
			guard: RefCell::new(guard),
			snapshot,
			savepoints: RefCell::new(Vec::new()),
			state: Cell::new(TransactionState::Active),
		}
	}

	pub fn state(&self) -> TransactionState {
		self.state.get()
	}

	pub fn is_active(&self) -> bool {
		self.state.get() == TransactionState::Active
	}

	/// Number of open savepoints
	pub fn depth(&self) -> usize {
		self.savepoints.borrow().len()
	}

	fn ensure_active(&self) -> DatabaseResult<()> {
		if self.is_active() {
			Ok(())
		} else {
			Err(DatabaseError::TransactionClosed)
		}
	}

	/// Make every write of this transaction permanent
	pub fn commit(self) -> DatabaseResult<()> {
		self.ensure_active()?;
		self.state.set(TransactionState::Committed);
		tracing::debug!("transaction committed");
		Ok(())
	}

	/// Discard every write of this transaction
	pub fn rollback(self) -> DatabaseResult<()> {
		self.ensure_active()?;
		self.restore_snapshot();
		tracing::debug!("transaction rolled back");
		Ok(())
	}

	fn restore_snapshot(&self) {
		**self.guard.borrow_mut() = self.snapshot.clone();
		self.savepoints.borrow_mut().clear();
		self.state.set(TransactionState::RolledBack);
	}

	/// Mark the current state so it can be restored with [`Transaction::rollback_to`]
	pub fn savepoint(&self, name: impl Into<String>) -> DatabaseResult<()> {
		self.ensure_active()?;
		let name = name.into();
		validate_savepoint_name(&name)?;
		let snapshot = self.guard.borrow().clone();
		let mut savepoints = self.savepoints.borrow_mut();
		let depth = savepoints.len() + 1;
		savepoints.push(Savepoint {
			name,
			depth,
			snapshot,
		});
		Ok(())
	}

	fn position(&self, name: &str) -> DatabaseResult<usize> {
		self.savepoints
			.borrow()
			.iter()
			.rposition(|sp| sp.name == name)
			.ok_or_else(|| DatabaseError::UnknownSavepoint(name.to_string()))
	}

	/// Undo everything written since the savepoint, which stays open
	pub fn rollback_to(&self, name: &str) -> DatabaseResult<()> {
		self.ensure_active()?;
		let index = self.position(name)?;
		let mut savepoints = self.savepoints.borrow_mut();
		savepoints.truncate(index + 1);
		if let Some(sp) = savepoints.last() {
			**self.guard.borrow_mut() = sp.snapshot.clone();
		}
		tracing::debug!(savepoint = name, "rolled back to savepoint");
		Ok(())
	}

	/// Forget the savepoint (and every later one) keeping the writes
	pub fn release(&self, name: &str) -> DatabaseResult<()> {
		self.ensure_active()?;
		let index = self.position(name)?;
		self.savepoints.borrow_mut().truncate(index);
		Ok(())
	}
}

impl Connection for Transaction<'_> {
	fn store(&self) -> Box<dyn DerefMut<Target = Store> + '_> {
		Box::new(RefMut::map(self.guard.borrow_mut(), |guard| &mut **guard))
	}

	fn atomic_dyn(&self, body: &mut dyn FnMut(&dyn Connection) -> bool) -> DatabaseResult<()> {
		self.ensure_active()?;
		let name = format!("atomic_{}", self.depth() + 1);
		self.savepoint(name.as_str())?;
		if body(self) {
			self.release(&name)
		} else {
			self.rollback_to(&name)?;
			self.release(&name)
		}
	}
}

impl Drop for Transaction<'_> {
	fn drop(&mut self) {
		if self.is_active() {
			tracing::warn!("transaction dropped without commit, rolling back");
			self.restore_snapshot();
		}
	}
}

impl std::fmt::Debug for Transaction<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Transaction")
			.field("state", &self.state.get())
			.field("depth", &self.depth())
			.finish()
	}
}
