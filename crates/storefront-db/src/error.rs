//! Storage errors

use serde_json::Value;

/// Errors raised by the storage layer
///
/// These are never collected as soft validation failures: they propagate to
/// the caller, which decides how to present them (for example a unique
/// violation on `email` becomes an "existing email" response).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatabaseError {
	/// The model's table was never registered with the database
	#[error("Table '{0}' is not registered with the database")]
	UnknownTable(String),

	/// A row with the given identifier does not exist
	#[error("No row with id {id} in table '{table}'")]
	NotFound { table: String, id: i64 },

	/// A unique column already holds the value
	#[error("Unique violation on {table}.{field} with value {value}")]
	UniqueViolation {
		table: String,
		field: String,
		value: Value,
	},

	/// The record could not be converted to or from a row
	#[error("Invalid row for table '{table}': {message}")]
	InvalidRow { table: String, message: String },

	/// An attribute name that is not a column of the table
	#[error("Table '{table}' has no column '{column}'")]
	UnknownColumn { table: String, column: String },

	/// The transaction was already committed or rolled back
	#[error("Transaction is no longer active")]
	TransactionClosed,

	/// A savepoint name that was never created
	#[error("Unknown savepoint '{0}'")]
	UnknownSavepoint(String),

	/// Savepoint names are identifiers: alphanumerics and underscores
	#[error("Invalid savepoint name '{0}'")]
	InvalidSavepointName(String),
}

impl DatabaseError {
	/// Check if this is a uniqueness violation
	pub fn is_unique_violation(&self) -> bool {
		matches!(self, DatabaseError::UniqueViolation { .. })
	}

	/// Name of the offending unique column, if any
	pub fn violated_field(&self) -> Option<&str> {
		match self {
			DatabaseError::UniqueViolation { field, .. } => Some(field.as_str()),
			_ => None,
		}
	}
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
