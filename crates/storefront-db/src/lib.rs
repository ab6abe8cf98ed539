//! # Storefront DB
//!
//! Storage handle for the storefront backend.
//!
//! ## Features
//!
//! - **Models**: static table/column/relation description of persisted entities
//! - **Records**: object-safe attribute access used for generic relationship traversal
//! - **Database**: process-wide in-memory tables with auto-increment ids and unique columns
//! - **Transactions**: explicit begin/commit/rollback, savepoints, rollback on drop
//!
//! ## Quick Start
//!
//! ```rust
//! use storefront_db::{ConnectionExt, Database, DatabaseError};
//!
//! let db = Database::new();
//! let outcome: Result<(), DatabaseError> = db.atomic(|_tx| Ok(()));
//! assert!(outcome.is_ok());
//! ```
//!
//! ## Architecture
//!
//! - [`model`]: [`Model`], [`Record`] and [`Attribute`]
//! - [`connection`]: [`Database`], the [`Connection`] trait and its typed [`ConnectionExt`] helpers
//! - [`transaction`]: [`Transaction`] and savepoints
//! - [`error`]: [`DatabaseError`]

pub mod connection;
pub mod error;
pub mod model;
pub mod transaction;

pub use connection::{Connection, ConnectionExt, Database, Store, Table};
pub use error::{DatabaseError, DatabaseResult};
pub use model::{Attribute, ID_FIELD, Model, Record, Row};
pub use transaction::{Savepoint, Transaction, TransactionState};
