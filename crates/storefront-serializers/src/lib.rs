//! # Storefront Serializers
//!
//! Declarative serializers for the storefront backend.
//!
//! A serializer binds a model, declares which of its attributes it exposes,
//! and attaches per-field validators. The framework then takes care of the
//! rest: rejecting unexpected input, running every validator and collecting
//! the failures, representing records (including nested relationships), and
//! dispatching persistence to create, update or delete.
//!
//! ## Features
//!
//! - **Field resolution**: explicit field lists or the `__all__` sentinel, write-only and read-only subsets
//! - **Validation pipeline**: per-field validators that never short-circuit, plus an optional schema pass
//! - **Error entries**: structured `{msg, field, input, type}` records with sensitive inputs redacted
//! - **Representation**: output mappings with nested serializers for relationships
//! - **Persistence dispatch**: update when the identifier exists, create otherwise
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//! use storefront_db::{Database, Model};
//! use storefront_serializers::{ErrorKind, FieldError, FieldValidators, MetaConfig, Serializer};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Account {
//!     id: Option<i64>,
//!     email: String,
//!     password: String,
//! }
//!
//! impl Model for Account {
//!     fn table_name() -> &'static str { "account" }
//!     fn columns() -> &'static [&'static str] { &["id", "email", "password"] }
//!     fn id(&self) -> Option<i64> { self.id }
//!     fn set_id(&mut self, id: i64) { self.id = Some(id); }
//! }
//!
//! struct Signup;
//!
//! impl Serializer for Signup {
//!     type Model = Account;
//!
//!     fn meta() -> MetaConfig {
//!         MetaConfig::new(["email", "password"]).with_write_only_fields(["password"])
//!     }
//!
//!     fn validators(v: &mut FieldValidators<Account>) {
//!         v.add("password", |_ctx, value| match value.as_str() {
//!             Some(p) if p.len() >= 8 => Ok(value),
//!             _ => Err(FieldError::value("Password too short")),
//!         });
//!     }
//! }
//!
//! let db = Database::new().with_model::<Account>();
//! let mut signup = Signup::from_data(&db, json!({"email": "a@b.io", "password": "123"})).unwrap();
//!
//! assert!(!signup.is_valid().unwrap());
//! let entry = &signup.errors()[0];
//! assert_eq!(entry.kind, ErrorKind::ValueError);
//! assert_eq!(entry.input, json!("[REDACTED]"));
//! ```
//!
//! ## Architecture
//!
//! - [`fields`]: [`MetaConfig`] and field resolution
//! - [`validation`]: [`FieldValidators`], [`ValidationContext`] and the pipeline
//! - [`schema`]: [`SchemaModel`], the strict pass backed by `validator`
//! - [`representation`]: [`Representer`] and [`NestedSerializers`]
//! - [`persistence`]: default create/update/delete and save dispatch
//! - [`serializer`]: the [`Serializer`] declaration and [`BoundSerializer`]
//! - [`error`]: [`SerializerError`], [`FieldError`] and [`ErrorEntry`]

pub mod error;
pub mod fields;
pub mod persistence;
pub mod representation;
pub mod schema;
pub mod serializer;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_models;

pub use error::{
	ErrorEntry, ErrorKind, FieldError, REDACTED, SerializerError, SerializerResult, is_sensitive,
};
pub use fields::{ALL_FIELDS, FieldSpec, MetaConfig, ResolvedFields};
pub use representation::{NestedRepresentation, NestedSerializers, Representer};
pub use schema::SchemaModel;
pub use serializer::{BoundSerializer, Serializer, SerializerKind};
pub use validation::{FieldValidatorFn, FieldValidators, ValidationContext, ValidationOutcome};

/// A mapping of field names to JSON values
pub type Data = serde_json::Map<String, serde_json::Value>;

/// Record(s) a serializer is bound to
#[derive(Debug, Clone, PartialEq)]
pub enum Instance<M> {
	One(M),
	Many(Vec<M>),
}

/// Re-export commonly used types
pub mod prelude {
	pub use crate::error::*;
	pub use crate::fields::*;
	pub use crate::representation::{NestedSerializers, Representer};
	pub use crate::schema::SchemaModel;
	pub use crate::serializer::*;
	pub use crate::validation::{FieldValidators, ValidationContext};
	pub use crate::{Data, Instance};
}
