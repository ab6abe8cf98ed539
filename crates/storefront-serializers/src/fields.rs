//! Field resolution
//!
//! A serializer declares its fields once, through a [`MetaConfig`]. Resolving
//! that declaration against the bound model yields the ordered field set
//! together with the write-only and read-only subsets.

use crate::error::{SerializerError, SerializerResult};
use serde_json::Value;
use storefront_db::{ID_FIELD, Model};

/// Sentinel standing for every public attribute of the model
pub const ALL_FIELDS: &str = "__all__";

/// Which attributes a serializer reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
	/// Every public attribute, in declaration order
	All,
	/// An explicit ordered list
	Explicit(Vec<String>),
}

impl FieldSpec {
	/// Build a spec from a list of names
	///
	/// A single-element list holding [`ALL_FIELDS`] means every field.
	pub fn list<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let names: Vec<String> = names.into_iter().map(Into::into).collect();
		if names.len() == 1 && names[0] == ALL_FIELDS {
			FieldSpec::All
		} else {
			FieldSpec::Explicit(names)
		}
	}

	/// Parse a declaration given as JSON: the bare sentinel or a list of names
	///
	/// # Examples
	///
	/// ```
	/// use serde_json::json;
	/// use storefront_serializers::FieldSpec;
	///
	/// assert_eq!(FieldSpec::from_value(&json!("__all__")).unwrap(), FieldSpec::All);
	/// assert_eq!(FieldSpec::from_value(&json!(["__all__"])).unwrap(), FieldSpec::All);
	/// assert_eq!(
	///     FieldSpec::from_value(&json!(["id", "name"])).unwrap(),
	///     FieldSpec::list(["id", "name"]),
	/// );
	/// ```
	pub fn from_value(value: &Value) -> SerializerResult<Self> {
		match value {
			Value::String(s) if s == ALL_FIELDS => Ok(FieldSpec::All),
			Value::Array(items) => items
				.iter()
				.map(|item| {
					item.as_str()
						.map(str::to_string)
						.ok_or(SerializerError::InvalidData {
							found: storefront_validators::json_type_name(item),
						})
				})
				.collect::<SerializerResult<Vec<_>>>()
				.map(FieldSpec::list),
			other => Err(SerializerError::InvalidData {
				found: storefront_validators::json_type_name(other),
			}),
		}
	}
}

impl From<&str> for FieldSpec {
	fn from(name: &str) -> Self {
		FieldSpec::list([name])
	}
}

impl<const N: usize> From<[&str; N]> for FieldSpec {
	fn from(names: [&str; N]) -> Self {
		FieldSpec::list(names)
	}
}

/// Meta configuration of a serializer
///
/// # Examples
///
/// ```
/// use storefront_serializers::{FieldSpec, MetaConfig};
///
/// let meta = MetaConfig::new(["first_name", "email", "password"])
///     .with_write_only_fields(["password"]);
///
/// assert_eq!(meta.fields(), &FieldSpec::list(["first_name", "email", "password"]));
/// assert_eq!(meta.read_only_fields(), &["id".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaConfig {
	fields: FieldSpec,
	write_only: Vec<String>,
	read_only: Vec<String>,
}

impl MetaConfig {
	/// `read_only` defaults to the identifier, `write_only` to nothing
	pub fn new(fields: impl Into<FieldSpec>) -> Self {
		Self {
			fields: fields.into(),
			write_only: Vec::new(),
			read_only: vec![ID_FIELD.to_string()],
		}
	}

	/// Shorthand for `MetaConfig::new(ALL_FIELDS)`
	pub fn all() -> Self {
		Self::new(FieldSpec::All)
	}

	pub fn with_write_only_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.write_only = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_read_only_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.read_only = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn fields(&self) -> &FieldSpec {
		&self.fields
	}

	pub fn write_only_fields(&self) -> &[String] {
		&self.write_only
	}

	pub fn read_only_fields(&self) -> &[String] {
		&self.read_only
	}

	/// Resolve the declaration against model `M`
	pub fn resolve<M: Model>(&self) -> SerializerResult<ResolvedFields> {
		let fields = match &self.fields {
			FieldSpec::All => public_attributes::<M>(),
			FieldSpec::Explicit(names) => {
				check_attributes::<M>(names)?;
				names.clone()
			}
		};
		check_attributes::<M>(&self.write_only)?;
		check_attributes::<M>(&self.read_only)?;

		tracing::debug!(model = M::table_name(), ?fields, "resolved serializer fields");
		Ok(ResolvedFields {
			fields,
			write_only: self.write_only.clone(),
			read_only: self.read_only.clone(),
		})
	}
}

impl From<FieldSpec> for MetaConfig {
	fn from(fields: FieldSpec) -> Self {
		Self::new(fields)
	}
}

/// Attributes not starting with an underscore, in declaration order
fn public_attributes<M: Model>() -> Vec<String> {
	M::attributes()
		.into_iter()
		.filter(|name| !name.starts_with('_'))
		.map(str::to_string)
		.collect()
}

fn check_attributes<M: Model>(names: &[String]) -> SerializerResult<()> {
	match names.iter().find(|name| !M::has_attribute(name)) {
		Some(unknown) => Err(SerializerError::UnknownField {
			field: unknown.clone(),
			model: M::table_name(),
		}),
		None => Ok(()),
	}
}

/// Outcome of field resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
	pub fields: Vec<String>,
	pub write_only: Vec<String>,
	pub read_only: Vec<String>,
}

impl ResolvedFields {
	pub fn contains(&self, field: &str) -> bool {
		self.fields.iter().any(|f| f == field)
	}

	pub fn is_write_only(&self, field: &str) -> bool {
		self.write_only.iter().any(|f| f == field)
	}

	pub fn is_read_only(&self, field: &str) -> bool {
		self.read_only.iter().any(|f| f == field)
	}

	/// Fields that appear in the representation
	pub fn readable(&self) -> impl Iterator<Item = &str> {
		self.fields
			.iter()
			.map(String::as_str)
			.filter(|f| !self.is_write_only(f))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_models::Gadget;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_all_fields_skips_internal_attributes() {
		let resolved = MetaConfig::all().resolve::<Gadget>().unwrap();
		assert_eq!(
			resolved.fields,
			vec!["id", "name", "price", "secret", "maker_id", "maker", "parts"]
		);
	}

	#[rstest]
	#[case(json!("__all__"))]
	#[case(json!(["__all__"]))]
	fn test_sentinel_spellings(#[case] spec: serde_json::Value) {
		let spec = FieldSpec::from_value(&spec).unwrap();
		let resolved = MetaConfig::new(spec).resolve::<Gadget>().unwrap();
		assert_eq!(resolved.fields.len(), 7);
	}

	#[rstest]
	fn test_explicit_fields_keep_order() {
		let resolved = MetaConfig::new(["price", "id", "name"])
			.resolve::<Gadget>()
			.unwrap();
		assert_eq!(resolved.fields, vec!["price", "id", "name"]);
		assert_eq!(resolved.read_only, vec!["id"]);
		assert!(resolved.write_only.is_empty());
	}

	#[rstest]
	fn test_unknown_field_names_first_offender() {
		let err = MetaConfig::new(["name", "colour", "weight"])
			.resolve::<Gadget>()
			.unwrap_err();
		assert_eq!(err.to_string(), "Field 'colour' does not exist in model 'gadget'");
	}

	#[rstest]
	fn test_unknown_write_only_field() {
		let err = MetaConfig::new(["name"])
			.with_write_only_fields(["pin"])
			.resolve::<Gadget>()
			.unwrap_err();
		assert!(matches!(err, SerializerError::UnknownField { field, .. } if field == "pin"));
	}

	#[rstest]
	fn test_readable_excludes_write_only() {
		let resolved = MetaConfig::new(["id", "name", "secret"])
			.with_write_only_fields(["secret"])
			.resolve::<Gadget>()
			.unwrap();
		assert_eq!(resolved.readable().collect::<Vec<_>>(), vec!["id", "name"]);
	}

	#[rstest]
	fn test_from_value_rejects_non_strings() {
		assert!(FieldSpec::from_value(&json!([1, 2])).is_err());
		assert!(FieldSpec::from_value(&json!("name")).is_err());
	}
}
