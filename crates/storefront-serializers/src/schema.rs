//! Strict schema pass
//!
//! A serializer may attach a schema model: a serde type that also derives
//! [`validator::Validate`]. After the field validators ran, the validated data
//! is deserialized into that type and validated. Any failure is appended to
//! the serializer errors with kind `schema_error`; on success the normalized
//! output of the model (defaults filled in, types coerced) replaces the
//! validated data. The pass only runs when every field validator succeeded.
//!
//! Deserialization messages may quote the offending input, so values of
//! sensitive fields are masked in them.

use crate::Data;
use crate::error::{ErrorEntry, ErrorKind, REDACTED, is_sensitive};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

type CheckFn = fn(&Data, &[String]) -> Result<Data, Vec<ErrorEntry>>;

/// Handle on a schema model type
#[derive(Clone, Copy)]
pub struct SchemaModel {
	name: &'static str,
	check: CheckFn,
}

impl SchemaModel {
	/// # Examples
	///
	/// ```
	/// use serde::{Deserialize, Serialize};
	/// use serde_json::json;
	/// use storefront_serializers::SchemaModel;
	/// use validator::Validate;
	///
	/// #[derive(Serialize, Deserialize, Validate)]
	/// #[serde(deny_unknown_fields)]
	/// struct Address {
	///     #[validate(length(min = 1))]
	///     city: String,
	///     #[serde(default = "default_state")]
	///     state: String,
	/// }
	///
	/// fn default_state() -> String {
	///     "N/A".to_string()
	/// }
	///
	/// let schema = SchemaModel::of::<Address>();
	/// let data = json!({"city": "Cairo"}).as_object().unwrap().clone();
	/// let normalized = schema.validate(&data, &[]).unwrap();
	/// assert_eq!(normalized["state"], "N/A");
	/// ```
	pub fn of<T>() -> Self
	where
		T: DeserializeOwned + Serialize + Validate + 'static,
	{
		let full = std::any::type_name::<T>();
		Self {
			name: full.rsplit("::").next().unwrap_or(full),
			check: check_with::<T>,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Validate `data`, returning the normalized mapping or the error entries
	pub fn validate(&self, data: &Data, write_only: &[String]) -> Result<Data, Vec<ErrorEntry>> {
		(self.check)(data, write_only)
	}
}

impl std::fmt::Debug for SchemaModel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SchemaModel").field("name", &self.name).finish()
	}
}

fn check_with<T>(data: &Data, write_only: &[String]) -> Result<Data, Vec<ErrorEntry>>
where
	T: DeserializeOwned + Serialize + Validate,
{
	let parsed: T = serde_json::from_value(Value::Object(data.clone())).map_err(|e| {
		vec![ErrorEntry::new(
			None,
			redact_message(e.to_string(), data, write_only),
			Value::Null,
			ErrorKind::SchemaError,
			write_only,
		)]
	})?;

	if let Err(errors) = parsed.validate() {
		let mut entries = Vec::new();
		let mut by_field: Vec<_> = errors.field_errors().into_iter().collect();
		by_field.sort_by(|a, b| a.0.cmp(&b.0));
		for (field, field_errors) in by_field {
			let field = field.to_string();
			let input = data.get(&field).cloned().unwrap_or(Value::Null);
			for error in field_errors.iter() {
				let message = error
					.message
					.as_ref()
					.map(|m| m.to_string())
					.unwrap_or_else(|| format!("Invalid value for '{}' ({})", field, error.code));
				entries.push(ErrorEntry::new(
					Some(&field),
					message,
					input.clone(),
					ErrorKind::SchemaError,
					write_only,
				));
			}
		}
		return Err(entries);
	}

	match serde_json::to_value(&parsed) {
		Ok(Value::Object(normalized)) => Ok(normalized),
		Ok(_) => Err(vec![ErrorEntry::new(
			None,
			"Schema model did not serialize to an object",
			Value::Null,
			ErrorKind::SchemaError,
			write_only,
		)]),
		Err(e) => Err(vec![ErrorEntry::new(
			None,
			redact_message(e.to_string(), data, write_only),
			Value::Null,
			ErrorKind::SchemaError,
			write_only,
		)]),
	}
}

/// Mask the values of sensitive fields quoted in a deserialization message
fn redact_message(message: String, data: &Data, write_only: &[String]) -> String {
	data.iter()
		.filter(|(field, _)| is_sensitive(field, write_only))
		.filter_map(|(_, value)| match value {
			Value::Null => None,
			Value::String(s) if s.is_empty() => None,
			Value::String(s) => Some(s.clone()),
			other => Some(other.to_string()),
		})
		.fold(message, |message, secret| message.replace(&secret, REDACTED))
}
