//! Layered settings builder

use crate::settings::{Settings, SettingsError};
use crate::sources::{
	ConfigSource, DefaultSource, DotEnvSource, EnvSource, NESTING_SEPARATOR, TomlFileSource,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Merges configuration sources by priority and deserializes the result
///
/// # Examples
///
/// ```
/// use serde_json::Value;
/// use storefront_conf::SettingsBuilder;
/// use storefront_conf::sources::DefaultSource;
///
/// let settings = SettingsBuilder::new()
///     .add_source(DefaultSource::new().with_value("debug", Value::Bool(true)))
///     .add_source(DefaultSource::new().with_value("logging__level", Value::from("debug")))
///     .build()
///     .unwrap();
///
/// assert!(settings.debug);
/// assert_eq!(settings.logging.level, "debug");
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// The standard stack: defaults, the optional TOML file, `.env`, then
	/// `STOREFRONT_`-prefixed environment variables
	pub fn standard(config_file: Option<PathBuf>) -> Result<Self, SettingsError> {
		let defaults = DefaultSource::settings().map_err(|error| SettingsError::Source {
			source_name: "Default values".to_string(),
			error,
		})?;
		let mut builder = Self::new().add_source(defaults);
		if let Some(path) = config_file {
			builder = builder.add_source(TomlFileSource::new(path));
		}
		Ok(builder
			.add_source(DotEnvSource::new())
			.add_source(EnvSource::new()))
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge every source into one JSON object
	///
	/// Lower priorities are applied first; equal priorities keep insertion
	/// order. Objects merge recursively, anything else is replaced.
	pub fn merged(&self) -> Result<Map<String, Value>, SettingsError> {
		let mut ordered: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| &**s).collect();
		ordered.sort_by_key(|s| s.priority());

		let mut merged = Map::new();
		for source in ordered {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded configuration source"
			);
			merge_into(&mut merged, expand_nested(values));
		}
		Ok(merged)
	}

	/// Merge, deserialize and validate
	pub fn build(&self) -> Result<Settings, SettingsError> {
		let settings: Settings = serde_json::from_value(Value::Object(self.merged()?))?;
		settings.validate()?;
		Ok(settings)
	}
}

/// Expand `a__b` keys into nested objects
fn expand_nested(values: IndexMap<String, Value>) -> Map<String, Value> {
	let mut out = Map::new();
	for (key, value) in values {
		let mut parts: Vec<&str> = key.split(NESTING_SEPARATOR).collect();
		let leaf = parts.pop().unwrap_or_default().to_string();
		let mut nested = Map::new();
		nested.insert(leaf, value);
		let wrapped = parts.into_iter().rev().fold(nested, |inner, part| {
			let mut outer = Map::new();
			outer.insert(part.to_string(), Value::Object(inner));
			outer
		});
		merge_into(&mut out, wrapped);
	}
	out
}

fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>) {
	for (key, value) in source {
		let Value::Object(incoming) = value else {
			target.insert(key, value);
			continue;
		};
		if let Some(Value::Object(existing)) = target.get_mut(&key) {
			merge_into(existing, incoming);
			continue;
		}
		target.insert(key, Value::Object(incoming));
	}
}
