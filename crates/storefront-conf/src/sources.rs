//! Configuration sources for layered settings
//!
//! Sources are merged in priority order: environment variables > .env file >
//! TOML file > defaults. Every source yields a flat or nested map of JSON
//! values; a key containing the nesting separator (`__`) is expanded into
//! nested objects by the builder. Environment-like sources yield strings only;
//! typed settings fields accept them (see [`crate::settings`]).

use crate::settings::Settings;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Separator between nested keys in flat sources (`LOGGING__LEVEL`)
pub const NESTING_SEPARATOR: &str = "__";

/// Default prefix of environment variables read by [`EnvSource`]
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Dotenv error: {0}")]
	DotEnv(#[from] dotenv::Error),
}

/// Environment variable configuration source
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	/// Read variables starting with [`ENV_PREFIX`]
	pub fn new() -> Self {
		Self::with_prefix(ENV_PREFIX)
	}

	/// Read variables starting with `prefix`
	///
	/// # Examples
	///
	/// ```
	/// use storefront_conf::sources::{ConfigSource, EnvSource};
	///
	/// let source = EnvSource::with_prefix("SHOP_");
	/// assert_eq!(source.description(), "Environment variables (prefix: SHOP_)");
	/// ```
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();
		for (key, value) in std::env::vars() {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			config.insert(clean_key.to_lowercase(), Value::String(value));
		}
		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// .env file configuration source
///
/// The file is parsed without touching the process environment; only keys
/// carrying the prefix are kept.
pub struct DotEnvSource {
	path: PathBuf,
	prefix: String,
}

impl DotEnvSource {
	pub fn new() -> Self {
		Self {
			path: PathBuf::from(".env"),
			prefix: ENV_PREFIX.to_string(),
		}
	}

	pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.path = path.into();
		self
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}
}

impl Default for DotEnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DotEnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let mut config = IndexMap::new();
		for item in dotenv::from_path_iter(&self.path)? {
			let (key, value) = item?;
			if let Some(clean_key) = key.strip_prefix(&self.prefix) {
				config.insert(clean_key.to_lowercase(), Value::String(value));
			}
		}
		Ok(config)
	}

	fn priority(&self) -> u8 {
		90
	}

	fn description(&self) -> String {
		format!(".env file: {}", self.path.display())
	}
}

/// TOML file configuration source
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// # Examples
	///
	/// ```
	/// use storefront_conf::sources::TomlFileSource;
	///
	/// let source = TomlFileSource::new("storefront.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;
		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// An empty default layer
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// The defaults of [`Settings`]
	pub fn settings() -> Result<Self, SourceError> {
		let values = match serde_json::to_value(Settings::default())? {
			Value::Object(map) => map.into_iter().collect(),
			_ => IndexMap::new(),
		};
		Ok(Self { values })
	}

	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}
