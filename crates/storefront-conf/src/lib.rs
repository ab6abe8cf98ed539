//! # Storefront Conf
//!
//! Settings and logging for the storefront backend.
//!
//! ## Features
//!
//! - **Layered sources**: defaults < TOML file < `.env` < `STOREFRONT_*` environment variables
//! - **Nested keys**: `STOREFRONT_LOGGING__LEVEL=debug` sets `logging.level`
//! - **Validation**: inconsistent settings are rejected before use
//! - **Logging**: `tracing-subscriber` with an `EnvFilter` and text or JSON output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storefront_conf::{SettingsBuilder, logging};
//!
//! let settings = SettingsBuilder::standard(Some("storefront.toml".into()))?.build()?;
//! logging::init(&settings.logging)?;
//! # Ok::<(), storefront_conf::SettingsError>(())
//! ```

pub mod builder;
pub mod logging;
pub mod settings;
pub mod sources;

pub use builder::SettingsBuilder;
pub use settings::{
	AuthSettings, LogFormat, LoggingSettings, MediaSettings, Settings, SettingsError,
};
pub use sources::{ConfigSource, SourceError};
