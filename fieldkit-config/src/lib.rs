//! Form evaluation settings for fieldkit, loaded with Figment.
//!
//! Settings control the parts of form evaluation that are policy rather than
//! schema: the generic failure messages, what happens to values of fields
//! that become hidden, and whether derivation hooks may chain.
//!
//! ```no_run
//! use fieldkit_config::load_settings;
//!
//! let settings = load_settings()?;
//! println!("hidden values: {}", settings.hidden_values.as_str());
//! # Ok::<(), fieldkit_config::ConfigError>(())
//! ```
//!
//! Files are discovered in `~/.fieldkit/` and `./.fieldkit/` as
//! `fieldkit.{toml,yaml,yml,json}`; `FIELDKIT_*` environment variables
//! override any file.

pub mod discovery;
pub mod error;
pub mod provider;
pub mod settings;

pub use discovery::{FileDiscovery, SettingsFile, SettingsFormat, SettingsScope};
pub use error::ConfigError;
pub use provider::{load_settings, SettingsLoader, ENV_PREFIX};
pub use settings::{FormSettings, HiddenValuePolicy};

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;
