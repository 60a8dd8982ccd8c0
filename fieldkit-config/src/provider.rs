//! Settings loader using Figment

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::discovery::{FileDiscovery, SettingsFormat};
use crate::{ConfigError, ConfigResult, FormSettings};

/// Prefix for environment variable overrides (`FIELDKIT_MAX_DERIVATION_DEPTH=4`).
pub const ENV_PREFIX: &str = "FIELDKIT_";

/// Loads [`FormSettings`] from all sources.
///
/// Sources in precedence order (later sources override earlier ones):
/// 1. `FormSettings::default()`
/// 2. Discovered files (global, then project)
/// 3. An explicit file, if one was given
/// 4. `FIELDKIT_*` environment variables
pub struct SettingsLoader {
    discovery: FileDiscovery,
    explicit_file: Option<PathBuf>,
    env_prefix: String,
}

impl SettingsLoader {
    /// Create a loader using standard discovery and the `FIELDKIT_` prefix
    pub fn new() -> Self {
        Self {
            discovery: FileDiscovery::new(),
            explicit_file: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a custom discovery (tests, embedded hosts)
    pub fn with_discovery(mut self, discovery: FileDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// Merge an explicit settings file after the discovered ones
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Build the figment and extract validated settings.
    pub fn load(&self) -> ConfigResult<FormSettings> {
        let figment = self.build_figment()?;
        let settings: FormSettings = figment.extract()?;
        settings.validate()?;
        debug!(
            hidden_values = settings.hidden_values.as_str(),
            chained = settings.allow_chained_derivations,
            max_depth = settings.max_derivation_depth,
            "loaded form settings"
        );
        Ok(settings)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(FormSettings::default()));

        for file in self.discovery.discover_all() {
            trace!("merging settings file: {}", file.path.display());
            figment = figment.merge(file_provider(&file.path, file.format));
        }

        if let Some(ref path) = self.explicit_file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path: path.clone() });
            }
            let format = SettingsFormat::from_path(path)
                .ok_or_else(|| ConfigError::UnsupportedFormat { path: path.clone() })?;
            trace!("merging explicit settings file: {}", path.display());
            figment = figment.merge(file_provider(path, format));
        }

        Ok(figment.merge(
            Env::prefixed(&self.env_prefix).map(|key| key.as_str().to_lowercase().into()),
        ))
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn file_provider(path: &Path, format: SettingsFormat) -> Figment {
    match format {
        SettingsFormat::Toml => Figment::from(Toml::file(path)),
        SettingsFormat::Yaml => Figment::from(Yaml::file(path)),
        SettingsFormat::Json => Figment::from(Json::file(path)),
    }
}

/// Load settings from the standard sources.
pub fn load_settings() -> ConfigResult<FormSettings> {
    SettingsLoader::new().load()
}
