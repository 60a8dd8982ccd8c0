//! Settings file discovery
//!
//! Looks for `fieldkit.{toml,yaml,yml,json}` inside a `.fieldkit/` directory,
//! first under the home directory (global) and then under the current
//! working directory (project).

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Name of the directory that holds settings files.
pub const SETTINGS_DIR_NAME: &str = ".fieldkit";

const SETTINGS_FILE_NAMES: [&str; 4] = [
    "fieldkit.toml",
    "fieldkit.yaml",
    "fieldkit.yml",
    "fieldkit.json",
];

/// A discovered settings file
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsFile {
    /// Full path to the settings file
    pub path: PathBuf,
    /// Format detected from the extension
    pub format: SettingsFormat,
    /// Where the file was found
    pub scope: SettingsScope,
}

impl SettingsFile {
    /// Create a new SettingsFile
    pub fn new(path: PathBuf, format: SettingsFormat, scope: SettingsScope) -> Self {
        Self {
            path,
            format,
            scope,
        }
    }
}

/// Settings file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Toml,
    Yaml,
    Json,
}

impl SettingsFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Where a settings file was discovered. Later scopes override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SettingsScope {
    /// `~/.fieldkit/`
    Global,
    /// `./.fieldkit/`
    Project,
}

/// Finds settings files in the global and project directories
#[derive(Debug, Default)]
pub struct FileDiscovery {
    project_dir: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Create a discovery that resolves directories at discovery time
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a discovery with fixed directories
    pub fn with_directories(project_dir: Option<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            global_dir,
        }
    }

    /// Discover all settings files, lowest precedence first.
    pub fn discover_all(&self) -> Vec<SettingsFile> {
        let project_dir = self.project_dir.clone().or_else(Self::resolve_project_dir);
        let global_dir = self.global_dir.clone().or_else(Self::resolve_global_dir);

        let mut files = Vec::new();
        if let Some(ref dir) = global_dir {
            files.extend(self.search_directory(dir, SettingsScope::Global));
        }
        if let Some(ref dir) = project_dir {
            files.extend(self.search_directory(dir, SettingsScope::Project));
        }

        files.sort_by_key(|f| f.scope);
        debug!(count = files.len(), "discovered settings files");
        files
    }

    fn search_directory(&self, dir: &Path, scope: SettingsScope) -> Vec<SettingsFile> {
        if !dir.exists() {
            trace!("settings directory does not exist: {}", dir.display());
            return Vec::new();
        }
        if !dir.is_dir() {
            warn!("settings path exists but is not a directory: {}", dir.display());
            return Vec::new();
        }

        SETTINGS_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .filter(|candidate| candidate.is_file())
            .filter_map(|candidate| {
                let format = SettingsFormat::from_path(&candidate)?;
                trace!("found settings file: {}", candidate.display());
                Some(SettingsFile::new(candidate, format, scope))
            })
            .collect()
    }

    fn resolve_project_dir() -> Option<PathBuf> {
        let dir = std::env::current_dir().ok()?.join(SETTINGS_DIR_NAME);
        dir.is_dir().then_some(dir)
    }

    fn resolve_global_dir() -> Option<PathBuf> {
        let dir = dirs::home_dir()?.join(SETTINGS_DIR_NAME);
        dir.is_dir().then_some(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_settings_format_from_extension() {
        assert_eq!(
            SettingsFormat::from_extension("toml"),
            Some(SettingsFormat::Toml)
        );
        assert_eq!(
            SettingsFormat::from_extension("YML"),
            Some(SettingsFormat::Yaml)
        );
        assert_eq!(
            SettingsFormat::from_extension("json"),
            Some(SettingsFormat::Json)
        );
        assert_eq!(SettingsFormat::from_extension("ini"), None);
    }

    #[test]
    fn test_scope_ordering() {
        assert!(SettingsScope::Project > SettingsScope::Global);
    }

    #[test]
    fn test_search_directory_empty() {
        let temp_dir = TempDir::new().unwrap();
        let discovery = FileDiscovery::new();
        assert!(discovery
            .search_directory(temp_dir.path(), SettingsScope::Project)
            .is_empty());
    }

    #[test]
    fn test_search_directory_ignores_other_names() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "x = 1").unwrap();
        fs::write(temp_dir.path().join("fieldkit.yaml"), "x: 1").unwrap();

        let discovery = FileDiscovery::new();
        let files = discovery.search_directory(temp_dir.path(), SettingsScope::Project);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].format, SettingsFormat::Yaml);
        assert_eq!(files[0].scope, SettingsScope::Project);
    }

    #[test]
    fn test_discover_all_orders_global_first() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(project.path().join("fieldkit.toml"), "").unwrap();
        fs::write(global.path().join("fieldkit.json"), "{}").unwrap();

        let discovery = FileDiscovery::with_directories(
            Some(project.path().to_path_buf()),
            Some(global.path().to_path_buf()),
        );
        let files = discovery.discover_all();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].scope, SettingsScope::Global);
        assert_eq!(files[1].scope, SettingsScope::Project);
    }
}
