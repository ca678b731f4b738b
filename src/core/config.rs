//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sheet holding the demand lines in a study workbook
pub const DEFAULT_SHEET: &str = "Study";

/// File name prefix of exported study workbooks
pub const DEFAULT_FILE_PREFIX: &str = "MV_Material_Study-";

/// Locater code of work-in-process floor stock
pub const DEFAULT_WIP_LOCATER: &str = "1-1-1-1";

/// Source label of unreserved on-hand stock
pub const DEFAULT_FREE_STOCK: &str = "free_stock";

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "mstudy.yaml";

/// Reporter configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Study file to use instead of auto-detection
    pub study_file: Option<PathBuf>,

    /// Worksheet holding the demand lines
    pub sheet: Option<String>,

    /// File name prefix used by auto-detection
    pub file_prefix: Option<String>,

    /// Locater code marking WIP stock
    pub wip_locater: Option<String>,

    /// Source label marking free stock
    pub free_stock: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(&cwd)
    }

    /// Load configuration with `dir` as the project-local directory
    pub fn load_from(dir: &Path) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessor fallbacks)

        // 2. Global user config (~/.config/mstudy/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./mstudy.yaml)
        if let Some(local) = Self::read_file(&dir.join(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Ok(file) = std::env::var("MSTUDY_FILE") {
            config.study_file = Some(PathBuf::from(file));
        }
        if let Ok(sheet) = std::env::var("MSTUDY_SHEET") {
            config.sheet = Some(sheet);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mstudy")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.study_file.is_some() {
            self.study_file = other.study_file;
        }
        if other.sheet.is_some() {
            self.sheet = other.sheet;
        }
        if other.file_prefix.is_some() {
            self.file_prefix = other.file_prefix;
        }
        if other.wip_locater.is_some() {
            self.wip_locater = other.wip_locater;
        }
        if other.free_stock.is_some() {
            self.free_stock = other.free_stock;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    pub fn sheet(&self) -> &str {
        self.sheet.as_deref().unwrap_or(DEFAULT_SHEET)
    }

    pub fn file_prefix(&self) -> &str {
        self.file_prefix.as_deref().unwrap_or(DEFAULT_FILE_PREFIX)
    }

    pub fn wip_locater(&self) -> &str {
        self.wip_locater.as_deref().unwrap_or(DEFAULT_WIP_LOCATER)
    }

    pub fn free_stock(&self) -> &str {
        self.free_stock.as_deref().unwrap_or(DEFAULT_FREE_STOCK)
    }

    /// Value of a config key as shown by `mstudy config show`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "study_file" => self.study_file.as_ref().map(|p| p.display().to_string()),
            "sheet" => Some(self.sheet().to_string()),
            "file_prefix" => Some(self.file_prefix().to_string()),
            "wip_locater" => Some(self.wip_locater().to_string()),
            "free_stock" => Some(self.free_stock().to_string()),
            "default_format" => self.default_format.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sheet(), "Study");
        assert_eq!(config.wip_locater(), "1-1-1-1");
        assert_eq!(config.free_stock(), "free_stock");
        assert_eq!(config.file_prefix(), "MV_Material_Study-");
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            sheet: Some("Study".into()),
            wip_locater: Some("W-1".into()),
            ..Default::default()
        };
        base.merge(Config {
            sheet: Some("Data".into()),
            ..Default::default()
        });
        assert_eq!(base.sheet(), "Data");
        assert_eq!(base.wip_locater(), "W-1");
    }

    #[test]
    fn test_local_file_is_read() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(LOCAL_CONFIG_FILE),
            "wip_locater: \"9-9-9-9\"\nfree_stock: pool\n",
        )
        .unwrap();

        let config = Config::load_from(tmp.path());
        assert_eq!(config.wip_locater(), "9-9-9-9");
        assert_eq!(config.free_stock(), "pool");
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = Config::default();
        assert_eq!(config.get("sheet").as_deref(), Some("Study"));
        assert_eq!(config.get("study_file"), None);
        assert_eq!(config.get("nope"), None);
    }
}
