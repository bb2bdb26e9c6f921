//! Configuration management for crewmates.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::view::{SortKey, TimeRange};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "crewmates";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "crew.db";

/// Prefix of environment overrides, e.g. `CREWMATES_DISPLAY__THEME=light`.
const ENV_PREFIX: &str = "CREWMATES_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CREWMATES_`, sections split on `__`)
/// 2. TOML config file at `~/.config/crewmates/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Display preferences.
    pub display: DisplayConfig,
    /// Gallery defaults.
    pub gallery: GalleryConfig,
    /// Export defaults.
    pub export: ExportConfig,
    /// General preferences.
    pub preferences: Preferences,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/crewmates/crew.db`
    pub database_path: Option<PathBuf>,
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark theme.
    #[default]
    Dark,
    /// Light theme.
    Light,
    /// Follow the system.
    Auto,
}

/// Spacing of listed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// Tight spacing.
    Compact,
    /// Normal spacing.
    #[default]
    Comfortable,
    /// Loose spacing.
    Spacious,
}

/// Display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Color theme.
    pub theme: Theme,
    /// Item spacing.
    pub density: Density,
    /// Play animations.
    pub animations_enabled: bool,
    /// Play sounds.
    pub sound_enabled: bool,
    /// Interface language code.
    pub language: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            density: Density::Comfortable,
            animations_enabled: true,
            sound_enabled: false,
            language: "en".to_string(),
        }
    }
}

/// Gallery defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Sort order used when none is given.
    pub default_sort: SortKey,
    /// Time range used by `stats` and `trend` when none is given.
    pub default_time_range: TimeRange,
}

/// File format written by exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// JSON array of full records.
    #[default]
    Json,
    /// CSV with name, color, speed and date.
    Csv,
    /// Both files.
    Both,
}

/// Export defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Format used when none is given.
    pub format: ExportFormat,
}

/// General preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Show notifications.
    pub notifications: bool,
    /// Save edits automatically.
    pub auto_save: bool,
    /// Collect usage analytics.
    pub analytics: bool,
    /// Allow sharing.
    pub sharing: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            auto_save: true,
            analytics: true,
            sharing: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `CREWMATES_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.display.language.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "display.language must not be empty".to_string(),
            });
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "storage.database_path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Overwrite the file at `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn reset(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// The settings as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse settings exported with [`Config::to_json`].
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings JSON or fails
    /// validation.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.display.theme, Theme::Dark);
        assert_eq!(config.display.density, Density::Comfortable);
        assert!(config.display.animations_enabled);
        assert!(!config.display.sound_enabled);
        assert_eq!(config.display.language, "en");
        assert_eq!(config.export.format, ExportFormat::Json);
        assert_eq!(config.gallery.default_sort, SortKey::Newest);
        assert_eq!(config.gallery.default_time_range, TimeRange::All);
    }

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();

        assert!(prefs.notifications);
        assert!(prefs.auto_save);
        assert!(prefs.analytics);
        assert!(prefs.sharing);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_language() {
        let mut config = Config::default();
        config.display.language = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("language"));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::new());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("crew.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("crewmates"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_| {
            let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
            assert_eq!(result.unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[display]
theme = "light"
density = "compact"

[gallery]
default_sort = "speed"
default_time_range = "30d"

[export]
format = "both"
"#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap();
            assert_eq!(config.display.theme, Theme::Light);
            assert_eq!(config.display.density, Density::Compact);
            assert_eq!(config.display.language, "en");
            assert_eq!(config.gallery.default_sort, SortKey::Speed);
            assert_eq!(config.gallery.default_time_range, TimeRange::Month);
            assert_eq!(config.export.format, ExportFormat::Both);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_bad_value() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[display]\ntheme = \"neon\"\n")?;

            let err = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigLoad(_)));
            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CREWMATES_DISPLAY__THEME", "auto");
            jail.set_env("CREWMATES_PREFERENCES__SHARING", "false");
            let config: Config = Config::figment(Path::new("missing.toml")).extract()?;
            assert_eq!(config.display.theme, Theme::Auto);
            assert!(!config.preferences.sharing);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[gallery]\ndefault_sort = \"oldest\"\n")?;
            jail.set_env("CREWMATES_GALLERY__DEFAULT_SORT", "name");

            let config = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap();
            assert_eq!(config.gallery.default_sort, SortKey::Name);
            Ok(())
        });
    }

    #[test]
    fn test_save_and_reload() {
        figment::Jail::expect_with(|jail| {
            let path = jail.directory().join("nested").join("config.toml");

            let mut config = Config::default();
            config.display.sound_enabled = true;
            config.export.format = ExportFormat::Csv;
            config.storage.database_path = Some(jail.directory().join("crew.db"));
            config.save(&path).unwrap();

            let loaded = Config::load_from(Some(path)).unwrap();
            assert_eq!(loaded, config);
            Ok(())
        });
    }

    #[test]
    fn test_reset_writes_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[display]\ntheme = \"light\"\n")?;
            let path = jail.directory().join("config.toml");

            let config = Config::reset(&path).unwrap();
            assert_eq!(config, Config::default());
            assert_eq!(Config::load_from(Some(path)).unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = Config::default();
        config.display.language = "fr".to_string();
        config.preferences.analytics = false;

        let json = config.to_json().unwrap();
        assert!(json.contains("\"language\": \"fr\""));
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = Config::from_json(r#"{"display": {"theme": "light"}}"#).unwrap();
        assert_eq!(config.display.theme, Theme::Light);
        assert_eq!(config.display.language, "en");
        assert!(config.preferences.notifications);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(Config::from_json("not json").is_err());
        assert!(Config::from_json(r#"{"display": {"language": ""}}"#).is_err());
    }
}
