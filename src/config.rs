use std::{
    fs,
    io::ErrorKind,
    ops::Not,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use eframe::egui;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APPLICATION: &str = "roosty_chrono";

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Not for Theme {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl From<Theme> for egui::Visuals {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// used to show specific date alarms in the alarm list
    pub time_format: String,
    pub theme: Theme,
    /// how long the alarm effect stays on screen
    pub notification_seconds: u64,
    pub webhook_timeout_seconds: u64,
    /// where alarms are saved, defaults to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarms_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            theme: Theme::Dark,
            notification_seconds: 3,
            webhook_timeout_seconds: 10,
            alarms_path: None,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&config)?)
    }

    /// Like [`Config::load`] but a missing or broken file gives the defaults.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config = toml::to_string(self)?;
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, config).map_err(io_error)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn alarms_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.alarms_path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("alarms.json")),
        }
    }

    #[must_use]
    pub const fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_seconds)
    }

    #[must_use]
    pub const fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_seconds)
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("", "", APPLICATION).ok_or(ConfigError::NoProjectDirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_toggles() {
        assert_eq!(!Theme::Dark, Theme::Light);
        assert_eq!(!!Theme::Dark, Theme::Dark);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config = toml::from_str("theme = \"Light\"\nnotification_seconds = 5\n").unwrap();
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.notification_duration(), Duration::from_secs(5));
        assert_eq!(config.webhook_timeout(), Duration::from_secs(10));
        assert_eq!(config.time_format, Config::default().time_format);
        assert!(config.alarms_path.is_none());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Config::load_or_default(&dir.path().join("config.toml")),
            Config::default()
        );
    }

    #[test]
    fn broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = [").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            theme: Theme::Light,
            alarms_path: Some(dir.path().join("alarms.json")),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
        assert_eq!(config.alarms_path().unwrap(), dir.path().join("alarms.json"));
    }
}
