use std::{io, path::PathBuf};

/// problems turning user input (or a stored record) into an alarm
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AlarmError {
    #[error("no time given")]
    MissingTime,
    #[error("`{0}` is not a time of day (expected HH:MM or HH:MM:SS)")]
    InvalidDailyTime(String),
    #[error("`{0}` is not a date and time (expected YYYY-MM-DDTHH:MM[:SS])")]
    InvalidTimestamp(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("couldn't access alarm storage: {0}")]
    Io(#[from] io::Error),
    #[error("couldn't (de)serialize alarms: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("couldn't find a home directory for the config")]
    NoProjectDirs,
    #[error("couldn't access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("couldn't serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("webhook responded with {0}")]
    Status(reqwest::StatusCode),
}
