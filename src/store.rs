use std::{
    cell::RefCell,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{alarm::Alarm, error::StoreError};

/// where the alarm set lives between runs
///
/// the whole set is read once at startup, and rewritten on every change
pub trait AlarmStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<Vec<Alarm>>, StoreError>;
    fn save(&self, alarms: &[Alarm]) -> Result<(), StoreError>;
}

/// stores the alarms as a json file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AlarmStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Alarm>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// writes next to the file and renames over it, so a crash leaves the old set in place
    fn save(&self, alarms: &[Alarm]) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, alarms)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// keeps the serialized alarms in memory, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: RefCell<Option<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// starts out holding `blob` as if it had been saved before
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(blob.into())),
        }
    }

    /// the last thing saved
    #[must_use]
    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl AlarmStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Alarm>>, StoreError> {
        self.blob
            .borrow()
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }

    fn save(&self, alarms: &[Alarm]) -> Result<(), StoreError> {
        *self.blob.borrow_mut() = Some(serde_json::to_string(alarms)?);
        Ok(())
    }
}
