//! JSON file persistence for the local device.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{ConfigSnapshot, SchemaError};

/// Errors reading or writing the device state file.
#[derive(Debug, Error)]
pub enum DeviceError {
  #[error("failed to read device state: {0}")]
  Read(#[source] io::Error),

  #[error("failed to parse device state: {0}")]
  Parse(#[from] SchemaError),

  #[error("failed to serialize device state: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("failed to write device state: {0}")]
  Write(#[source] io::Error),

  #[error("failed to create device directory: {0}")]
  CreateDir(#[source] io::Error),
}

/// A device state file.
#[derive(Debug, Clone)]
pub struct DeviceStore {
  path: PathBuf,
}

impl DeviceStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Load the stored snapshot.
  ///
  /// Returns an empty snapshot if the file doesn't exist.
  pub fn load(&self) -> Result<ConfigSnapshot, DeviceError> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfigSnapshot::default()),
      Err(e) => return Err(DeviceError::Read(e)),
    };
    Ok(ConfigSnapshot::from_json_str(&content)?)
  }

  /// Save the snapshot.
  ///
  /// Uses atomic write (write to temp, then rename) to prevent corruption.
  pub fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), DeviceError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(DeviceError::CreateDir)?;
    }

    let mut temp_path = self.path.clone().into_os_string();
    temp_path.push(".tmp");

    let content = serde_json::to_string_pretty(snapshot)?;
    fs::write(&temp_path, &content).map_err(DeviceError::Write)?;
    fs::rename(&temp_path, &self.path).map_err(DeviceError::Write)?;
    Ok(())
  }
}
