use std::path::PathBuf;

use crate::consts::{APP_NAME, DEVICE_ENV, DEVICE_FILENAME};

/// Returns the user's home directory, or the current directory if unknown.
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var_os("USERPROFILE").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the user's home directory, or the current directory if unknown.
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> PathBuf {
  std::env::var_os("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(home_dir)
    .join(APP_NAME)
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Location of the local device state file.
///
/// `PKISYNC_DEVICE` takes precedence over `<data dir>/device.json`.
pub fn device_path() -> PathBuf {
  std::env::var_os(DEVICE_ENV)
    .filter(|v| !v.is_empty())
    .map(PathBuf::from)
    .unwrap_or_else(|| data_dir().join(DEVICE_FILENAME))
}

#[cfg(test)]
#[cfg(not(windows))]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn xdg_data_home_takes_precedence() {
    temp_env::with_vars(
      [
        ("XDG_DATA_HOME", Some("/custom/data")),
        ("HOME", Some("/home/user")),
        (DEVICE_ENV, None),
      ],
      || {
        assert_eq!(data_dir(), PathBuf::from("/custom/data").join(APP_NAME));
        assert_eq!(
          device_path(),
          PathBuf::from("/custom/data").join(APP_NAME).join(DEVICE_FILENAME)
        );
      },
    );
  }

  #[test]
  #[serial]
  fn xdg_fallback_to_home_directories() {
    temp_env::with_vars(
      [
        ("XDG_DATA_HOME", None::<&str>),
        ("HOME", Some("/home/user")),
        (DEVICE_ENV, None),
      ],
      || {
        assert_eq!(data_dir(), PathBuf::from("/home/user/.local/share").join(APP_NAME));
      },
    );
  }

  #[test]
  #[serial]
  fn device_env_overrides_data_dir() {
    temp_env::with_vars(
      [
        (DEVICE_ENV, Some("/tmp/lab-switch.json")),
        ("XDG_DATA_HOME", Some("/custom/data")),
      ],
      || {
        assert_eq!(device_path(), PathBuf::from("/tmp/lab-switch.json"));
      },
    );
  }
}
