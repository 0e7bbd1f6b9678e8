//! Subcommand implementations and the helpers they share.

mod apply;
mod diff;
mod plan;
mod show;

pub use apply::cmd_apply;
pub use diff::cmd_diff;
pub use plan::cmd_plan;
pub use show::cmd_show;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use pkisync_lib::device::{DeviceStore, LocalDevice};
use pkisync_lib::model::ConfigSnapshot;
use pkisync_lib::platform::paths::device_path;
use pkisync_lib::reconcile::{Invocation, Outcome, Reconciler};
use pkisync_lib::request::PathTable;

/// Where the device lives and how its resource tree is rooted.
pub struct DeviceArgs {
  pub device: Option<PathBuf>,
  pub path_root: Option<String>,
}

impl DeviceArgs {
  pub fn paths(&self) -> PathTable {
    self.path_root.as_deref().map(PathTable::new).unwrap_or_default()
  }

  /// Open the file-backed device. A missing file is an empty device.
  pub fn open(&self) -> Result<LocalDevice> {
    let path = self.device.clone().unwrap_or_else(device_path);
    debug!(path = %path.display(), "using device");
    LocalDevice::open(self.paths(), DeviceStore::new(&path))
      .with_context(|| format!("Failed to open device: {}", path.display()))
  }
}

/// Load a desired configuration. `.yaml` and `.yml` files are YAML, anything
/// else JSON.
pub fn load_want(path: &Path) -> Result<ConfigSnapshot> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let is_yaml = matches!(
    path.extension().and_then(|e| e.to_str()),
    Some("yaml") | Some("yml")
  );
  let snapshot = if is_yaml {
    ConfigSnapshot::from_yaml_str(&content)
  } else {
    ConfigSnapshot::from_json_str(&content)
  };
  snapshot.with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Run one invocation against the device named by `args`.
pub(crate) fn reconcile(args: &DeviceArgs, want: Option<&Path>, invocation: Invocation) -> Result<Outcome> {
  let invocation = Invocation {
    want: want.map(load_want).transpose()?,
    ..invocation
  };
  let device = args.open()?;
  Reconciler::new(args.paths())
    .run(&invocation, &device, &device)
    .context("Reconcile failed")
}
