//! Implementation of the `pkisync apply` command.
//!
//! Converges the device to the desired configuration under the selected
//! state. With `--check` it behaves like `plan` but reports in apply's format.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use pkisync_lib::policy::State;
use pkisync_lib::reconcile::Invocation;

use super::{DeviceArgs, reconcile};
use crate::output::{print_info, print_json, print_requests, print_stat, print_success};

/// Execute the apply command.
///
/// Prints a summary of the requests sent and the resource counts before and
/// after. Nothing is printed about the device when there was nothing to do.
pub fn cmd_apply(
  device: &DeviceArgs,
  want: Option<&Path>,
  state: State,
  check: bool,
  verbose: bool,
  json: bool,
) -> Result<()> {
  let outcome = reconcile(
    device,
    want,
    Invocation {
      state,
      check_mode: check,
      ..Default::default()
    },
  )?;
  info!(changed = outcome.changed, requests = outcome.requests.len(), "apply finished");

  if json {
    return print_json(&outcome);
  }

  if !outcome.changed {
    print_info("No changes.");
    return Ok(());
  }

  if verbose || check {
    print_requests(&outcome.requests, verbose)?;
    println!();
  }

  if check {
    print_info(&format!("Would send {} request(s) ({})", outcome.requests.len(), state));
    return Ok(());
  }

  print_success(&format!("Applied {} request(s) ({})", outcome.requests.len(), state));
  print_stat("Resources before", &outcome.before.resource_count().to_string());
  if let Some(after) = &outcome.after {
    print_stat("Resources after", &after.resource_count().to_string());
  }

  Ok(())
}
