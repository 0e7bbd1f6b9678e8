//! Implementation of the `pkisync plan` command.
//!
//! Runs a reconcile in check mode and prints the requests that would be sent
//! and the commands they realize. The device is never changed.

use std::path::Path;

use anyhow::Result;

use pkisync_lib::policy::State;
use pkisync_lib::reconcile::Invocation;

use super::{DeviceArgs, reconcile};
use crate::output::{print_commands, print_info, print_json, print_requests};

pub fn cmd_plan(device: &DeviceArgs, want: Option<&Path>, state: State, verbose: bool, json: bool) -> Result<()> {
  let outcome = reconcile(
    device,
    want,
    Invocation {
      state,
      check_mode: true,
      ..Default::default()
    },
  )?;

  if json {
    return print_json(&outcome);
  }

  if !outcome.changed {
    print_info("No changes would be made.");
    return Ok(());
  }

  println!("Plan ({}): {} request(s)", state, outcome.requests.len());
  println!();
  print_requests(&outcome.requests, verbose)?;
  println!();
  print_commands(&outcome.commands);

  Ok(())
}
