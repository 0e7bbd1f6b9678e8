//! Diff command implementation.
//!
//! Compares a desired configuration against the device and prints, per
//! resource, the attributes that would change.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use pkisync_lib::diff::{DiffResult, compute_diff};
use pkisync_lib::model::{ConfigSnapshot, Resource, SecurityProfile, TrustStore};
use pkisync_lib::reconcile::FactsProvider;

use super::{DeviceArgs, load_want};
use crate::output::{print_info, print_json, symbols};

pub fn cmd_diff(device: &DeviceArgs, want: &Path, verbose: bool, json: bool) -> Result<()> {
  let want = load_want(want)?;
  let have = device.open()?.current_state()?;
  want.validate().context("Invalid desired configuration")?;
  have.validate().context("Invalid device state")?;

  let diff = compute_diff(&want, &have).context("Failed to compute diff")?;

  if json {
    return print_json(&diff);
  }

  if diff.is_empty() {
    print_info("No differences.");
    return Ok(());
  }

  print_entries::<TrustStore>(&diff, &have, verbose)?;
  print_entries::<SecurityProfile>(&diff, &have, verbose)?;

  Ok(())
}

fn print_entries<R: Resource>(diff: &DiffResult, have: &ConfigSnapshot, verbose: bool) -> Result<()> {
  let entries = diff.entries::<R>();
  if entries.is_empty() {
    return Ok(());
  }

  let existing = R::entries(have).unwrap_or_default();
  println!("{}:", R::COLLECTION);
  for entry in entries {
    let identity = entry.identity().unwrap_or("(unnamed)");
    let is_new = !existing.iter().any(|r| r.identity() == Some(identity));
    let symbol = if is_new {
      symbols::ADD.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
    } else {
      symbols::MODIFY.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string()
    };
    println!("  {} {}", symbol, identity);

    if verbose {
      let delta = serde_json::to_string_pretty(entry).context("Failed to serialize diff entry")?;
      for line in delta.lines() {
        println!("      {}", line.if_supports_color(Stream::Stdout, |s| s.dimmed()));
      }
    }
  }
  println!();
  Ok(())
}
