//! Show command implementation.
//!
//! Displays the device's current configuration.

use anyhow::{Context, Result};

use pkisync_lib::model::{Collection, Resource, SecurityProfile, TrustStore};
use pkisync_lib::reconcile::FactsProvider;

use super::DeviceArgs;
use crate::output::{print_info, print_json, print_stat, symbols};

pub fn cmd_show(device: &DeviceArgs, verbose: bool, json: bool) -> Result<()> {
  let snapshot = device.open()?.current_state()?;

  if json {
    return print_json(&snapshot);
  }

  if snapshot.is_empty() {
    print_info("Device holds no PKI configuration.");
    return Ok(());
  }

  print_stat(
    "Security profiles",
    &SecurityProfile::entries(&snapshot).map_or(0, <[_]>::len).to_string(),
  );
  print_stat(
    "Trust stores",
    &TrustStore::entries(&snapshot).map_or(0, <[_]>::len).to_string(),
  );

  if verbose {
    print_collection::<SecurityProfile>(SecurityProfile::entries(&snapshot).unwrap_or_default())?;
    print_collection::<TrustStore>(TrustStore::entries(&snapshot).unwrap_or_default())?;
  }

  Ok(())
}

fn print_collection<R: Resource>(entries: &[R]) -> Result<()> {
  if entries.is_empty() {
    return Ok(());
  }
  let heading = match R::COLLECTION {
    Collection::SecurityProfiles => "Security profiles",
    Collection::TrustStores => "Trust stores",
  };
  println!();
  println!("{heading}:");
  for resource in entries {
    let attributes = serde_json::to_string(resource).context("Failed to serialize resource")?;
    println!(
      "  {} {} {}",
      symbols::INFO,
      resource.identity().unwrap_or("(unnamed)"),
      attributes
    );
  }
  Ok(())
}
