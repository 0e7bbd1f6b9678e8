//! Overridden: the device mirrors want exactly.
//!
//! Resources absent from want are deleted; every want resource that is not
//! fully equal to its current counterpart is overwritten. All deletions are
//! emitted before any write.

use std::collections::HashSet;

use crate::diff::index_by_identity;
use crate::model::{AnyResource, ConfigSnapshot, Resource, SchemaError, SecurityProfile, TrustStore};
use crate::request::{Request, RequestCompiler};

use super::{Plan, State};

pub(super) fn plan(want: &ConfigSnapshot, have: &ConfigSnapshot, compiler: &RequestCompiler) -> Result<Plan, SchemaError> {
  let mut changes = Vec::new();
  let mut requests = Vec::new();

  stage_removals::<SecurityProfile>(want, have, compiler, &mut changes, &mut requests);
  stage_removals::<TrustStore>(want, have, compiler, &mut changes, &mut requests);
  stage_writes::<TrustStore>(want, have, compiler, &mut changes, &mut requests)?;
  stage_writes::<SecurityProfile>(want, have, compiler, &mut changes, &mut requests)?;

  Ok(Plan::settle(State::Overridden, changes, requests))
}

fn stage_removals<R: Resource>(
  want: &ConfigSnapshot,
  have: &ConfigSnapshot,
  compiler: &RequestCompiler,
  changes: &mut Vec<AnyResource>,
  requests: &mut Vec<Request>,
) {
  let desired: HashSet<&str> = R::entries(want)
    .unwrap_or_default()
    .iter()
    .filter_map(R::identity)
    .collect();

  for identity in R::entries(have).unwrap_or_default().iter().filter_map(R::identity) {
    if !desired.contains(identity) {
      requests.push(compiler.delete(R::COLLECTION, identity));
      changes.push(R::reference(identity).into_any());
    }
  }
}

fn stage_writes<R: Resource>(
  want: &ConfigSnapshot,
  have: &ConfigSnapshot,
  compiler: &RequestCompiler,
  changes: &mut Vec<AnyResource>,
  requests: &mut Vec<Request>,
) -> Result<(), SchemaError> {
  let current = index_by_identity(R::entries(have).unwrap_or_default())?;

  for resource in R::entries(want).unwrap_or_default() {
    let existing = resource.identity().and_then(|id| current.get(id).copied());
    if existing != Some(resource) {
      requests.push(compiler.put(resource)?);
      changes.push(resource.clone().into_any());
    }
  }
  Ok(())
}
