//! Replaced: every added or changed resource is overwritten with the full
//! desired resource. Resources not mentioned in want are left alone.

use crate::diff::{DiffResult, index_by_identity};
use crate::model::{AnyResource, ConfigSnapshot, Resource, SchemaError, SecurityProfile, TrustStore};
use crate::request::{Request, RequestCompiler};

use super::{Plan, State};

pub(super) fn plan(diff: &DiffResult, want: &ConfigSnapshot, compiler: &RequestCompiler) -> Result<Plan, SchemaError> {
  let mut changes = Vec::new();
  let mut requests = Vec::new();

  stage::<TrustStore>(diff, want, compiler, &mut changes, &mut requests)?;
  stage::<SecurityProfile>(diff, want, compiler, &mut changes, &mut requests)?;

  Ok(Plan::settle(State::Replaced, changes, requests))
}

fn stage<R: Resource>(
  diff: &DiffResult,
  want: &ConfigSnapshot,
  compiler: &RequestCompiler,
  changes: &mut Vec<AnyResource>,
  requests: &mut Vec<Request>,
) -> Result<(), SchemaError> {
  let desired = index_by_identity(R::entries(want).unwrap_or_default())?;

  for entry in diff.entries::<R>() {
    // Diff entries always come from want, so the lookup only misses if the
    // inputs disagree; fall back to the entry itself.
    let full = entry.identity().and_then(|id| desired.get(id).copied()).unwrap_or(entry);
    requests.push(compiler.put(full)?);
    changes.push(full.clone().into_any());
  }
  Ok(())
}
