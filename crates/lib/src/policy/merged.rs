//! Merged: additive patch of the diff, never removes anything.

use crate::diff::DiffResult;
use crate::model::{AnyResource, Resource, SchemaError, SecurityProfile, TrustStore};
use crate::request::{Request, RequestCompiler};

use super::{Plan, State};

pub(super) fn plan(diff: &DiffResult, compiler: &RequestCompiler) -> Result<Plan, SchemaError> {
  let mut changes = Vec::new();
  let mut requests = Vec::new();

  stage::<TrustStore>(diff, compiler, &mut changes, &mut requests)?;
  stage::<SecurityProfile>(diff, compiler, &mut changes, &mut requests)?;

  Ok(Plan::settle(State::Merged, changes, requests))
}

fn stage<R: Resource>(
  diff: &DiffResult,
  compiler: &RequestCompiler,
  changes: &mut Vec<AnyResource>,
  requests: &mut Vec<Request>,
) -> Result<(), SchemaError> {
  let entries = diff.entries::<R>();
  if let Some(request) = compiler.patch(entries)? {
    requests.push(request);
    changes.extend(entries.iter().cloned().map(R::into_any));
  }
  Ok(())
}
