//! Deleted: remove targeted resources, or everything when want names none.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::model::{AnyResource, ConfigSnapshot, Resource, SecurityProfile, TrustStore};
use crate::request::{Request, RequestCompiler};

use super::{Plan, State};

/// Identities must already be validated; resources without one are skipped.
pub(super) fn plan(want: &ConfigSnapshot, have: &ConfigSnapshot, compiler: &RequestCompiler) -> Plan {
  let teardown = want.is_empty();
  let mentioned = want.security_profiles.is_some() || want.trust_stores.is_some();
  if teardown && mentioned {
    warn!("want lists only empty collections, tearing down every collection");
  } else if teardown {
    debug!("want names no resources, tearing down everything");
  }

  let mut changes = Vec::new();
  let mut requests = Vec::new();

  stage::<SecurityProfile>(teardown, want, have, compiler, &mut changes, &mut requests);
  stage::<TrustStore>(teardown, want, have, compiler, &mut changes, &mut requests);

  Plan::settle(State::Deleted, changes, requests)
}

fn stage<R: Resource>(
  teardown: bool,
  want: &ConfigSnapshot,
  have: &ConfigSnapshot,
  compiler: &RequestCompiler,
  changes: &mut Vec<AnyResource>,
  requests: &mut Vec<Request>,
) {
  let current: Vec<&str> = R::entries(have).unwrap_or_default().iter().filter_map(R::identity).collect();

  let targets: Vec<&str> = if teardown {
    current
  } else {
    let existing: HashSet<&str> = current.into_iter().collect();
    R::entries(want)
      .unwrap_or_default()
      .iter()
      .filter_map(R::identity)
      .filter(|identity| existing.contains(identity))
      .collect()
  };

  for identity in targets {
    requests.push(compiler.delete(R::COLLECTION, identity));
    changes.push(R::reference(identity).into_any());
  }
}
