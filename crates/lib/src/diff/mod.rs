//! Diff computation between a desired and a current snapshot.
//!
//! Resources are matched by identity within each collection. A desired
//! resource with no current counterpart is an addition and appears whole; a
//! matched resource appears only if some attribute it declares differs, and
//! then carries just its identity plus those attributes. Resources that exist
//! only in the current snapshot never appear: deciding what to delete is left
//! to the reconciliation policy.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::model::{ConfigSnapshot, Resource, SchemaError, SecurityProfile, TrustStore};

/// Added or changed resources per collection, shaped like the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiffResult {
  entries: ConfigSnapshot,
}

impl DiffResult {
  /// Diff entries of one collection, in desired declaration order.
  pub fn entries<R: Resource>(&self) -> &[R] {
    R::entries(&self.entries).unwrap_or_default()
  }

  /// Returns true if nothing needs to be added or changed.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Number of entries across collections.
  pub fn len(&self) -> usize {
    self.entries.resource_count()
  }
}

/// Compute the diff between `want` and `have`.
///
/// # Errors
///
/// Returns [`SchemaError::MissingIdentity`] if a resource in either snapshot
/// lacks its identity attribute.
pub fn compute_diff(want: &ConfigSnapshot, have: &ConfigSnapshot) -> Result<DiffResult, SchemaError> {
  let mut diff = DiffResult::default();
  diff_collection::<SecurityProfile>(want, have, &mut diff.entries)?;
  diff_collection::<TrustStore>(want, have, &mut diff.entries)?;

  debug!(
    security_profiles = diff.entries::<SecurityProfile>().len(),
    trust_stores = diff.entries::<TrustStore>().len(),
    "computed diff"
  );
  Ok(diff)
}

fn diff_collection<R: Resource>(
  want: &ConfigSnapshot,
  have: &ConfigSnapshot,
  out: &mut ConfigSnapshot,
) -> Result<(), SchemaError> {
  let current = index_by_identity(R::entries(have).unwrap_or_default())?;

  let mut entries = Vec::new();
  for (index, resource) in R::entries(want).unwrap_or_default().iter().enumerate() {
    let identity = resource.identity().ok_or(SchemaError::MissingIdentity {
      collection: R::COLLECTION,
      index,
    })?;
    match current.get(identity) {
      None => entries.push(resource.clone()),
      Some(existing) => entries.extend(resource.delta(existing)),
    }
  }

  if !entries.is_empty() {
    *R::entries_mut(out) = Some(entries);
  }
  Ok(())
}

/// Index a collection by identity.
///
/// # Errors
///
/// Returns [`SchemaError::MissingIdentity`] for the first resource without an
/// identity.
pub fn index_by_identity<R: Resource>(entries: &[R]) -> Result<HashMap<&str, &R>, SchemaError> {
  entries
    .iter()
    .enumerate()
    .map(|(index, resource)| {
      resource
        .identity()
        .map(|identity| (identity, resource))
        .ok_or(SchemaError::MissingIdentity {
          collection: R::COLLECTION,
          index,
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Collection;
  use crate::util::testutil::{profile, store};

  fn snapshot(profiles: Vec<SecurityProfile>, stores: Vec<TrustStore>) -> ConfigSnapshot {
    ConfigSnapshot {
      security_profiles: Some(profiles),
      trust_stores: Some(stores),
    }
  }

  #[test]
  fn diff_empty_snapshots() {
    let diff = compute_diff(&ConfigSnapshot::default(), &ConfigSnapshot::default()).unwrap();
    assert!(diff.is_empty());
    assert_eq!(diff.len(), 0);
  }

  #[test]
  fn missing_resource_is_added_whole() {
    let want = snapshot(vec![profile("rest").trust_store("ts1").build()], vec![]);
    let diff = compute_diff(&want, &ConfigSnapshot::default()).unwrap();

    assert_eq!(diff.entries::<SecurityProfile>(), &[profile("rest").trust_store("ts1").build()]);
    assert!(diff.entries::<TrustStore>().is_empty());
  }

  #[test]
  fn changed_resource_carries_only_differing_attributes() {
    let have = snapshot(
      vec![profile("rest").certificate("host").trust_store("ts1").build()],
      vec![],
    );
    let want = snapshot(
      vec![profile("rest").certificate("host").trust_store("ts2").build()],
      vec![],
    );

    let diff = compute_diff(&want, &have).unwrap();
    assert_eq!(diff.entries::<SecurityProfile>(), &[profile("rest").trust_store("ts2").build()]);
  }

  #[test]
  fn unchanged_resource_is_not_in_diff() {
    let have = snapshot(
      vec![profile("rest").certificate("host").trust_store("ts1").build()],
      vec![store("ts1", &["CA1"])],
    );
    let want = snapshot(vec![profile("rest").trust_store("ts1").build()], vec![store("ts1", &["CA1"])]);

    assert!(compute_diff(&want, &have).unwrap().is_empty());
  }

  #[test]
  fn have_only_resources_never_appear() {
    let have = snapshot(vec![profile("old").build()], vec![store("old-ts", &[])]);
    let want = snapshot(vec![], vec![]);

    assert!(compute_diff(&want, &have).unwrap().is_empty());
  }

  #[test]
  fn present_empty_differs_from_absent() {
    let have = snapshot(vec![], vec![TrustStore::reference("ts")]);
    let want = snapshot(vec![], vec![store("ts", &[])]);

    let diff = compute_diff(&want, &have).unwrap();
    assert_eq!(diff.entries::<TrustStore>(), &[store("ts", &[])]);
  }

  #[test]
  fn reordered_list_is_a_change() {
    let have = snapshot(vec![], vec![store("ts", &["CA1", "CA2"])]);
    let want = snapshot(vec![], vec![store("ts", &["CA2", "CA1"])]);

    let diff = compute_diff(&want, &have).unwrap();
    assert_eq!(diff.entries::<TrustStore>().len(), 1);
  }

  #[test]
  fn diff_preserves_declaration_order() {
    let want = snapshot(vec![], vec![store("b", &[]), store("a", &[]), store("c", &[])]);
    let diff = compute_diff(&want, &ConfigSnapshot::default()).unwrap();

    let names: Vec<_> = diff
      .entries::<TrustStore>()
      .iter()
      .filter_map(|ts| ts.identity())
      .collect();
    assert_eq!(names, ["b", "a", "c"]);
  }

  #[test]
  fn missing_identity_in_want_is_schema_error() {
    let want = snapshot(vec![profile("ok").build(), SecurityProfile::default()], vec![]);
    let err = compute_diff(&want, &ConfigSnapshot::default()).unwrap_err();

    assert_eq!(
      err,
      SchemaError::MissingIdentity {
        collection: Collection::SecurityProfiles,
        index: 1
      }
    );
  }

  #[test]
  fn missing_identity_in_have_is_schema_error() {
    let have = snapshot(vec![], vec![TrustStore::default()]);
    let err = compute_diff(&ConfigSnapshot::default(), &have).unwrap_err();
    assert!(matches!(
      err,
      SchemaError::MissingIdentity {
        collection: Collection::TrustStores,
        ..
      }
    ));
  }
}
