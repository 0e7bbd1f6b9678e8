//! Outcome tagging for the caller-visible change report.
//!
//! Every command surfaced to the caller carries the state that produced it.
//! The tag is observational only; requests are compiled independently.

use serde::Serialize;

use crate::model::{AnyResource, Collection};
use crate::policy::State;

/// A policy-selected change, tagged with the state that produced it.
///
/// For deletions the resource is an identity reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
  pub collection: Collection,
  pub state: State,
  pub resource: AnyResource,
}

/// Tag each change with `state`.
///
/// Changes are owned copies of the policy inputs, so want and have are never
/// touched.
pub fn record(state: State, changes: impl IntoIterator<Item = AnyResource>) -> Vec<Command> {
  changes
    .into_iter()
    .map(|resource| Command {
      collection: resource.collection(),
      state,
      resource,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{Resource, TrustStore};
  use crate::util::testutil::profile;
  use serde_json::json;

  #[test]
  fn every_change_is_tagged() {
    let commands = record(
      State::Replaced,
      [
        profile("rest").trust_store("ts").build().into_any(),
        TrustStore::reference("ts").into_any(),
      ],
    );

    assert_eq!(commands.len(), 2);
    assert!(commands.iter().all(|c| c.state == State::Replaced));
    assert_eq!(commands[0].collection, Collection::SecurityProfiles);
    assert_eq!(commands[1].collection, Collection::TrustStores);
  }

  #[test]
  fn command_serializes_with_state_and_collection() {
    let commands = record(State::Deleted, [TrustStore::reference("ts").into_any()]);
    assert_eq!(
      serde_json::to_value(&commands[0]).unwrap(),
      json!({ "collection": "trust-stores", "state": "deleted", "resource": { "name": "ts" } })
    );
  }
}
