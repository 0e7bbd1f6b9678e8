//! Applying a plan and reconciling again must compile nothing.

use pkisync_lib::model::ConfigSnapshot;
use pkisync_lib::policy::State;
use serde_json::json;

use super::common::{device, lab_config, reconcile, snapshot};

fn want() -> ConfigSnapshot {
  snapshot(json!({
    "security-profiles": [
      { "profile-name": "rest", "certificate-name": "host2", "trust-store": "new-ts", "revocation-check": true },
      { "profile-name": "gnmi", "key-usage-check": false }
    ],
    "trust-stores": [
      { "name": "lab-ts", "ca-name": ["CA3", "CA1"] },
      { "name": "new-ts", "ca-name": ["CA9"] }
    ]
  }))
}

#[test]
fn second_run_is_a_no_op_for_every_mode() {
  for state in [State::Merged, State::Replaced, State::Overridden, State::Deleted] {
    let device = device(lab_config());

    let first = reconcile(&device, Some(want()), state);
    assert!(first.changed, "{state}: first run should change the device");

    let second = reconcile(&device, Some(want()), state);
    assert!(!second.changed, "{state}: second run changed the device");
    assert!(second.commands.is_empty(), "{state}: second run produced commands");
    assert!(second.requests.is_empty(), "{state}: second run produced requests");
  }
}

#[test]
fn overridden_converges_to_want_exactly() {
  let device = device(lab_config());

  let outcome = reconcile(&device, Some(want()), State::Overridden);

  assert_eq!(outcome.before, lab_config());
  assert_eq!(outcome.after, Some(want()));
}

#[test]
fn replaced_clears_unmentioned_attributes_merged_keeps_them() {
  let have = snapshot(json!({
    "security-profiles": [{ "profile-name": "rest", "certificate-name": "host", "trust-store": "ts1" }]
  }));
  let want = snapshot(json!({
    "security-profiles": [{ "profile-name": "rest", "certificate-name": "other" }]
  }));

  let merged = device(have.clone());
  reconcile(&merged, Some(want.clone()), State::Merged);
  assert_eq!(
    merged.snapshot(),
    snapshot(json!({
      "security-profiles": [{ "profile-name": "rest", "certificate-name": "other", "trust-store": "ts1" }]
    }))
  );

  let replaced = device(have);
  reconcile(&replaced, Some(want.clone()), State::Replaced);
  assert_eq!(replaced.snapshot(), want);
}

#[test]
fn teardown_reissues_only_while_resources_exist() {
  let device = device(lab_config());

  let first = reconcile(&device, None, State::Deleted);
  assert_eq!(first.requests.len(), 4);
  assert_eq!(first.after, Some(ConfigSnapshot::default()));

  let second = reconcile(&device, None, State::Deleted);
  assert!(!second.changed);
}
