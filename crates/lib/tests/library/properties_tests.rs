//! Behavioral properties of the reconciliation engine.

use pkisync_lib::model::ConfigSnapshot;
use pkisync_lib::policy::{State, compute_plan};
use pkisync_lib::reconcile::{Invocation, ReconcileError, Reconciler};
use pkisync_lib::request::{Method, PathTable, RequestCompiler};
use serde_json::json;

use super::common::{device, lab_config, snapshot};

fn plan(state: State, want: Option<&ConfigSnapshot>, have: &ConfigSnapshot) -> pkisync_lib::policy::Plan {
  compute_plan(state, want, have, &RequestCompiler::default()).unwrap()
}

#[test]
fn merged_never_deletes() {
  let wants = [
    ConfigSnapshot::default(),
    snapshot(json!({ "trust-stores": [] })),
    snapshot(json!({ "trust-stores": [{ "name": "other" }] })),
    lab_config(),
  ];
  for want in &wants {
    let plan = plan(State::Merged, Some(want), &lab_config());
    assert!(plan.requests.iter().all(|r| r.method != Method::Delete));
  }
}

#[test]
fn overridden_deletes_precede_puts() {
  let want = snapshot(json!({
    "security-profiles": [{ "profile-name": "rest", "trust-store": "fresh" }],
    "trust-stores": [{ "name": "fresh", "ca-name": ["CA7"] }]
  }));

  let plan = plan(State::Overridden, Some(&want), &lab_config());

  let first_put = plan.requests.iter().position(|r| r.method == Method::Put).unwrap();
  let last_delete = plan.requests.iter().rposition(|r| r.method == Method::Delete).unwrap();
  assert!(last_delete < first_put);
  assert_eq!(plan.commands.len(), plan.requests.len());
}

#[test]
fn deleted_selects_by_identity_intersection() {
  let have = snapshot(json!({ "trust-stores": [{ "name": "X" }, { "name": "Y" }] }));
  let want = snapshot(json!({ "trust-stores": [{ "name": "X" }, { "name": "Z" }] }));

  let plan = plan(State::Deleted, Some(&want), &have);

  assert_eq!(plan.requests.len(), 1);
  assert_eq!(plan.requests[0].path, "data/openconfig-pki:pki/trust-stores/trust-store=X");
}

#[test]
fn commands_without_requests_report_unchanged() {
  let want = snapshot(json!({ "trust-stores": [{ "name": "nowhere" }] }));
  let device = device(ConfigSnapshot::default());
  let invocation = Invocation {
    want: Some(want),
    state: State::Deleted,
    check_mode: false,
  };

  let outcome = Reconciler::default().run(&invocation, &device, &device).unwrap();

  assert!(!outcome.changed);
  assert!(outcome.commands.is_empty());
}

#[test]
fn custom_path_root_flows_through_to_device() {
  let paths = PathTable::new("restconf/data/openconfig-pki:pki");
  let device = pkisync_lib::device::LocalDevice::new(paths.clone(), ConfigSnapshot::default());
  let invocation = Invocation {
    want: Some(snapshot(json!({ "trust-stores": [{ "name": "ts", "ca-name": ["CA"] }] }))),
    state: State::Merged,
    check_mode: false,
  };

  let outcome = Reconciler::new(paths).run(&invocation, &device, &device).unwrap();

  assert!(outcome.requests[0].path.starts_with("restconf/"));
  assert_eq!(device.snapshot().trust_stores.unwrap().len(), 1);
}

#[test]
fn device_rejection_leaves_earlier_requests_applied() {
  // The device emulator rejects deleting a missing resource; reaching that
  // through the engine needs a have that disagrees with the device.
  let device = device(ConfigSnapshot::default());
  let compiler = RequestCompiler::default();
  let requests = vec![
    compiler.put(&snapshot(json!({ "trust-stores": [{ "name": "a" }] })).trust_stores.unwrap()[0]).unwrap(),
    compiler.delete(pkisync_lib::model::Collection::TrustStores, "ghost"),
  ];

  let err = pkisync_lib::reconcile::Transport::execute(&device, &requests).unwrap_err();
  let err = ReconcileError::from(err);

  assert!(err.to_string().contains("not found"));
  assert_eq!(device.snapshot().trust_stores.unwrap().len(), 1);
}
