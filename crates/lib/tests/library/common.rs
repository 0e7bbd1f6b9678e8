//! Shared helpers for library integration tests.

use pkisync_lib::device::LocalDevice;
use pkisync_lib::model::ConfigSnapshot;
use pkisync_lib::policy::State;
use pkisync_lib::reconcile::{Invocation, Outcome, Reconciler};
use pkisync_lib::request::PathTable;

/// Parse a snapshot from JSON, panicking on schema errors.
pub fn snapshot(value: serde_json::Value) -> ConfigSnapshot {
  ConfigSnapshot::from_value(value).unwrap()
}

/// An in-memory device holding `state`.
pub fn device(state: ConfigSnapshot) -> LocalDevice {
  LocalDevice::new(PathTable::default(), state)
}

/// Run one invocation against `device`, which acts as facts and transport.
pub fn reconcile(device: &LocalDevice, want: Option<ConfigSnapshot>, state: State) -> Outcome {
  let invocation = Invocation {
    want,
    state,
    check_mode: false,
  };
  Reconciler::default().run(&invocation, device, device).unwrap()
}

/// A populated device configuration.
pub fn lab_config() -> ConfigSnapshot {
  snapshot(serde_json::json!({
    "security-profiles": [
      {
        "profile-name": "rest",
        "certificate-name": "host",
        "trust-store": "default-ts",
        "ocsp-responder-list": ["http://example.com/ocspa", "http://example.com/ocspb"]
      },
      { "profile-name": "telemetry", "peer-name-check": true }
    ],
    "trust-stores": [
      { "name": "default-ts", "ca-name": ["CA2"] },
      { "name": "lab-ts", "ca-name": ["CA1", "CA3"] }
    ]
  }))
}
