//! Local device emulation.
//!
//! [`LocalDevice`] acts as both facts provider and transport over a
//! [`ConfigSnapshot`], optionally persisted to a JSON file. Requests are
//! applied with these semantics:
//!
//! - `patch` on a collection path: each item is merged into the resource with
//!   the same identity (attributes present replace, absent are kept), or
//!   appended if there is none
//! - `put` on a resource path: the resource is replaced entirely, or created
//! - `delete` on a resource path: the resource is removed; missing is an error
//!
//! Execution stops at the first failing request. Everything applied before it
//! is kept, and persisted. A failed request is reported even if persisting
//! afterwards also fails.

mod storage;

pub use storage::{DeviceError, DeviceStore};

use std::cell::RefCell;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::model::{Collection, ConfigSnapshot, Resource, SecurityProfile, TrustStore};
use crate::reconcile::{FactsError, FactsProvider, Transport, TransportError};
use crate::request::{Method, PathTable, Request, Target};

/// An in-process device holding PKI configuration.
#[derive(Debug)]
pub struct LocalDevice {
  paths: PathTable,
  state: RefCell<ConfigSnapshot>,
  store: Option<DeviceStore>,
}

impl LocalDevice {
  /// An in-memory device starting from `state`.
  pub fn new(paths: PathTable, state: ConfigSnapshot) -> Self {
    Self {
      paths,
      state: RefCell::new(state),
      store: None,
    }
  }

  /// A device backed by `store`, loading its current contents.
  pub fn open(paths: PathTable, store: DeviceStore) -> Result<Self, DeviceError> {
    let state = store.load()?;
    debug!(path = %store.path().display(), resources = state.resource_count(), "opened device");
    Ok(Self {
      paths,
      state: RefCell::new(state),
      store: Some(store),
    })
  }

  /// Current contents, with emptied collections dropped.
  pub fn snapshot(&self) -> ConfigSnapshot {
    let mut snapshot = self.state.borrow().clone();
    if snapshot.security_profiles.as_ref().is_some_and(Vec::is_empty) {
      snapshot.security_profiles = None;
    }
    if snapshot.trust_stores.as_ref().is_some_and(Vec::is_empty) {
      snapshot.trust_stores = None;
    }
    snapshot
  }

  fn persist(&self) -> Result<(), DeviceError> {
    match &self.store {
      Some(store) => store.save(&self.snapshot()),
      None => Ok(()),
    }
  }
}

impl FactsProvider for LocalDevice {
  /// File-backed devices re-read their file, picking up changes made by
  /// other writers since the device was opened.
  fn current_state(&self) -> Result<ConfigSnapshot, FactsError> {
    if let Some(store) = &self.store {
      let loaded = store.load().map_err(|e| match e {
        DeviceError::Parse(schema) => FactsError::Schema(schema),
        other => FactsError::Unavailable(other.to_string()),
      })?;
      *self.state.borrow_mut() = loaded;
    }
    Ok(self.snapshot())
  }
}

impl Transport for LocalDevice {
  fn execute(&self, requests: &[Request]) -> Result<(), TransportError> {
    let mut failure = None;
    {
      let mut state = self.state.borrow_mut();
      for (index, request) in requests.iter().enumerate() {
        debug!(index, method = request.method.as_str(), path = %request.path, "applying request");
        if let Err(reason) = apply_request(&self.paths, &mut state, request) {
          warn!(index, path = %request.path, %reason, "request rejected");
          failure = Some(TransportError::at(index, reason));
          break;
        }
      }
    }

    let saved = self.persist();
    match (failure, saved) {
      (Some(failure), Err(e)) => {
        warn!(error = %e, "failed to save device state after rejected request");
        Err(failure)
      }
      (Some(failure), Ok(())) => Err(failure),
      (None, Err(e)) => Err(TransportError::new(e.to_string())),
      (None, Ok(())) => Ok(()),
    }
  }
}

fn apply_request(paths: &PathTable, state: &mut ConfigSnapshot, request: &Request) -> Result<(), String> {
  let target = paths
    .resolve(&request.path)
    .ok_or_else(|| format!("unknown path {}", request.path))?;
  match target.collection {
    Collection::SecurityProfiles => apply_to::<SecurityProfile>(paths, state, &target, request),
    Collection::TrustStores => apply_to::<TrustStore>(paths, state, &target, request),
  }
}

fn apply_to<R: Resource>(
  paths: &PathTable,
  state: &mut ConfigSnapshot,
  target: &Target,
  request: &Request,
) -> Result<(), String> {
  let entries = R::entries_mut(state).get_or_insert_with(Vec::new);

  match (request.method, target.identity.as_deref()) {
    (Method::Patch, None) => {
      for incoming in decode_items::<R>(paths, request)? {
        match entries.iter_mut().find(|r| r.identity() == incoming.identity()) {
          Some(existing) => *existing = merge(existing, &incoming)?,
          None => entries.push(incoming),
        }
      }
      Ok(())
    }
    (Method::Put, Some(identity)) => {
      let mut items = decode_items::<R>(paths, request)?;
      let replacement = match (items.pop(), items.is_empty()) {
        (Some(item), true) if item.identity() == Some(identity) => item,
        _ => return Err(format!("put payload must hold exactly '{identity}'")),
      };
      match entries.iter_mut().find(|r| r.identity() == Some(identity)) {
        Some(existing) => *existing = replacement,
        None => entries.push(replacement),
      }
      Ok(())
    }
    (Method::Delete, Some(identity)) => {
      let position = entries
        .iter()
        .position(|r| r.identity() == Some(identity))
        .ok_or_else(|| format!("{} '{identity}' not found", R::COLLECTION))?;
      entries.remove(position);
      Ok(())
    }
    (method, _) => Err(format!("{} not supported on {}", method.as_str(), request.path)),
  }
}

/// Decode `{wrapper: [{<key>: id, "config": {...}}]}` into resources.
fn decode_items<R: Resource>(paths: &PathTable, request: &Request) -> Result<Vec<R>, String> {
  let wrapper = paths.wrapper(R::COLLECTION);
  let items = request
    .data
    .as_ref()
    .and_then(|data| data.get(&wrapper))
    .and_then(Value::as_array)
    .ok_or_else(|| format!("payload is missing '{wrapper}'"))?;

  items
    .iter()
    .map(|item| {
      let key = R::COLLECTION.identity_key();
      let identity = item.get(key).cloned().ok_or_else(|| format!("item is missing '{key}'"))?;
      let mut config = item
        .get("config")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
      config.entry(key).or_insert(identity);
      serde_json::from_value(Value::Object(config)).map_err(|e| e.to_string())
    })
    .collect()
}

/// Attribute-level merge: attributes present in `incoming` replace those in
/// `existing`.
fn merge<R: Resource>(existing: &R, incoming: &R) -> Result<R, String> {
  let mut merged = to_map(existing)?;
  merged.extend(to_map(incoming)?);
  serde_json::from_value(Value::Object(merged)).map_err(|e| e.to_string())
}

fn to_map<R: Resource>(resource: &R) -> Result<Map<String, Value>, String> {
  match serde_json::to_value(resource).map_err(|e| e.to_string())? {
    Value::Object(map) => Ok(map),
    other => Err(format!("resource serialized as {other}")),
  }
}
