use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named resource collection on the device.
///
/// Each collection declares the identity attribute that addresses its
/// resources and the list node name used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
  SecurityProfiles,
  TrustStores,
}

impl Collection {
  /// Every known collection.
  pub const ALL: [Collection; 2] = [Collection::SecurityProfiles, Collection::TrustStores];

  /// Collection name as it appears in configuration and in paths.
  pub fn name(self) -> &'static str {
    match self {
      Collection::SecurityProfiles => "security-profiles",
      Collection::TrustStores => "trust-stores",
    }
  }

  /// The list node under the collection container.
  pub fn list_node(self) -> &'static str {
    match self {
      Collection::SecurityProfiles => "security-profile",
      Collection::TrustStores => "trust-store",
    }
  }

  /// The attribute that identifies a resource within this collection.
  pub fn identity_key(self) -> &'static str {
    match self {
      Collection::SecurityProfiles => "profile-name",
      Collection::TrustStores => "name",
    }
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Errors raised when a snapshot does not match the collection schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
  /// A resource lacks its identity attribute.
  #[error("{collection}[{index}]: missing identity attribute '{}'", .collection.identity_key())]
  MissingIdentity { collection: Collection, index: usize },

  /// Two resources in the same collection share an identity.
  #[error("{collection}: duplicate identity '{identity}'")]
  DuplicateIdentity { collection: Collection, identity: String },

  /// The input could not be parsed into the schema (unknown collection or
  /// attribute, wrong value type).
  #[error("invalid configuration: {0}")]
  Invalid(String),
}

/// A resource held in a collection, addressable by its identity.
pub trait Resource: fmt::Debug + Clone + PartialEq + Serialize + DeserializeOwned {
  /// Collection this resource type belongs to.
  const COLLECTION: Collection;

  /// The identity value, if present.
  fn identity(&self) -> Option<&str>;

  /// A resource carrying only the given identity.
  fn reference(identity: &str) -> Self;

  /// Identity plus every attribute present in `self` whose value differs from
  /// `have`. Returns `None` when nothing differs.
  fn delta(&self, have: &Self) -> Option<Self>;

  /// This resource's entries in a snapshot.
  fn entries(snapshot: &ConfigSnapshot) -> Option<&[Self]>;

  /// Mutable access to this resource's collection in a snapshot.
  fn entries_mut(snapshot: &mut ConfigSnapshot) -> &mut Option<Vec<Self>>;

  fn into_any(self) -> AnyResource;
}

/// Returns `want` when it is present and differs from `have`.
fn changed<T: PartialEq + Clone>(want: &Option<T>, have: &Option<T>) -> Option<T> {
  match want {
    Some(value) if have.as_ref() != Some(value) => Some(value.clone()),
    _ => None,
  }
}

/// A store of CA certificates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TrustStore {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// CA certificates in the trust store.
  #[serde(default, alias = "ca-names", skip_serializing_if = "Option::is_none")]
  pub ca_name: Option<Vec<String>>,
}

impl Resource for TrustStore {
  const COLLECTION: Collection = Collection::TrustStores;

  fn identity(&self) -> Option<&str> {
    self.name.as_deref()
  }

  fn reference(identity: &str) -> Self {
    Self {
      name: Some(identity.to_string()),
      ..Default::default()
    }
  }

  fn delta(&self, have: &Self) -> Option<Self> {
    let ca_name = changed(&self.ca_name, &have.ca_name);
    ca_name.is_some().then(|| Self {
      name: self.name.clone(),
      ca_name,
    })
  }

  fn entries(snapshot: &ConfigSnapshot) -> Option<&[Self]> {
    snapshot.trust_stores.as_deref()
  }

  fn entries_mut(snapshot: &mut ConfigSnapshot) -> &mut Option<Vec<Self>> {
    &mut snapshot.trust_stores
  }

  fn into_any(self) -> AnyResource {
    AnyResource::TrustStore(self)
  }
}

/// An application security profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SecurityProfile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub profile_name: Option<String>,
  /// Host certificate name.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub certificate_name: Option<String>,
  /// Name of the associated trust store.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub trust_store: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub revocation_check: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub peer_name_check: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key_usage_check: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cdp_list: Option<Vec<String>>,
  /// OCSP responders, in the order they are consulted.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ocsp_responder_list: Option<Vec<String>>,
}

impl SecurityProfile {
  fn has_attributes(&self) -> bool {
    self.certificate_name.is_some()
      || self.trust_store.is_some()
      || self.revocation_check.is_some()
      || self.peer_name_check.is_some()
      || self.key_usage_check.is_some()
      || self.cdp_list.is_some()
      || self.ocsp_responder_list.is_some()
  }
}

impl Resource for SecurityProfile {
  const COLLECTION: Collection = Collection::SecurityProfiles;

  fn identity(&self) -> Option<&str> {
    self.profile_name.as_deref()
  }

  fn reference(identity: &str) -> Self {
    Self {
      profile_name: Some(identity.to_string()),
      ..Default::default()
    }
  }

  fn delta(&self, have: &Self) -> Option<Self> {
    let delta = Self {
      profile_name: self.profile_name.clone(),
      certificate_name: changed(&self.certificate_name, &have.certificate_name),
      trust_store: changed(&self.trust_store, &have.trust_store),
      revocation_check: changed(&self.revocation_check, &have.revocation_check),
      peer_name_check: changed(&self.peer_name_check, &have.peer_name_check),
      key_usage_check: changed(&self.key_usage_check, &have.key_usage_check),
      cdp_list: changed(&self.cdp_list, &have.cdp_list),
      ocsp_responder_list: changed(&self.ocsp_responder_list, &have.ocsp_responder_list),
    };
    delta.has_attributes().then_some(delta)
  }

  fn entries(snapshot: &ConfigSnapshot) -> Option<&[Self]> {
    snapshot.security_profiles.as_deref()
  }

  fn entries_mut(snapshot: &mut ConfigSnapshot) -> &mut Option<Vec<Self>> {
    &mut snapshot.security_profiles
  }

  fn into_any(self) -> AnyResource {
    AnyResource::SecurityProfile(self)
  }
}

/// A resource of any collection, serialized as its bare attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnyResource {
  SecurityProfile(SecurityProfile),
  TrustStore(TrustStore),
}

impl AnyResource {
  pub fn collection(&self) -> Collection {
    match self {
      AnyResource::SecurityProfile(_) => Collection::SecurityProfiles,
      AnyResource::TrustStore(_) => Collection::TrustStores,
    }
  }

  pub fn identity(&self) -> Option<&str> {
    match self {
      AnyResource::SecurityProfile(sp) => sp.identity(),
      AnyResource::TrustStore(ts) => ts.identity(),
    }
  }
}

/// One full configuration view, desired or current.
///
/// A collection that is not mentioned (`None`) is distinct from one that is
/// mentioned but empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigSnapshot {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub security_profiles: Option<Vec<SecurityProfile>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub trust_stores: Option<Vec<TrustStore>>,
}

impl ConfigSnapshot {
  /// Build a snapshot from a JSON value, validating identities.
  ///
  /// `null` yields an empty snapshot.
  pub fn from_value(value: serde_json::Value) -> Result<Self, SchemaError> {
    if value.is_null() {
      return Ok(Self::default());
    }
    let snapshot: Self = serde_json::from_value(value).map_err(|e| SchemaError::Invalid(e.to_string()))?;
    snapshot.validate()?;
    Ok(snapshot)
  }

  pub fn from_json_str(input: &str) -> Result<Self, SchemaError> {
    if input.trim().is_empty() {
      return Ok(Self::default());
    }
    let value: serde_json::Value = serde_json::from_str(input).map_err(|e| SchemaError::Invalid(e.to_string()))?;
    Self::from_value(value)
  }

  pub fn from_yaml_str(input: &str) -> Result<Self, SchemaError> {
    let value: serde_json::Value = serde_yaml::from_str(input).map_err(|e| SchemaError::Invalid(e.to_string()))?;
    Self::from_value(value)
  }

  /// Check that every resource carries an identity and that identities are
  /// unique per collection.
  pub fn validate(&self) -> Result<(), SchemaError> {
    validate_entries(SecurityProfile::entries(self))?;
    validate_entries(TrustStore::entries(self))
  }

  /// True when the snapshot names no resources at all.
  pub fn is_empty(&self) -> bool {
    SecurityProfile::entries(self).is_none_or(|e| e.is_empty()) && TrustStore::entries(self).is_none_or(|e| e.is_empty())
  }

  /// Total number of resources across collections.
  pub fn resource_count(&self) -> usize {
    SecurityProfile::entries(self).map_or(0, |e| e.len()) + TrustStore::entries(self).map_or(0, |e| e.len())
  }
}

fn validate_entries<R: Resource>(entries: Option<&[R]>) -> Result<(), SchemaError> {
  let mut seen = HashSet::new();
  for (index, resource) in entries.unwrap_or_default().iter().enumerate() {
    let identity = resource.identity().ok_or(SchemaError::MissingIdentity {
      collection: R::COLLECTION,
      index,
    })?;
    if !seen.insert(identity) {
      return Err(SchemaError::DuplicateIdentity {
        collection: R::COLLECTION,
        identity: identity.to_string(),
      });
    }
  }
  Ok(())
}
