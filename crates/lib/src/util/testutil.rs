//! Test utilities for pkisync-lib.
//!
//! Builders for resources so tests can state only the attributes they care
//! about.

use crate::model::{SecurityProfile, TrustStore};

/// Builder for a [`SecurityProfile`] with the given identity.
pub fn profile(name: &str) -> ProfileBuilder {
  ProfileBuilder(SecurityProfile {
    profile_name: Some(name.to_string()),
    ..Default::default()
  })
}

/// A [`TrustStore`] holding the given CA names.
pub fn store(name: &str, cas: &[&str]) -> TrustStore {
  TrustStore {
    name: Some(name.to_string()),
    ca_name: Some(strings(cas)),
  }
}

fn strings(values: &[&str]) -> Vec<String> {
  values.iter().map(|v| v.to_string()).collect()
}

pub struct ProfileBuilder(SecurityProfile);

impl ProfileBuilder {
  pub fn certificate(mut self, name: &str) -> Self {
    self.0.certificate_name = Some(name.to_string());
    self
  }

  pub fn trust_store(mut self, name: &str) -> Self {
    self.0.trust_store = Some(name.to_string());
    self
  }

  pub fn revocation_check(mut self, enabled: bool) -> Self {
    self.0.revocation_check = Some(enabled);
    self
  }

  pub fn ocsp(mut self, responders: &[&str]) -> Self {
    self.0.ocsp_responder_list = Some(strings(responders));
    self
  }

  pub fn build(self) -> SecurityProfile {
    self.0
  }
}
