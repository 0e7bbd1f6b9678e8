//! pkisync-lib: declarative reconciliation of device PKI configuration
//!
//! This crate computes the minimal, ordered request sequence that converges a
//! device's PKI configuration to a desired state:
//! - `model`: trust stores, security profiles and the snapshots holding them
//! - `diff`: identity-keyed delta between desired and current snapshots
//! - `policy`: the merged, replaced, overridden and deleted strategies
//! - `request`: path table and request compilation
//! - `reconcile`: one invocation against a facts provider and a transport
//! - `device`: a local, file-backed device implementing both collaborators

pub mod consts;
pub mod device;
pub mod diff;
pub mod model;
pub mod platform;
pub mod policy;
pub mod reconcile;
pub mod record;
pub mod request;
pub mod util;
