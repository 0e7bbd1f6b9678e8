//! Collaborator traits, invocation input/output and error types.

use serde::Serialize;
use thiserror::Error;

use crate::model::{ConfigSnapshot, SchemaError};
use crate::policy::State;
use crate::record::Command;
use crate::request::Request;

/// Source of the device's current configuration.
pub trait FactsProvider {
  fn current_state(&self) -> Result<ConfigSnapshot, FactsError>;
}

/// Executes an ordered request sequence against the device.
///
/// Requests must be applied in order. On failure, requests before the failing
/// one are assumed to be applied.
pub trait Transport {
  fn execute(&self, requests: &[Request]) -> Result<(), TransportError>;
}

/// The facts provider could not produce the current state.
#[derive(Debug, Error)]
pub enum FactsError {
  /// The reported state does not match the schema.
  #[error("device state is invalid: {0}")]
  Schema(#[from] SchemaError),

  #[error("failed to read device state: {0}")]
  Unavailable(String),
}

/// The transport reported a failure. The cause is opaque to reconciliation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("transport failed: {reason}")]
pub struct TransportError {
  /// Position of the failing request in the sequence, when known.
  pub index: Option<usize>,
  pub reason: String,
}

impl TransportError {
  pub fn new(reason: impl Into<String>) -> Self {
    Self {
      index: None,
      reason: reason.into(),
    }
  }

  /// Failure of the request at `index`.
  pub fn at(index: usize, reason: impl Into<String>) -> Self {
    Self {
      index: Some(index),
      reason: reason.into(),
    }
  }
}

/// Errors that can occur during a reconcile invocation.
#[derive(Debug, Error)]
pub enum ReconcileError {
  /// Want or have did not match the schema. Nothing was sent.
  #[error("schema error: {0}")]
  Schema(#[from] SchemaError),

  #[error("facts error: {0}")]
  Facts(#[from] FactsError),

  /// Execution failed part way; earlier requests remain applied.
  #[error(transparent)]
  Transport(#[from] TransportError),
}

/// Input for one reconcile invocation.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
  /// Desired configuration. `None` is treated as empty.
  pub want: Option<ConfigSnapshot>,
  pub state: State,
  /// Compile and report requests without sending them.
  pub check_mode: bool,
}

/// Result of a reconcile invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
  pub changed: bool,
  pub commands: Vec<Command>,
  /// Compiled requests, reported even in check mode.
  pub requests: Vec<Request>,
  pub before: ConfigSnapshot,
  /// State after execution, only when `changed`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub after: Option<ConfigSnapshot>,
}
