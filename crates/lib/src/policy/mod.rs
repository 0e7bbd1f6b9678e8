//! Reconciliation policies.
//!
//! One of four strategies runs per invocation:
//!
//! | State        | Writes                                   | Removals                          |
//! |--------------|------------------------------------------|-----------------------------------|
//! | `merged`     | one `patch` per collection (diff only)   | never                             |
//! | `replaced`   | one `put` per diff entry (full want)     | never                             |
//! | `overridden` | one `put` per want not equal to have     | one `delete` per have not in want |
//! | `deleted`    | none                                     | targeted, or everything           |
//!
//! Removals go security profiles first and writes go trust stores first, since
//! profiles reference stores. Within one plan every `delete` precedes every
//! `put`.

mod deleted;
mod merged;
mod overridden;
mod replaced;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diff::compute_diff;
use crate::model::{AnyResource, ConfigSnapshot, SchemaError};
use crate::record::{Command, record};
use crate::request::{Request, RequestCompiler};

/// Reconciliation mode, also the outcome tag on commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
  #[default]
  Merged,
  Replaced,
  Overridden,
  Deleted,
}

impl State {
  pub const ALL: [State; 4] = [State::Merged, State::Replaced, State::Overridden, State::Deleted];

  pub fn as_str(self) -> &'static str {
    match self {
      State::Merged => "merged",
      State::Replaced => "replaced",
      State::Overridden => "overridden",
      State::Deleted => "deleted",
    }
  }
}

impl fmt::Display for State {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for State {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    State::ALL
      .into_iter()
      .find(|state| state.as_str() == s)
      .ok_or_else(|| format!("unknown state '{s}', expected one of merged, replaced, overridden, deleted"))
  }
}

/// Tagged commands and the ordered requests that realize them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
  pub state: State,
  pub commands: Vec<Command>,
  pub requests: Vec<Request>,
}

impl Plan {
  fn empty(state: State) -> Self {
    Self {
      state,
      commands: Vec::new(),
      requests: Vec::new(),
    }
  }

  /// Build the plan from untagged changes and compiled requests.
  ///
  /// Changes are tagged only when at least one request was compiled; a plan
  /// without requests reports no commands.
  fn settle(state: State, changes: Vec<AnyResource>, requests: Vec<Request>) -> Self {
    if changes.is_empty() || requests.is_empty() {
      return Self::empty(state);
    }
    Self {
      state,
      commands: record(state, changes),
      requests,
    }
  }

  /// True when executing the plan changes the device.
  pub fn has_changes(&self) -> bool {
    !self.requests.is_empty()
  }
}

/// Compute the plan converging `have` to `want` under `state`.
///
/// # Errors
///
/// Returns a [`SchemaError`] if either snapshot has a resource without an
/// identity or with a duplicate identity. Nothing is compiled in that case.
pub fn compute_plan(
  state: State,
  want: Option<&ConfigSnapshot>,
  have: &ConfigSnapshot,
  compiler: &RequestCompiler,
) -> Result<Plan, SchemaError> {
  let empty = ConfigSnapshot::default();
  let desired = want.unwrap_or(&empty);
  desired.validate()?;
  have.validate()?;

  let diff = compute_diff(desired, have)?;
  debug!(%state, entries = diff.len(), "selected policy");

  let plan = match state {
    State::Merged => merged::plan(&diff, compiler)?,
    State::Replaced => replaced::plan(&diff, desired, compiler)?,
    State::Overridden => overridden::plan(desired, have, compiler)?,
    State::Deleted => deleted::plan(desired, have, compiler),
  };

  info!(
    %state,
    commands = plan.commands.len(),
    requests = plan.requests.len(),
    "computed plan"
  );
  Ok(plan)
}
