//! Reconcile orchestration.
//!
//! One invocation runs synchronously:
//!
//! 1. Fetch current state (`before`)
//! 2. Compute the plan for the selected state
//! 3. Execute the full request sequence in one call (skipped in check mode)
//! 4. Fetch current state again (`after`, reported only when changed)
//!
//! There is no rollback: if execution fails part way, earlier requests stay
//! applied and the error is returned as is.

mod types;

pub use types::*;

use tracing::{error, info};

use crate::policy::compute_plan;
use crate::request::{PathTable, RequestCompiler};

/// Runs reconcile invocations against a facts provider and a transport.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
  compiler: RequestCompiler,
}

impl Reconciler {
  pub fn new(paths: PathTable) -> Self {
    Self {
      compiler: RequestCompiler::new(paths),
    }
  }

  /// Run one invocation.
  ///
  /// The facts provider is called exactly twice and the transport at most
  /// once, with the complete ordered request sequence.
  ///
  /// # Errors
  ///
  /// - [`ReconcileError::Schema`] before anything is sent
  /// - [`ReconcileError::Facts`] if current state cannot be read
  /// - [`ReconcileError::Transport`] if execution fails
  pub fn run(
    &self,
    invocation: &Invocation,
    facts: &impl FactsProvider,
    transport: &impl Transport,
  ) -> Result<Outcome, ReconcileError> {
    info!(state = %invocation.state, check_mode = invocation.check_mode, "starting reconcile");

    let before = facts.current_state()?;
    let plan = compute_plan(invocation.state, invocation.want.as_ref(), &before, &self.compiler)?;
    let changed = plan.has_changes();

    if changed && !invocation.check_mode {
      info!(requests = plan.requests.len(), "executing requests");
      if let Err(e) = transport.execute(&plan.requests) {
        error!(index = ?e.index, reason = %e.reason, "execution failed");
        return Err(e.into());
      }
    } else if changed {
      info!(requests = plan.requests.len(), "check mode, requests not sent");
    } else {
      info!("no changes");
    }

    let after = facts.current_state()?;

    Ok(Outcome {
      changed,
      commands: plan.commands,
      requests: plan.requests,
      before,
      after: changed.then_some(after),
    })
  }
}
