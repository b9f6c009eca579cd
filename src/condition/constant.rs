// condor/src/condition/constant.rs

//! Canonical always-satisfied / always-failed conditions. Composition
//! primitives and deterministic building blocks for tests.

use crate::condition::base::{run_condition, Completion, Condition, ConditionState};
use crate::condition::outcome::ConditionOutcome;
use crate::error::CondorError;
use crate::task::core::{Task, TaskCore};
use async_trait::async_trait;
use std::sync::Arc;

/// Condition that is always satisfied.
pub struct TrueCondition {
  state: ConditionState,
}

impl TrueCondition {
  pub fn new() -> Self {
    TrueCondition {
      state: ConditionState::new("TrueCondition", false),
    }
  }
}

impl Default for TrueCondition {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Task for TrueCondition {
  fn core(&self) -> &TaskCore {
    self.state.core()
  }

  async fn execute(self: Arc<Self>) {
    run_condition(self).await
  }
}

#[async_trait]
impl Condition for TrueCondition {
  fn state(&self) -> &ConditionState {
    &self.state
  }

  async fn evaluate(&self, _target: Arc<dyn Task>, completion: Completion) {
    completion.complete(ConditionOutcome::Satisfied);
  }
}

/// Condition that always fails with [`CondorError::FalseCondition`].
pub struct FalseCondition {
  state: ConditionState,
}

impl FalseCondition {
  pub fn new() -> Self {
    FalseCondition {
      state: ConditionState::new("FalseCondition", false),
    }
  }
}

impl Default for FalseCondition {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Task for FalseCondition {
  fn core(&self) -> &TaskCore {
    self.state.core()
  }

  async fn execute(self: Arc<Self>) {
    run_condition(self).await
  }
}

#[async_trait]
impl Condition for FalseCondition {
  fn state(&self) -> &ConditionState {
    &self.state
  }

  async fn evaluate(&self, _target: Arc<dyn Task>, completion: Completion) {
    completion.complete(ConditionOutcome::Failed(CondorError::FalseCondition));
  }
}
