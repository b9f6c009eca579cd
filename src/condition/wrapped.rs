// condor/src/condition/wrapped.rs

//! Adapter admitting legacy condition-shaped values into the
//! dependency/injection-aware condition graph without rewriting them.

use crate::condition::base::{run_condition, Completion, Condition, ConditionState};
use crate::task::core::{Task, TaskCore};
use async_trait::async_trait;
use std::sync::Arc;

/// The capability set older condition implementations expose.
#[async_trait]
pub trait LegacyCondition: Send + Sync {
  fn is_mutually_exclusive(&self) -> bool;

  fn name(&self) -> &str;

  async fn evaluate(&self, target: Arc<dyn Task>, completion: Completion);
}

/// Adapts a [`LegacyCondition`] into a full [`Condition`]. No independent
/// logic: name and exclusivity are copied at construction, evaluation is
/// forwarded verbatim.
pub struct WrappedCondition {
  state: ConditionState,
  legacy: Arc<dyn LegacyCondition>,
}

impl WrappedCondition {
  pub fn new(legacy: Arc<dyn LegacyCondition>) -> Self {
    let state = ConditionState::new(legacy.name(), legacy.is_mutually_exclusive());
    WrappedCondition { state, legacy }
  }
}

#[async_trait]
impl Task for WrappedCondition {
  fn core(&self) -> &TaskCore {
    self.state.core()
  }

  async fn execute(self: Arc<Self>) {
    run_condition(self).await
  }
}

#[async_trait]
impl Condition for WrappedCondition {
  fn state(&self) -> &ConditionState {
    &self.state
  }

  async fn evaluate(&self, target: Arc<dyn Task>, completion: Completion) {
    self.legacy.evaluate(target, completion).await
  }
}
