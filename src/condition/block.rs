// condor/src/condition/block.rs

//! Predicate-closure condition: gate a task on an arbitrary boolean check.

use crate::condition::base::{run_condition, Completion, Condition, ConditionState};
use crate::condition::outcome::ConditionOutcome;
use crate::error::CondorError;
use crate::task::core::{Task, TaskCore};
use async_trait::async_trait;
use std::sync::Arc;

/// The predicate a [`BlockCondition`] evaluates.
pub type ConditionPredicate = Box<dyn Fn() -> bool + Send + Sync + 'static>;

/// Condition defined by a closure. A `false` verdict resolves
/// `Failed(BlockConditionFailed)`.
pub struct BlockCondition {
  state: ConditionState,
  predicate: ConditionPredicate,
}

impl BlockCondition {
  pub fn new(predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
    BlockCondition {
      state: ConditionState::new("BlockCondition", false),
      predicate: Box::new(predicate),
    }
  }
}

#[async_trait]
impl Task for BlockCondition {
  fn core(&self) -> &TaskCore {
    self.state.core()
  }

  async fn execute(self: Arc<Self>) {
    run_condition(self).await
  }
}

#[async_trait]
impl Condition for BlockCondition {
  fn state(&self) -> &ConditionState {
    &self.state
  }

  async fn evaluate(&self, _target: Arc<dyn Task>, completion: Completion) {
    if (self.predicate)() {
      completion.complete(ConditionOutcome::Satisfied);
    } else {
      completion.complete(ConditionOutcome::Failed(CondorError::BlockConditionFailed));
    }
  }
}
