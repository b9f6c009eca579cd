// condor/src/condition/composed.rs

//! Composition by wrapping: `ComposedCondition` owns an inner condition,
//! depends on it, and has the inner outcome injected before it evaluates.
//! `NegatedCondition` is the canonical variant transforming the injected
//! outcome instead of forwarding it.

use crate::condition::base::{run_condition, Completion, Condition, ConditionState};
use crate::condition::outcome::{ConditionOutcome, ResultSlot};
use crate::error::CondorError;
use crate::task::core::{same_task, Task, TaskCore};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{event, Level};

/// Wraps an inner condition `C`, forwarding its name and exclusivity.
///
/// The composed condition is the sole entry point that schedules and
/// observes `C`: construction creates a dependency edge on `C` and registers
/// a finish observer that injects `C`'s result into the `requirement` slot,
/// strictly before the outer `evaluate` can run.
pub struct ComposedCondition<C: Condition + 'static> {
  state: ConditionState,
  inner: Arc<C>,
  requirement: Arc<ResultSlot>,
}

impl<C: Condition + 'static> ComposedCondition<C> {
  /// Takes ownership of `inner`, copying its name and exclusivity.
  pub fn new(inner: C) -> Self {
    let name = inner.name().to_string();
    Self::named(inner, name)
  }

  /// Like [`ComposedCondition::new`] but with an explicit name for the
  /// outer condition.
  pub fn named(inner: C, name: impl Into<String>) -> Self {
    let mutually_exclusive = inner.mutually_exclusive();
    let inner = Arc::new(inner);
    let requirement = Arc::new(ResultSlot::new());

    // Inject the inner result on the inner condition's finishing thread.
    // The dependency edge below guarantees this runs before the outer
    // condition executes. Weak capture: the observer lives on the inner
    // condition's own core and must not keep it alive.
    {
      let slot = Arc::clone(&requirement);
      let weak = Arc::downgrade(&inner);
      inner.core().on_finish(Box::new(move |_finished: &TaskCore| {
        if let Some(inner) = weak.upgrade() {
          if let Some(result) = inner.result() {
            slot.set(result);
          }
        }
      }));
    }

    let state = ConditionState::new(name, mutually_exclusive);
    state.core().add_dependency(Arc::clone(&inner) as Arc<dyn Task>);
    ComposedCondition {
      state,
      inner,
      requirement,
    }
  }

  /// The inner condition, for handing its task to the scheduler. The
  /// composed condition remains its sole observer.
  pub fn inner(&self) -> &Arc<C> {
    &self.inner
  }

  /// The injected inner outcome, if the inner condition has produced one.
  pub fn requirement(&self) -> Option<ConditionOutcome> {
    self.requirement.get()
  }
}

#[async_trait]
impl<C: Condition + 'static> Task for ComposedCondition<C> {
  fn core(&self) -> &TaskCore {
    self.state.core()
  }

  async fn execute(self: Arc<Self>) {
    run_condition(self).await
  }

  /// The union of the outer set (which contains the inner condition itself)
  /// and the inner condition's own dependencies.
  fn direct_dependencies(&self) -> Vec<Arc<dyn Task>> {
    let mut deps = self.state.core().direct_dependencies();
    for dep in self.inner.direct_dependencies() {
      if !deps.iter().any(|d| same_task(d, &dep)) {
        deps.push(dep);
      }
    }
    deps
  }

  /// Removes from both dependency sets, keeping them consistent.
  fn remove_dependency(&self, dep: &Arc<dyn Task>) {
    self.inner.remove_dependency(dep);
    self.state.core().remove_dependency(dep);
  }
}

#[async_trait]
impl<C: Condition + 'static> Condition for ComposedCondition<C> {
  fn state(&self) -> &ConditionState {
    &self.state
  }

  /// The inner condition evaluates against the same target as the outer one.
  fn bind_target(&self, target: &Arc<dyn Task>) {
    self.inner.bind_target(target);
    self.state.bind_target(target);
  }

  async fn evaluate(&self, _target: Arc<dyn Task>, completion: Completion) {
    match self.requirement.get() {
      // Pass-through by default; variants like NegatedCondition transform
      // this step instead.
      Some(requirement) => completion.complete(requirement),
      None => {
        event!(
          Level::DEBUG,
          condition = %self.name(),
          "inner condition result was never injected"
        );
        completion.complete(ConditionOutcome::Failed(CondorError::RequirementNotSatisfied));
      }
    }
  }
}

/// Satisfied exactly when its inner condition failed; fails with
/// [`CondorError::NegationFailed`] when the inner condition was satisfied.
pub struct NegatedCondition<C: Condition + 'static> {
  composed: ComposedCondition<C>,
}

impl<C: Condition + 'static> NegatedCondition<C> {
  pub fn new(inner: C) -> Self {
    let name = format!("not({})", inner.name());
    NegatedCondition {
      composed: ComposedCondition::named(inner, name),
    }
  }

  pub fn inner(&self) -> &Arc<C> {
    self.composed.inner()
  }
}

#[async_trait]
impl<C: Condition + 'static> Task for NegatedCondition<C> {
  fn core(&self) -> &TaskCore {
    self.composed.core()
  }

  async fn execute(self: Arc<Self>) {
    run_condition(self).await
  }

  fn direct_dependencies(&self) -> Vec<Arc<dyn Task>> {
    self.composed.direct_dependencies()
  }

  fn remove_dependency(&self, dep: &Arc<dyn Task>) {
    self.composed.remove_dependency(dep)
  }
}

#[async_trait]
impl<C: Condition + 'static> Condition for NegatedCondition<C> {
  fn state(&self) -> &ConditionState {
    self.composed.state()
  }

  fn bind_target(&self, target: &Arc<dyn Task>) {
    self.composed.bind_target(target)
  }

  async fn evaluate(&self, _target: Arc<dyn Task>, completion: Completion) {
    match self.composed.requirement() {
      None => completion.complete(ConditionOutcome::Failed(CondorError::RequirementNotSatisfied)),
      Some(ConditionOutcome::Satisfied) => {
        completion.complete(ConditionOutcome::Failed(CondorError::NegationFailed))
      }
      Some(ConditionOutcome::Failed(_)) => completion.complete(ConditionOutcome::Satisfied),
    }
  }
}
