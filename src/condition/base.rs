// condor/src/condition/base.rs

//! The condition base: shared state, the exactly-once completion path, the
//! common execution driver, and the `attach` helper used by attaching code.

use crate::condition::outcome::{ConditionOutcome, ResultSlot};
use crate::error::CondorError;
use crate::task::core::{Task, TaskCore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{event, instrument, Level};

/// State every condition carries: its own task core, the non-owning
/// back-reference to the gated task, the write-once result slot, and the
/// exclusivity flag forwarded to the external exclusivity manager.
pub struct ConditionState {
  core: TaskCore,
  // Weak by design: a condition must never keep its target alive.
  target: Mutex<Option<Weak<dyn Task>>>,
  result: ResultSlot,
  mutually_exclusive: bool,
}

impl ConditionState {
  pub fn new(name: impl Into<String>, mutually_exclusive: bool) -> Self {
    ConditionState {
      core: TaskCore::new(name),
      target: Mutex::new(None),
      result: ResultSlot::new(),
      mutually_exclusive,
    }
  }

  pub fn core(&self) -> &TaskCore {
    &self.core
  }

  pub fn mutually_exclusive(&self) -> bool {
    self.mutually_exclusive
  }

  /// The captured outcome. `None` until evaluation completes.
  pub fn result(&self) -> Option<ConditionOutcome> {
    self.result.get()
  }

  /// Binds the gated task. Set exactly once, before execution, by whoever
  /// attaches the condition; a rebind is a contract violation and keeps the
  /// first binding.
  pub fn bind_target(&self, target: &Arc<dyn Task>) {
    let mut guard = self.target.lock();
    if guard.is_some() {
      event!(
        Level::WARN,
        condition = %self.core.name(),
        "target already bound; keeping the first binding"
      );
      return;
    }
    *guard = Some(Arc::downgrade(target));
  }

  pub(crate) fn target(&self) -> Option<Arc<dyn Task>> {
    self.target.lock().as_ref().and_then(Weak::upgrade)
  }

  pub(crate) fn result_slot(&self) -> &ResultSlot {
    &self.result
  }
}

/// A task whose purpose is to assert a predicate about whether another
/// (gated) task should run.
///
/// `evaluate` is the override point for new condition kinds; everything else
/// is provided. Concrete conditions implement [`Task::execute`] by handing
/// themselves to [`run_condition`].
#[async_trait]
pub trait Condition: Task {
  /// Shared condition state (target binding, result slot, exclusivity flag).
  fn state(&self) -> &ConditionState;

  /// Whether the external exclusivity manager must serialize this condition
  /// against others sharing its category. The core only forwards the flag.
  fn mutually_exclusive(&self) -> bool {
    self.state().mutually_exclusive()
  }

  /// The captured outcome, readable after the condition finishes.
  fn result(&self) -> Option<ConditionOutcome> {
    self.state().result()
  }

  /// Binds the gated task this condition evaluates against.
  fn bind_target(&self, target: &Arc<dyn Task>) {
    self.state().bind_target(target)
  }

  /// Evaluates the predicate against `target`, reporting through
  /// `completion` exactly once, from any thread.
  ///
  /// The base implementation exists only to signal misuse: reaching it is a
  /// contract violation and resolves as a generic failure.
  async fn evaluate(&self, target: Arc<dyn Task>, completion: Completion) {
    let _ = target;
    event!(
      Level::ERROR,
      condition = %self.name(),
      "base evaluate reached; every concrete condition must override it"
    );
    completion.complete(ConditionOutcome::Failed(CondorError::ConditionFailed));
  }
}

/// Exactly-once finish path for a condition: stores the outcome into the
/// condition's result slot (first writer wins) and finishes the condition's
/// underlying task with the outcome's error.
#[derive(Clone)]
pub struct Completion {
  condition: Arc<dyn Condition>,
}

impl Completion {
  pub(crate) fn new(condition: Arc<dyn Condition>) -> Self {
    Completion { condition }
  }

  /// Records `outcome` and finishes the condition's task. A second call is
  /// a contract violation: it is rejected and the stored result is kept.
  pub fn complete(&self, outcome: ConditionOutcome) {
    let state = self.condition.state();
    if state.result_slot().set(outcome.clone()) {
      event!(
        Level::DEBUG,
        condition = %self.condition.name(),
        outcome = ?outcome,
        "condition completed"
      );
      state.core().finish(outcome.error());
    } else {
      event!(
        Level::WARN,
        condition = %self.condition.name(),
        "duplicate completion rejected; keeping the stored result"
      );
    }
  }
}

/// Drives one condition execution: the shared `execute` body every concrete
/// condition delegates to.
///
/// Invoked by the scheduler after the condition's dependencies finish. A
/// cancelled condition finishes immediately without evaluating and without a
/// result, so its dependents are not stalled. Executing a condition whose
/// target was never bound (or has been dropped) is a contract violation: it
/// still finishes, resolving as a generic failure.
#[instrument(name = "Condition::execute", skip(condition), fields(condition = %condition.name()))]
pub async fn run_condition<C>(condition: Arc<C>)
where
  C: Condition + 'static,
{
  if condition.is_cancelled() {
    event!(Level::DEBUG, "cancelled before execution; finishing without evaluating");
    condition.finish(None);
    return;
  }
  let target = condition.state().target();
  let completion = Completion::new(condition.clone() as Arc<dyn Condition>);
  match target {
    Some(target) => condition.evaluate(target, completion).await,
    None => {
      event!(Level::ERROR, "executed without a bound target; resolving as failed");
      completion.complete(ConditionOutcome::Failed(CondorError::ConditionFailed));
    }
  }
}

/// Attaches `condition` to gate `target`: binds the target and registers the
/// condition as one of the target's direct dependencies, so the scheduler
/// runs the condition first.
pub fn attach<C>(condition: &Arc<C>, target: &Arc<dyn Task>)
where
  C: Condition + 'static,
{
  condition.bind_target(target);
  target.add_dependency(Arc::clone(condition) as Arc<dyn Task>);
}
