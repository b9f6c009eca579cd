// tests/task_lifecycle_tests.rs
mod common;
use common::*;
use condor::{CondorError, ContinuationTask, Task, TaskCore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn finish_transitions_exactly_once() {
  setup_tracing();
  let task = ContinuationTask::new("once");
  assert!(task.core().finish(Some(CondorError::FalseCondition)));
  assert!(!task.core().finish(None), "second finish must be rejected");
  assert_eq!(task.core().finish_error(), Some(CondorError::FalseCondition));
}

#[test]
fn finish_observers_see_the_terminal_state() {
  setup_tracing();
  let task = ContinuationTask::new("observed");
  let seen = Arc::new(AtomicUsize::new(0));
  let s = Arc::clone(&seen);
  task.core().on_finish(Box::new(move |core: &TaskCore| {
    if core.finish_error() == Some(CondorError::FalseCondition) {
      s.fetch_add(1, Ordering::SeqCst);
    }
  }));
  task.core().finish(Some(CondorError::FalseCondition));
  assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn observer_registered_after_finish_runs_immediately() {
  setup_tracing();
  let task = ContinuationTask::new("late-observer");
  task.core().finish(None);
  let fired = Arc::new(AtomicUsize::new(0));
  let f = Arc::clone(&fired);
  task.core().on_finish(Box::new(move |_: &TaskCore| {
    f.fetch_add(1, Ordering::SeqCst);
  }));
  assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn dependencies_can_be_added_and_removed() {
  let task = ContinuationTask::new("deps");
  let dep: Arc<dyn Task> = Arc::new(ContinuationTask::new("dep"));
  task.add_dependency(Arc::clone(&dep));
  assert!(contains_task(&task.direct_dependencies(), &dep));
  task.remove_dependency(&dep);
  assert!(task.direct_dependencies().is_empty());
}

#[test]
fn removing_an_absent_dependency_is_a_noop() {
  let task = ContinuationTask::new("deps");
  let dep: Arc<dyn Task> = Arc::new(ContinuationTask::new("dep"));
  task.remove_dependency(&dep);
  assert!(task.direct_dependencies().is_empty());
}

#[test]
fn on_dependency_finish_registers_injector_on_the_dependency() {
  setup_tracing();
  let task = ContinuationTask::new("dependent");
  let dep: Arc<dyn Task> = Arc::new(ContinuationTask::new("dep"));
  task.add_dependency(Arc::clone(&dep));
  let fired = Arc::new(AtomicUsize::new(0));
  let f = Arc::clone(&fired);
  task.on_dependency_finish(
    &dep,
    Box::new(move |_: &TaskCore| {
      f.fetch_add(1, Ordering::SeqCst);
    }),
  );
  assert_eq!(fired.load(Ordering::SeqCst), 0);
  dep.finish(None);
  assert_eq!(fired.load(Ordering::SeqCst), 1, "injector runs on the finishing thread");
}

#[test]
fn cancellation_is_observable_before_execution() {
  let task = ContinuationTask::new("to-cancel");
  assert!(!task.is_cancelled());
  task.cancel();
  assert!(task.is_cancelled());
  assert!(!task.core().is_finished());
}
