// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use condor::{Completion, ConditionOutcome, ContinuationTask, LegacyCondition, PrimaryContext, Task};
use once_cell::sync::Lazy;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static CONTEXT_PERFORM_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  CONTEXT_PERFORM_COUNTER.store(0, Ordering::SeqCst);
}

/// `PrimaryContext` that runs work inline, counting every `perform` call.
pub struct CountingContext;

impl PrimaryContext for CountingContext {
  fn perform(&self, work: Box<dyn FnOnce() + Send>, on_complete: Box<dyn FnOnce() + Send>) {
    CONTEXT_PERFORM_COUNTER.fetch_add(1, Ordering::SeqCst);
    work();
    on_complete();
  }
}

/// Legacy-shaped condition that always reports satisfied.
pub struct AlwaysSatisfiedLegacy {
  pub name: String,
  pub exclusive: bool,
}

#[async_trait]
impl LegacyCondition for AlwaysSatisfiedLegacy {
  fn is_mutually_exclusive(&self) -> bool {
    self.exclusive
  }

  fn name(&self) -> &str {
    &self.name
  }

  async fn evaluate(&self, _target: Arc<dyn Task>, completion: Completion) {
    completion.complete(ConditionOutcome::Satisfied);
  }
}

/// A plain gated task to attach conditions to.
pub fn make_target(name: &str) -> Arc<dyn Task> {
  Arc::new(ContinuationTask::new(name))
}

/// Pointer-identity membership check over a dependency list.
pub fn contains_task(deps: &[Arc<dyn Task>], task: &Arc<dyn Task>) -> bool {
  deps
    .iter()
    .any(|d| Arc::as_ptr(d) as *const () == Arc::as_ptr(task) as *const ())
}
