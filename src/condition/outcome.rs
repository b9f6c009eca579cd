// condor/src/condition/outcome.rs

//! The outcome vocabulary conditions produce, and the write-once slot that
//! captures it.

use crate::error::CondorError;
use parking_lot::Mutex;

/// Outcome of evaluating a condition against its target task.
///
/// Immutable once produced; the single channel by which a condition
/// communicates its verdict to the owning task's generic finish mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionOutcome {
  /// The predicate held; the gated task may proceed as far as this condition
  /// is concerned.
  Satisfied,
  /// The predicate did not hold.
  Failed(CondorError),
}

impl ConditionOutcome {
  /// The error to feed into the owning task's finish path.
  /// `Satisfied` maps to `None`, `Failed(e)` to `Some(e)`.
  pub fn error(&self) -> Option<CondorError> {
    match self {
      ConditionOutcome::Satisfied => None,
      ConditionOutcome::Failed(err) => Some(err.clone()),
    }
  }
}

/// Write-once outcome slot with first-writer-wins semantics.
///
/// Completion may race across execution contexts, so the slot is guarded
/// rather than relying on single-threaded discipline. Backs both a
/// condition's `result` and a composed condition's injected `requirement`.
#[derive(Debug, Default)]
pub(crate) struct ResultSlot(Mutex<Option<ConditionOutcome>>);

impl ResultSlot {
  pub(crate) fn new() -> Self {
    ResultSlot(Mutex::new(None))
  }

  /// Stores `outcome` if the slot is still empty.
  /// Returns whether this call won the write.
  pub(crate) fn set(&self, outcome: ConditionOutcome) -> bool {
    let mut guard = self.0.lock();
    if guard.is_some() {
      return false;
    }
    *guard = Some(outcome);
    true
  }

  pub(crate) fn get(&self) -> Option<ConditionOutcome> {
    self.0.lock().clone()
  }
}
