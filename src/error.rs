// condor/src/error.rs
use anyhow::Error as AnyhowError;
use std::sync::Arc;
use thiserror::Error;

/// Closed failure taxonomy for conditions and the tasks they gate.
///
/// Equality is structural and variant-only: two `Execution` errors compare
/// equal regardless of their wrapped sources, which keeps stored outcomes
/// comparable across threads without requiring the sources to be `PartialEq`.
#[derive(Debug, Clone, Error)]
pub enum CondorError {
  #[error("Condition was explicitly false")]
  FalseCondition,

  #[error("Block condition predicate returned false")]
  BlockConditionFailed,

  #[error("Composed condition requirement was never injected")]
  RequirementNotSatisfied,

  #[error("Condition invoked in violation of its contract")]
  ConditionFailed,

  #[error("Negated condition: inner condition was satisfied")]
  NegationFailed,

  #[error("Task execution failed. Source: {0}")]
  Execution(Arc<AnyhowError>),
}

impl CondorError {
  /// Wraps an arbitrary failure from user-supplied work (e.g. a
  /// `ContinuationTask` block) into the taxonomy.
  pub fn execution(err: impl Into<AnyhowError>) -> Self {
    CondorError::Execution(Arc::new(err.into()))
  }
}

impl PartialEq for CondorError {
  fn eq(&self, other: &Self) -> bool {
    std::mem::discriminant(self) == std::mem::discriminant(other)
  }
}

impl Eq for CondorError {}

// This is the key conversion condor provides for external errors.
impl From<AnyhowError> for CondorError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap an anyhow::Error that is already carrying a CondorError, to
    // avoid Execution(Execution(...)) nesting.
    match err.downcast::<CondorError>() {
      Ok(condor_err) => condor_err,
      Err(err) => CondorError::Execution(Arc::new(err)),
    }
  }
}

pub type CondorResult<T, E = CondorError> = std::result::Result<T, E>;
