// condor/src/lib.rs

//! Condor: a condition-gated task composition layer for cooperative task
//! scheduling.
//!
//! Tasks may be gated by one or more conditions: asynchronous predicates
//! that must resolve before the task is allowed to run. Conditions are
//! themselves tasks, so they participate in the same dependency graph, and
//! they compose:
//!  - `TrueCondition` / `FalseCondition` as deterministic primitives.
//!  - `BlockCondition` for arbitrary predicate closures.
//!  - `ComposedCondition` wraps an inner condition, depends on it, and has
//!    its result injected before evaluating.
//!  - `NegatedCondition` inverts an inner condition's outcome.
//!  - `WrappedCondition` adapts legacy condition-shaped values.
//!  - `ContinuationTask` is the continuation-driven task other asynchronous
//!    steps are built from.
//!
//! Scheduling, exclusivity enforcement, and the decision of whether a gated
//! task proceeds all stay external: the scheduler runs a condition after its
//! dependencies finish and inspects the stored [`ConditionOutcome`].

pub mod condition;
pub mod error;
pub mod task;

// --- Re-exports for the Public API ---

pub use crate::condition::base::{attach, run_condition, Completion, Condition, ConditionState};
pub use crate::condition::block::{BlockCondition, ConditionPredicate};
pub use crate::condition::composed::{ComposedCondition, NegatedCondition};
pub use crate::condition::constant::{FalseCondition, TrueCondition};
pub use crate::condition::outcome::ConditionOutcome;
pub use crate::condition::wrapped::{LegacyCondition, WrappedCondition};

pub use crate::error::{CondorError, CondorResult};

pub use crate::task::continuation::{
  Continuation, ContinuationBlock, ContinuationTask, InlineContext, PrimaryContext,
};
pub use crate::task::core::{FinishObserver, Task, TaskCore};
