// condor/src/condition/mod.rs

//! The condition protocol: conditions are tasks that assert an asynchronous
//! predicate about whether a gated target task should run. Outcomes are
//! captured exactly once and propagated through the owning task's generic
//! finish path; conditions compose by wrapping.

pub mod base;
pub mod block;
pub mod composed;
pub mod constant;
pub mod outcome;
pub mod wrapped;

pub use base::{attach, run_condition, Completion, Condition, ConditionState};
pub use block::{BlockCondition, ConditionPredicate};
pub use composed::{ComposedCondition, NegatedCondition};
pub use constant::{FalseCondition, TrueCondition};
pub use outcome::ConditionOutcome;
pub use wrapped::{LegacyCondition, WrappedCondition};
