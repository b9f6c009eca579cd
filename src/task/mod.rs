// condor/src/task/mod.rs

//! The task contract consumed by the condition layer, plus the
//! continuation-driven task type.

pub mod continuation;
pub mod core;

pub use continuation::{Continuation, ContinuationBlock, ContinuationTask, InlineContext, PrimaryContext};
pub use core::{FinishObserver, Task, TaskCore};
