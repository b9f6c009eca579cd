// condor/src/task/continuation.rs

//! `ContinuationTask`: a task whose body is a block receiving a continuation
//! callback. The building block other asynchronous steps compose from, and
//! the only component aware of the primary execution context.

use super::core::{Task, TaskCore};
use crate::error::CondorError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// The body of a [`ContinuationTask`]. Receives the continuation it must
/// invoke exactly once, synchronously or after arbitrary asynchronous work.
pub type ContinuationBlock = Box<dyn FnOnce(Continuation) + Send + 'static>;

/// A designated execution context (e.g. a UI/main thread) that can run a
/// unit of work and report when it is done.
pub trait PrimaryContext: Send + Sync {
  /// Schedules `work`; invokes `on_complete` once `work` has returned.
  fn perform(&self, work: Box<dyn FnOnce() + Send>, on_complete: Box<dyn FnOnce() + Send>);
}

/// Trivial [`PrimaryContext`] that runs the work synchronously on the
/// calling thread. Suitable for environments without a designated thread.
#[derive(Debug, Default)]
pub struct InlineContext;

impl PrimaryContext for InlineContext {
  fn perform(&self, work: Box<dyn FnOnce() + Send>, on_complete: Box<dyn FnOnce() + Send>) {
    work();
    on_complete();
  }
}

/// A task driven by a stored continuation block.
pub struct ContinuationTask {
  core: TaskCore,
  // Taken at most once; `execute` consumes it.
  block: Mutex<Option<ContinuationBlock>>,
}

impl ContinuationTask {
  /// Task with the default block: continues immediately with no error and
  /// touches no execution context.
  pub fn new(name: impl Into<String>) -> Self {
    Self::with_block(name, Box::new(|continuation| continuation.finish(None)))
  }

  pub fn with_block(name: impl Into<String>, block: ContinuationBlock) -> Self {
    ContinuationTask {
      core: TaskCore::new(name),
      block: Mutex::new(Some(block)),
    }
  }

  /// Convenience form: runs `action` on `context` and continues with no
  /// error once the context reports completion.
  pub fn on_context(
    name: impl Into<String>,
    context: Arc<dyn PrimaryContext>,
    action: impl FnOnce() + Send + 'static,
  ) -> Self {
    Self::with_block(
      name,
      Box::new(move |continuation| {
        context.perform(Box::new(action), Box::new(move || continuation.finish(None)));
      }),
    )
  }
}

#[async_trait]
impl Task for ContinuationTask {
  fn core(&self) -> &TaskCore {
    &self.core
  }

  #[instrument(name = "ContinuationTask::execute", skip(self), fields(task = %self.core.name()))]
  async fn execute(self: Arc<Self>) {
    if self.core.is_cancelled() {
      // The generic cancellation path owned by the task abstraction is
      // responsible for finishing a cancelled task; the block stays untouched.
      event!(Level::DEBUG, "cancelled before execution; block not invoked");
      return;
    }
    let block = self.block.lock().take();
    match block {
      Some(block) => block(Continuation {
        task: Arc::clone(&self),
      }),
      None => {
        event!(Level::ERROR, "execute called twice; block already consumed");
      }
    }
  }
}

/// Exactly-once completion callback handed to a [`ContinuationTask`] block.
///
/// Clonable and invokable from any thread; invoking it a second time is a
/// contract violation and is ignored (the first terminal state is kept).
#[derive(Clone)]
pub struct Continuation {
  task: Arc<ContinuationTask>,
}

impl Continuation {
  /// Finishes the owning task. `None` means success.
  pub fn finish(&self, error: Option<CondorError>) {
    if !self.task.core.finish(error) {
      event!(
        Level::WARN,
        task = %self.task.core.name(),
        "duplicate continuation invocation ignored"
      );
    }
  }

  /// Finishes the owning task with an arbitrary failure, wrapped as
  /// [`CondorError::Execution`].
  pub fn fail(&self, err: impl Into<anyhow::Error>) {
    self.finish(Some(CondorError::execution(err)));
  }
}
