// condor/src/task/core.rs

//! The task-facing contract the condition layer consumes: cancellation,
//! naming, direct dependencies, a single finish transition, and the
//! finish-observer list used for dependency-injection.

use crate::error::CondorError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{event, Level};

/// Callback registered on a task and run exactly once when that task
/// finishes, synchronously on the finishing thread. Receives the finished
/// task's core so injectors can read its terminal state.
pub type FinishObserver = Box<dyn FnOnce(&TaskCore) + Send>;

/// A schedulable, cancellable unit of asynchronous work with dependencies
/// and a single finish transition.
///
/// The scheduler invokes `execute` at most once per instance, and only after
/// every direct dependency has finished. The provided methods all delegate to
/// the task's [`TaskCore`]; implementors only supply `core` and `execute`.
#[async_trait]
pub trait Task: Send + Sync {
  /// Shared lifecycle state backing this task.
  fn core(&self) -> &TaskCore;

  /// Runs the task's body. The receiver is `Arc<Self>` because completion
  /// callbacks handed out during execution may outlive the call and must
  /// keep the task alive from any thread.
  async fn execute(self: Arc<Self>);

  fn name(&self) -> &str {
    self.core().name()
  }

  fn is_cancelled(&self) -> bool {
    self.core().is_cancelled()
  }

  fn cancel(&self) {
    self.core().cancel()
  }

  /// Finishes the task. `None` means success. Returns whether this call
  /// performed the (single) finish transition.
  fn finish(&self, error: Option<CondorError>) -> bool {
    self.core().finish(error)
  }

  fn direct_dependencies(&self) -> Vec<Arc<dyn Task>> {
    self.core().direct_dependencies()
  }

  fn add_dependency(&self, dep: Arc<dyn Task>) {
    self.core().add_dependency(dep)
  }

  fn remove_dependency(&self, dep: &Arc<dyn Task>) {
    self.core().remove_dependency(dep)
  }

  /// Registers `injector` to run when `dep` finishes. This is the generic
  /// dependency-injection mechanism: "when dependency D finishes, run
  /// injector(D)".
  fn on_dependency_finish(&self, dep: &Arc<dyn Task>, injector: FinishObserver) {
    dep.core().on_finish(injector)
  }
}

#[derive(Default)]
struct FinishState {
  finished: bool,
  error: Option<CondorError>,
}

/// Reusable lifecycle state implementing the consumed task contract.
///
/// All state is interior-mutable so tasks can be shared as `Arc<dyn Task>`
/// across the scheduler, attaching code, and completion callbacks.
pub struct TaskCore {
  name: String,
  cancelled: AtomicBool,
  finish: Mutex<FinishState>,
  dependencies: Mutex<Vec<Arc<dyn Task>>>,
  observers: Mutex<Vec<FinishObserver>>,
}

impl TaskCore {
  pub fn new(name: impl Into<String>) -> Self {
    TaskCore {
      name: name.into(),
      cancelled: AtomicBool::new(false),
      finish: Mutex::new(FinishState::default()),
      dependencies: Mutex::new(Vec::new()),
      observers: Mutex::new(Vec::new()),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::SeqCst);
    event!(Level::DEBUG, task = %self.name, "task cancelled");
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }

  pub fn is_finished(&self) -> bool {
    self.finish.lock().finished
  }

  /// The error the task finished with, if it has finished with one.
  pub fn finish_error(&self) -> Option<CondorError> {
    self.finish.lock().error.clone()
  }

  /// Performs the finish transition exactly once, then drains the observer
  /// list synchronously on this thread. A second call is rejected and the
  /// first terminal state is kept.
  pub fn finish(&self, error: Option<CondorError>) -> bool {
    {
      let mut guard = self.finish.lock();
      if guard.finished {
        event!(
          Level::WARN,
          task = %self.name,
          "finish called on an already-finished task; ignoring"
        );
        return false;
      }
      guard.finished = true;
      guard.error = error;
    }
    event!(Level::DEBUG, task = %self.name, "task finished");
    let observers: Vec<FinishObserver> = std::mem::take(&mut *self.observers.lock());
    for observer in observers {
      observer(self);
    }
    true
  }

  /// Registers a finish observer. If the task has already finished, the
  /// observer runs immediately on the registering thread, so late
  /// registration cannot stall a dependent.
  pub fn on_finish(&self, observer: FinishObserver) {
    let mut observers = self.observers.lock();
    if self.finish.lock().finished {
      drop(observers);
      observer(self);
      return;
    }
    observers.push(observer);
  }

  pub fn add_dependency(&self, dep: Arc<dyn Task>) {
    self.dependencies.lock().push(dep);
  }

  /// Removes `dep` from the direct dependency set, matching by task
  /// identity. Removing an absent dependency is a no-op.
  pub fn remove_dependency(&self, dep: &Arc<dyn Task>) {
    self.dependencies.lock().retain(|d| !same_task(d, dep));
  }

  pub fn direct_dependencies(&self) -> Vec<Arc<dyn Task>> {
    self.dependencies.lock().clone()
  }
}

impl fmt::Debug for TaskCore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TaskCore")
      .field("name", &self.name)
      .field("cancelled", &self.is_cancelled())
      .field("finished", &self.is_finished())
      .finish()
  }
}

// Identity comparison over the data pointer only; the vtable half of the fat
// pointer may differ for the same allocation.
pub(crate) fn same_task(a: &Arc<dyn Task>, b: &Arc<dyn Task>) -> bool {
  Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
