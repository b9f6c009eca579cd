// tests/continuation_task_tests.rs
mod common;
use common::*;
use condor::{CondorError, ContinuationTask, InlineContext, Task};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
#[serial]
async fn default_block_finishes_clean_without_context() {
  setup_tracing();
  reset_counters();
  let task = Arc::new(ContinuationTask::new("noop"));
  task.clone().execute().await;
  assert!(task.core().is_finished());
  assert_eq!(task.core().finish_error(), None);
  assert_eq!(CONTEXT_PERFORM_COUNTER.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancelled_task_never_invokes_block() {
  setup_tracing();
  let hits = Arc::new(AtomicUsize::new(0));
  let h = Arc::clone(&hits);
  let task = Arc::new(ContinuationTask::with_block(
    "cancelled",
    Box::new(move |continuation| {
      h.fetch_add(1, Ordering::SeqCst);
      continuation.finish(None);
    }),
  ));
  task.cancel();
  task.clone().execute().await;
  assert_eq!(hits.load(Ordering::SeqCst), 0);
  // Finishing a cancelled task is owned by the external cancellation path.
  assert!(!task.core().is_finished());
}

#[tokio::test(flavor = "multi_thread")]
async fn asynchronous_continuation_finishes_later() {
  setup_tracing();
  let task = Arc::new(ContinuationTask::with_block(
    "later",
    Box::new(|continuation| {
      tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        continuation.finish(None);
      });
    }),
  ));
  task.clone().execute().await;
  for _ in 0..50 {
    if task.core().is_finished() {
      break;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  assert!(task.core().is_finished());
  assert_eq!(task.core().finish_error(), None);
}

#[tokio::test]
async fn continuation_fail_wraps_arbitrary_errors() {
  setup_tracing();
  let task = Arc::new(ContinuationTask::with_block(
    "failing",
    Box::new(|continuation| {
      continuation.fail(anyhow::anyhow!("disk offline"));
    }),
  ));
  task.clone().execute().await;
  let err = task.core().finish_error().expect("task should finish with an error");
  assert!(matches!(err, CondorError::Execution(_)));
}

#[tokio::test]
async fn duplicate_continuation_is_ignored() {
  setup_tracing();
  let task = Arc::new(ContinuationTask::with_block(
    "twice",
    Box::new(|continuation| {
      continuation.finish(None);
      continuation.finish(Some(CondorError::FalseCondition));
    }),
  ));
  task.clone().execute().await;
  assert!(task.core().is_finished());
  assert_eq!(task.core().finish_error(), None, "first invocation wins");
}

#[tokio::test]
#[serial]
async fn on_context_runs_action_then_continues() {
  setup_tracing();
  reset_counters();
  let ran = Arc::new(AtomicUsize::new(0));
  let r = Arc::clone(&ran);
  let task = Arc::new(ContinuationTask::on_context(
    "main-thread-work",
    Arc::new(CountingContext),
    move || {
      r.fetch_add(1, Ordering::SeqCst);
    },
  ));
  task.clone().execute().await;
  assert_eq!(ran.load(Ordering::SeqCst), 1);
  assert_eq!(CONTEXT_PERFORM_COUNTER.load(Ordering::SeqCst), 1);
  assert!(task.core().is_finished());
  assert_eq!(task.core().finish_error(), None);
}

#[tokio::test]
async fn inline_context_runs_synchronously() {
  setup_tracing();
  let ran = Arc::new(AtomicUsize::new(0));
  let r = Arc::clone(&ran);
  let task = Arc::new(ContinuationTask::on_context(
    "inline-work",
    Arc::new(InlineContext),
    move || {
      r.fetch_add(1, Ordering::SeqCst);
    },
  ));
  task.clone().execute().await;
  assert_eq!(ran.load(Ordering::SeqCst), 1);
  assert!(task.core().is_finished());
}
