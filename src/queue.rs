//! Serialized task queue — at most one task in flight, strict FIFO.
//!
//! [`TaskQueue`] accepts asynchronous tasks and runs them one at a time
//! in submission order. Each submitter gets its own result future; a
//! failing task rejects only that future and the queue moves on.
//!
//! The driver is spawned on demand: an idle queue owns no background
//! task at all. The first submission arms a driver, the driver drains
//! the queue, and when it observes the queue empty it parks itself. A
//! later submission arms a fresh driver.

use std::any::Any;
use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::oneshot;

use crate::error::TaskError;

/// Type-erased unit of work. Runs the submitted future and delivers the
/// outcome to the submitter's result slot itself, so the driver never
/// sees task-specific types.
type Task = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct QueueState {
    pending: VecDeque<Task>,
    /// True while a driver task is alive for this queue.
    driver_armed: bool,
    /// True exactly while a task is executing.
    busy: bool,
}

struct Inner {
    label: String,
    state: Mutex<QueueState>,
}

/// A queue that executes submitted async tasks one at a time, in
/// submission order.
///
/// Cloning is cheap and clones share the queue.
#[derive(Clone)]
pub struct TaskQueue {
    inner: Arc<Inner>,
}

impl TaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::named("queue")
    }

    /// Create a queue whose label appears in trace output.
    #[must_use]
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                label: label.into(),
                state: Mutex::new(QueueState {
                    pending: VecDeque::new(),
                    driver_armed: false,
                    busy: false,
                }),
            }),
        }
    }

    /// Submit a task for serialized execution.
    ///
    /// The task is enqueued before this function returns, so
    /// caller-observable call order is execution order. The returned
    /// future only waits for the outcome; dropping it does not cancel
    /// the task — once submitted, a task runs to completion.
    ///
    /// Tasks run strictly one at a time. A task that suspends keeps its
    /// turn: nothing behind it starts until it finishes. A task that
    /// fails or panics rejects only its own result future.
    ///
    /// A task must not submit to its own queue and await the result
    /// from inside itself — the inner task cannot start until the outer
    /// one finishes, so that await never completes. Enqueueing without
    /// awaiting is fine.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit<T, F, Fut>(
        &self,
        task: F,
    ) -> impl Future<Output = Result<T, TaskError>> + use<T, F, Fut>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let label = self.inner.label.clone();
        let erased: Task = Box::new(move || {
            Box::pin(async move {
                let caught = AssertUnwindSafe(async move { task().await })
                    .catch_unwind()
                    .await;
                let outcome = match caught {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(error)) => {
                        tracing::debug!(queue = %label, error = %error, "task failed");
                        Err(TaskError::Failed(error))
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        tracing::debug!(queue = %label, panic = %message, "task panicked");
                        Err(TaskError::Panicked(message))
                    }
                };
                // The submitter may have dropped its result future; the
                // task still ran, so a dead slot is not an error.
                let _ = tx.send(outcome);
            })
        });
        self.enqueue(erased);
        async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(TaskError::Shutdown),
            }
        }
    }

    /// Number of tasks waiting to run, not counting one in flight.
    #[must_use]
    pub fn backlog(&self) -> usize {
        self.inner.state.lock().expect("queue state poisoned").pending.len()
    }

    /// True when nothing is queued, nothing is running, and no driver
    /// task is alive.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.inner.state.lock().expect("queue state poisoned");
        state.pending.is_empty() && !state.busy && !state.driver_armed
    }

    fn enqueue(&self, task: Task) {
        let arm = {
            let mut state = self.inner.state.lock().expect("queue state poisoned");
            state.pending.push_back(task);
            if state.driver_armed {
                false
            } else {
                state.driver_armed = true;
                true
            }
        };
        if arm {
            tracing::trace!(queue = %self.inner.label, "arming driver");
            tokio::spawn(drive(Arc::clone(&self.inner)));
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain the queue one task at a time, then park.
///
/// Disarming happens under the same lock in which emptiness is
/// observed, so a concurrent submit either sees an armed driver or arms
/// a new one — never neither.
async fn drive(inner: Arc<Inner>) {
    loop {
        let task = {
            let mut state = inner.state.lock().expect("queue state poisoned");
            match state.pending.pop_front() {
                Some(task) => {
                    state.busy = true;
                    task
                }
                None => {
                    state.driver_armed = false;
                    tracing::trace!(queue = %inner.label, "driver parked");
                    return;
                }
            }
        };
        task().await;
        inner.state.lock().expect("queue state poisoned").busy = false;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
