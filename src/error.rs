//! Error type delivered through a task's result future.

use thiserror::Error;

/// Why a submitted task did not produce a value.
///
/// Failures are strictly per-task: a task that fails (or panics) rejects
/// only its own result future. Tasks queued behind it are unaffected and
/// the queue keeps running.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task itself returned an error.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),

    /// The task panicked while running. The payload is the panic message
    /// when one was available.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The queue was torn down before the task ran to completion, so its
    /// result slot was dropped without an outcome.
    #[error("task queue shut down before the task completed")]
    Shutdown,
}
