//! Atomic value container — read-modify-write without caller-side locking.
//!
//! Every operation on an [`AtomicRef`] is a task submitted to a private
//! [`TaskQueue`], so operations on one reference never interleave: a
//! read-modify-write runs to completion before the next operation
//! starts. The slot itself sits behind a mutex only to satisfy shared
//! ownership across the spawn boundary; the queue is the serialization
//! mechanism, and nothing outside a queued task touches the slot.

use std::sync::{Arc, Mutex};

use crate::error::TaskError;
use crate::queue::TaskQueue;
use crate::value::Value;

/// A single mutable value whose operations are serialized through a
/// private queue.
///
/// Callers need no external synchronization: concurrent `get`/`set`/
/// `update` calls from any number of tasks are executed one at a time,
/// in submission order. Clones share the same value and queue.
pub struct AtomicRef<T> {
    slot: Arc<Mutex<T>>,
    queue: TaskQueue,
}

impl<T> Clone for AtomicRef<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            queue: self.queue.clone(),
        }
    }
}

impl<T: Default + Send + 'static> Default for AtomicRef<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Send + 'static> AtomicRef<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(initial)),
            queue: TaskQueue::named("atomic-ref"),
        }
    }

    /// Read the current value.
    pub async fn get(&self) -> Result<T, TaskError>
    where
        T: Clone,
    {
        let slot = Arc::clone(&self.slot);
        self.queue
            .submit(move || async move { Ok(slot.lock().expect("slot poisoned").clone()) })
            .await
    }

    /// Replace the value. Completes once the replacement is committed.
    pub async fn set(&self, value: T) -> Result<(), TaskError> {
        let slot = Arc::clone(&self.slot);
        self.queue
            .submit(move || async move {
                *slot.lock().expect("slot poisoned") = value;
                Ok(())
            })
            .await
    }

    /// Apply `f` to the value with exclusive access and return its
    /// result. No other operation on this reference runs while `f`
    /// does.
    pub async fn update<R, F>(&self, f: F) -> Result<R, TaskError>
    where
        F: FnOnce(&mut T) -> R + Send + 'static,
        R: Send + 'static,
    {
        let slot = Arc::clone(&self.slot);
        self.queue
            .submit(move || async move { Ok(f(&mut slot.lock().expect("slot poisoned"))) })
            .await
    }
}

/// Which side of a read-modify-write to report.
#[derive(Clone, Copy)]
enum Keep {
    Old,
    New,
}

impl AtomicRef<Value> {
    /// Add one and return the sum.
    ///
    /// Non-numeric values coerce the way a dynamically typed host would
    /// (see [`Value::as_number`]): incrementing text that is not a
    /// number yields NaN rather than an error.
    pub async fn increment_and_get(&self) -> Result<f64, TaskError> {
        self.shift(1.0, Keep::New).await
    }

    /// Return the current numeric value, then add one.
    pub async fn get_and_increment(&self) -> Result<f64, TaskError> {
        self.shift(1.0, Keep::Old).await
    }

    /// Subtract one and return the difference.
    pub async fn decrement_and_get(&self) -> Result<f64, TaskError> {
        self.shift(-1.0, Keep::New).await
    }

    /// Return the current numeric value, then subtract one.
    pub async fn get_and_decrement(&self) -> Result<f64, TaskError> {
        self.shift(-1.0, Keep::Old).await
    }

    async fn shift(&self, delta: f64, keep: Keep) -> Result<f64, TaskError> {
        self.update(move |value| {
            let old = value.as_number();
            let new = old + delta;
            *value = Value::Number(new);
            match keep {
                Keep::Old => old,
                Keep::New => new,
            }
        })
        .await
    }
}
