//! Serialized execution primitives for async code.
//!
//! Two pieces, in dependency order:
//!
//! - [`TaskQueue`] runs submitted async tasks one at a time, strictly in
//!   submission order, delivering each task's outcome to its own
//!   submitter. An idle queue owns no background task; the driver is
//!   armed on demand and parks itself when the queue drains.
//! - [`AtomicRef`] wraps a single value and funnels every read and
//!   write through a private `TaskQueue`, giving read-modify-write
//!   atomicity without caller-side locking. With a [`Value`] payload it
//!   also offers the permissive increment/decrement family.

pub mod queue;
pub mod value;

mod atomic;
mod error;

pub use atomic::AtomicRef;
pub use error::TaskError;
pub use queue::TaskQueue;
pub use value::Value;
