use thiserror::Error;

/// Errors returned by the fallible operations of a [`Queue`](crate::Queue).
///
/// Empty-queue conditions are not errors; they are reported with `None` or
/// `false` by the operations that can meet them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The global allocator could not provide storage. Nothing was linked
    /// into the queue and any partial allocation was released.
    #[error("out of memory while allocating {what}")]
    OutOfMemory { what: &'static str },
}
