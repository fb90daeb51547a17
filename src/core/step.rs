//! Step domain model

use crate::core::error::ChainError;
use std::any::Any;
use std::fmt;

/// Type-erased value carried between queued steps
pub(crate) type Payload = Box<dyn Any + Send>;

/// A queued step once its input and output types have been erased
pub(crate) type ErasedStep = Box<dyn FnOnce(Payload, Next<Payload>) + Send>;

/// A task handed to [`Chain::parallel`](crate::Chain::parallel)
///
/// Every task receives a clone of the forwarded value and its own completion
/// handle.
pub type Task<T, R> = Box<dyn FnOnce(T, Next<R>) + Send>;

/// Box a closure as a parallel [`Task`]
pub fn task<T, R, F>(f: F) -> Task<T, R>
where
    F: FnOnce(T, Next<R>) + Send + 'static,
{
    Box::new(f)
}

/// Completion handle given to every step, task and worker
///
/// Reporting consumes the handle, so a step completes at most once. A handle
/// that is dropped without reporting is treated as abandoned by the runner
/// that issued it.
pub struct Next<T> {
    report: Box<dyn FnOnce(Result<T, ChainError>) + Send>,
}

impl<T: 'static> Next<T> {
    /// Create a handle that forwards the outcome to `report`
    pub fn new<F>(report: F) -> Self
    where
        F: FnOnce(Result<T, ChainError>) + Send + 'static,
    {
        Self {
            report: Box::new(report),
        }
    }

    /// Report success, forwarding `value` to whatever runs next
    pub fn done(self, value: T) {
        (self.report)(Ok(value))
    }

    /// Report failure; the owning chain skips everything after this step
    pub fn fail(self, error: impl Into<ChainError>) {
        (self.report)(Err(error.into()))
    }

    /// Report an already computed outcome
    pub fn complete(self, result: Result<T, ChainError>) {
        (self.report)(result)
    }

    /// Derive a handle for a different success type
    pub(crate) fn adapt<U, F>(self, f: F) -> Next<U>
    where
        U: 'static,
        F: FnOnce(U) -> T + Send + 'static,
    {
        Next::new(move |result: Result<U, ChainError>| self.complete(result.map(f)))
    }
}

impl<T> fmt::Debug for Next<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}
