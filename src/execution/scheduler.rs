//! Deferred scheduling and timer primitives
//!
//! Both are thin wrappers over the Tokio runtime. Steps are always invoked from
//! the task driving their chain, so a runtime is current wherever these are
//! called.

use std::time::Duration;

/// Run `f` on a later scheduling turn, never inline
///
/// Actions deferred from the same context are spawned in call order.
pub(crate) fn defer<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move { f() });
}

/// Run `f` once `delay` has elapsed
pub(crate) fn after<F>(delay: Duration, f: F)
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        f()
    });
}
