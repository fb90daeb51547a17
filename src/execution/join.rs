//! Parallel runner - fans jobs out and joins their results by position

use crate::core::{error::ChainError, step::Next};
use crate::execution::scheduler;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A unit of parallel work, already bound to its input
pub(crate) type Job<R> = Box<dyn FnOnce(Next<R>) + Send>;

/// Launch every job on its own scheduling turn and join the results
///
/// `next` receives the results paired with their keys in input order, or the
/// first error reported. Completions that arrive after a failure are dropped
/// and never reach the joined results. An empty job list completes at once.
pub(crate) fn join<K, R>(jobs: Vec<(K, Job<R>)>, next: Next<Vec<(K, R)>>)
where
    K: Send + 'static,
    R: Send + 'static,
{
    let total = jobs.len();
    if total == 0 {
        next.done(Vec::new());
        return;
    }
    debug!("Joining {} parallel job(s)", total);

    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Result<R, ChainError>)>();
    let mut keys = Vec::with_capacity(total);

    for (slot, (key, job)) in jobs.into_iter().enumerate() {
        keys.push(key);
        let tx = tx.clone();
        scheduler::defer(move || {
            job(Next::new(move |result| {
                // The collector is gone once the join has failed
                let _ = tx.send((slot, result));
            }))
        });
    }
    drop(tx);

    tokio::spawn(async move {
        let mut results: Vec<Option<R>> = (0..total).map(|_| None).collect();
        let mut completed = 0;

        while let Some((slot, result)) = rx.recv().await {
            match result {
                Ok(value) => {
                    results[slot] = Some(value);
                    completed += 1;
                    if completed == total {
                        break;
                    }
                }
                Err(error) => {
                    debug!(
                        "Parallel job {} failed, ignoring {} outstanding job(s)",
                        slot,
                        total - completed - 1
                    );
                    next.fail(error);
                    return;
                }
            }
        }

        if completed < total {
            warn!("{} parallel job(s) dropped their completion handle", total - completed);
            next.fail(ChainError::TaskAbandoned {
                pending: total - completed,
            });
            return;
        }

        next.done(keys.into_iter().zip(results.into_iter().flatten()).collect());
    });
}
