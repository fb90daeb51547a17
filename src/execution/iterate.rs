//! Collection iteration on top of the sequential and parallel runners

use crate::core::{collection::Collection, pipeline::Chain, step::Next};
use crate::execution::join::{self, Job};
use std::sync::Arc;
use tracing::trace;

/// Run `worker` over every entry, one at a time, through a fresh nested chain
pub(crate) fn each_sequential<C, R, W>(collection: C, worker: Arc<W>, next: Next<C::Mapped<R>>)
where
    C: Collection,
    R: Send + 'static,
    W: Fn(C::Key, C::Item, Next<R>) + Send + Sync + 'static,
{
    let entries = collection.into_entries();
    if entries.is_empty() {
        next.done(C::from_entries::<R>(Vec::new()));
        return;
    }
    trace!("Iterating {} item(s) sequentially", entries.len());

    let mut nested = Chain::seeded(Vec::with_capacity(entries.len()));
    for (key, item) in entries {
        let worker = Arc::clone(&worker);
        nested = nested.chain(move |mut collected: Vec<(C::Key, R)>, step: Next<Vec<(C::Key, R)>>| {
            let slot = key.clone();
            worker(
                key,
                item,
                Next::new(move |result: Result<R, _>| match result {
                    Ok(value) => {
                        collected.push((slot, value));
                        step.done(collected);
                    }
                    Err(error) => step.fail(error),
                }),
            );
        });
    }

    nested.end(move |result| next.complete(result.map(C::from_entries::<R>)));
}

/// Run `worker` over every entry with all items handed to the parallel runner
pub(crate) fn each_parallel<C, R, W>(collection: C, worker: Arc<W>, next: Next<C::Mapped<R>>)
where
    C: Collection,
    R: Send + 'static,
    W: Fn(C::Key, C::Item, Next<R>) + Send + Sync + 'static,
{
    let jobs: Vec<(C::Key, Job<R>)> = collection
        .into_entries()
        .into_iter()
        .map(|(key, item)| {
            let worker = Arc::clone(&worker);
            let slot = key.clone();
            let job: Job<R> = Box::new(move |done: Next<R>| worker(slot, item, done));
            (key, job)
        })
        .collect();
    trace!("Iterating {} item(s) in parallel", jobs.len());

    join::join(jobs, next.adapt(C::from_entries::<R>));
}
