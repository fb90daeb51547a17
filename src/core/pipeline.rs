//! Chain domain model
//!
//! A [`Chain`] is an ordered queue of steps. Each combinator appends exactly one
//! step; nothing runs until [`Chain::end`] or [`Chain::launch`] is called.

use crate::core::{
    collection::Collection,
    error::ChainError,
    step::{ErasedStep, Next, Payload, Task},
};
use crate::execution::{engine, iterate, join, scheduler};
use std::any::type_name;
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// An ordered queue of steps whose last step forwards a `T`
pub struct Chain<T> {
    /// Pending steps, in append order
    queue: VecDeque<ErasedStep>,

    _forwards: PhantomData<fn() -> T>,
}

impl Chain<()> {
    /// Create an empty chain; ending it right away delivers `Ok(())`
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            _forwards: PhantomData,
        }
    }

    /// Create a chain whose first step produces a value from nothing
    pub fn start<U, F>(f: F) -> Chain<U>
    where
        U: Send + 'static,
        F: FnOnce(Next<U>) + Send + 'static,
    {
        Chain::new().chain(move |(), next: Next<U>| f(next))
    }

    /// Iterate `collection` one item at a time (see [`Chain::each`])
    pub fn each_of<C, R, W>(collection: C, worker: W) -> Chain<C::Mapped<R>>
    where
        C: Collection,
        R: Send + 'static,
        W: Fn(C::Key, C::Item, Next<R>) + Send + Sync + 'static,
    {
        Chain::seeded(collection).each(worker)
    }

    /// Iterate `collection` with every item in flight at once (see [`Chain::each_parallel`])
    pub fn each_parallel_of<C, R, W>(collection: C, worker: W) -> Chain<C::Mapped<R>>
    where
        C: Collection,
        R: Send + 'static,
        W: Fn(C::Key, C::Item, Next<R>) + Send + Sync + 'static,
    {
        Chain::seeded(collection).each_parallel(worker)
    }

    /// Iterate a sequence one item at a time, passing `(index, value)`
    pub fn for_each_of<V, R, W>(items: Vec<V>, worker: W) -> Chain<Vec<R>>
    where
        V: Send + 'static,
        R: Send + 'static,
        W: Fn(usize, V, Next<R>) + Send + Sync + 'static,
    {
        Chain::seeded(items).for_each(worker)
    }

    /// Iterate a sequence with every item in flight at once
    pub fn for_each_parallel_of<V, R, W>(items: Vec<V>, worker: W) -> Chain<Vec<R>>
    where
        V: Send + 'static,
        R: Send + 'static,
        W: Fn(usize, V, Next<R>) + Send + Sync + 'static,
    {
        Chain::seeded(items).for_each_parallel(worker)
    }

    /// Run `tasks` concurrently as the first step of a new chain
    pub fn parallel_of<C, R>(tasks: C) -> Chain<C::Mapped<R>>
    where
        C: Collection<Item = Task<(), R>>,
        R: Send + 'static,
    {
        Chain::new().parallel(tasks)
    }

    /// A chain that does nothing but wait for `duration`
    pub fn delay(duration: Duration) -> Chain<()> {
        Chain::new().wait(duration)
    }
}

impl Default for Chain<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Chain<T> {
    /// Create a chain whose first step forwards `value`
    pub fn seeded(value: T) -> Self {
        Chain::start(move |next: Next<T>| next.done(value))
    }

    /// Number of steps still queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no steps are queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Append a step that receives the forwarded value and reports through `next`
    pub fn chain<U, F>(mut self, f: F) -> Chain<U>
    where
        U: Send + 'static,
        F: FnOnce(T, Next<U>) + Send + 'static,
    {
        let step: ErasedStep = Box::new(move |input: Payload, next: Next<Payload>| {
            match input.downcast::<T>() {
                Ok(value) => f(*value, next.adapt(|output: U| Box::new(output) as Payload)),
                Err(_) => next.fail(ChainError::TypeMismatch {
                    expected: type_name::<T>(),
                }),
            }
        });
        self.queue.push_back(step);

        Chain {
            queue: self.queue,
            _forwards: PhantomData,
        }
    }

    /// Append a step that pauses for `duration` and forwards its input unchanged
    pub fn wait(self, duration: Duration) -> Chain<T> {
        self.chain(move |value: T, next: Next<T>| {
            scheduler::after(duration, move || next.done(value));
        })
    }

    /// Append a step that runs every task concurrently
    ///
    /// Each task gets a clone of the forwarded value. The step completes with
    /// results in the shape of `tasks`, or with the first error reported.
    pub fn parallel<C, R>(self, tasks: C) -> Chain<C::Mapped<R>>
    where
        T: Clone,
        C: Collection<Item = Task<T, R>>,
        R: Send + 'static,
    {
        self.chain(move |value: T, next: Next<C::Mapped<R>>| {
            let jobs = tasks
                .into_entries()
                .into_iter()
                .map(|(key, task)| {
                    let input = value.clone();
                    let job: join::Job<R> = Box::new(move |done: Next<R>| task(input, done));
                    (key, job)
                })
                .collect();
            join::join(jobs, next.adapt(C::from_entries::<R>));
        })
    }

    /// Append a step that iterates the forwarded collection one item at a time
    ///
    /// `worker` is called as `worker(key, value, next)`. The first failure stops
    /// the iteration; later items never run.
    pub fn each<R, W>(self, worker: W) -> Chain<T::Mapped<R>>
    where
        T: Collection,
        R: Send + 'static,
        W: Fn(T::Key, T::Item, Next<R>) + Send + Sync + 'static,
    {
        let worker = Arc::new(worker);
        self.chain(move |collection: T, next: Next<T::Mapped<R>>| {
            iterate::each_sequential::<T, R, W>(collection, worker, next)
        })
    }

    /// Append a step that iterates `collection`, ignoring the forwarded value
    pub fn each_in<C, R, W>(self, collection: C, worker: W) -> Chain<C::Mapped<R>>
    where
        C: Collection,
        R: Send + 'static,
        W: Fn(C::Key, C::Item, Next<R>) + Send + Sync + 'static,
    {
        let worker = Arc::new(worker);
        self.chain(move |_: T, next: Next<C::Mapped<R>>| {
            iterate::each_sequential::<C, R, W>(collection, worker, next)
        })
    }

    /// Append a step that iterates the forwarded collection with all items in flight
    pub fn each_parallel<R, W>(self, worker: W) -> Chain<T::Mapped<R>>
    where
        T: Collection,
        R: Send + 'static,
        W: Fn(T::Key, T::Item, Next<R>) + Send + Sync + 'static,
    {
        let worker = Arc::new(worker);
        self.chain(move |collection: T, next: Next<T::Mapped<R>>| {
            iterate::each_parallel::<T, R, W>(collection, worker, next)
        })
    }

    /// Parallel counterpart of [`Chain::each_in`]
    pub fn each_parallel_in<C, R, W>(self, collection: C, worker: W) -> Chain<C::Mapped<R>>
    where
        C: Collection,
        R: Send + 'static,
        W: Fn(C::Key, C::Item, Next<R>) + Send + Sync + 'static,
    {
        let worker = Arc::new(worker);
        self.chain(move |_: T, next: Next<C::Mapped<R>>| {
            iterate::each_parallel::<C, R, W>(collection, worker, next)
        })
    }

    /// Start draining the queue; `terminal` receives the outcome exactly once
    ///
    /// Must be called from within a Tokio runtime, otherwise `terminal` is
    /// invoked immediately with [`ChainError::NoRuntime`].
    pub fn end<F>(self, terminal: F)
    where
        F: FnOnce(Result<T, ChainError>) + Send + 'static,
    {
        engine::drive(self.queue, move |outcome: Result<Payload, ChainError>| {
            terminal(outcome.and_then(|value| {
                value.downcast::<T>().map(|value| *value).map_err(|_| ChainError::TypeMismatch {
                    expected: type_name::<T>(),
                })
            }))
        });
    }

    /// Start draining the queue and discard the outcome
    pub fn launch(self) {
        self.end(|_| {});
    }
}

impl<V: Send + 'static> Chain<Vec<V>> {
    /// Append a step that iterates the forwarded sequence, passing `(index, value)`
    pub fn for_each<R, W>(self, worker: W) -> Chain<Vec<R>>
    where
        R: Send + 'static,
        W: Fn(usize, V, Next<R>) + Send + Sync + 'static,
    {
        self.each(worker)
    }

    /// Parallel counterpart of [`Chain::for_each`]
    pub fn for_each_parallel<R, W>(self, worker: W) -> Chain<Vec<R>>
    where
        R: Send + 'static,
        W: Fn(usize, V, Next<R>) + Send + Sync + 'static,
    {
        self.each_parallel(worker)
    }
}

impl<T> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("forwards", &type_name::<T>())
            .field("queued", &self.queue.len())
            .finish()
    }
}
