//! Test utility functions for chain-tiny

use chain_tiny::{Chain, ChainError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// End `chain` and wait for its terminal callback
pub async fn finish<T: Send + 'static>(chain: Chain<T>) -> Result<T, ChainError> {
    let (tx, rx) = oneshot::channel();
    chain.end(move |result| {
        let _ = tx.send(result);
    });
    rx.await.expect("terminal callback should run exactly once")
}

/// End `chain` and report how long it took to finish
pub async fn finish_timed<T: Send + 'static>(chain: Chain<T>) -> (Result<T, ChainError>, Duration) {
    let start = Instant::now();
    let result = finish(chain).await;
    (result, start.elapsed())
}

/// Shared, append-only event log
#[derive(Clone, Default)]
pub struct Trace {
    events: Arc<Mutex<Vec<String>>>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}
