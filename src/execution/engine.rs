//! Sequential runner - drains a chain's queue one step at a time

use crate::core::{
    error::ChainError,
    step::{ErasedStep, Next, Payload},
};
use std::collections::VecDeque;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

/// Drive `queue` on the current runtime and hand the outcome to `terminal`
///
/// Outside of a runtime the terminal is called immediately with
/// [`ChainError::NoRuntime`].
pub(crate) fn drive<F>(queue: VecDeque<ErasedStep>, terminal: F)
where
    F: FnOnce(Result<Payload, ChainError>) + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                let outcome = run_queue(queue).await;
                terminal(outcome);
            });
        }
        Err(_) => {
            warn!("Chain ended outside of a Tokio runtime");
            terminal(Err(ChainError::NoRuntime));
        }
    }
}

/// Run every queued step in order, threading each output into the next step
async fn run_queue(mut queue: VecDeque<ErasedStep>) -> Result<Payload, ChainError> {
    let total = queue.len();
    debug!("Starting chain with {} step(s)", total);

    let mut carried: Payload = Box::new(());
    let mut position = 0;

    while let Some(step) = queue.pop_front() {
        position += 1;
        trace!("Running step {}/{}", position, total);

        let (tx, rx) = oneshot::channel();
        step(
            carried,
            Next::new(move |result| {
                let _ = tx.send(result);
            }),
        );

        carried = match rx.await {
            Ok(Ok(value)) => value,
            Ok(Err(error)) => {
                debug!(
                    "Step {} failed, skipping {} remaining step(s): {}",
                    position,
                    queue.len(),
                    error
                );
                return Err(error);
            }
            Err(_) => {
                warn!("Step {} dropped its completion handle", position);
                return Err(ChainError::StepAbandoned { position });
            }
        };
    }

    debug!("Chain finished after {} step(s)", total);
    Ok(carried)
}
