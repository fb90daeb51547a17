//! Test: Success Chain - steps run once each, in append order

use crate::helpers::*;
use chain_tiny::{Chain, Next};
use std::time::Duration;
use tokio::sync::oneshot;

/// Test that every step runs in the order it was appended
#[tokio::test]
async fn test_steps_run_in_append_order() {
    let trace = Trace::new();
    let (first, second, third) = (trace.clone(), trace.clone(), trace.clone());

    let chain = Chain::new()
        .chain(move |_: (), next: Next<u32>| {
            first.push("first");
            next.done(1)
        })
        .chain(move |value: u32, next: Next<u32>| {
            second.push("second");
            next.done(value + 1)
        })
        .chain(move |value: u32, next: Next<String>| {
            third.push("third");
            next.done(format!("total={}", value))
        });
    assert_eq!(chain.len(), 3);

    let result = finish(chain).await;

    assert_eq!(result, Ok("total=2".to_string()));
    assert_eq!(trace.events(), vec!["first", "second", "third"]);
}

/// Test that a step may report from another task after yielding
#[tokio::test]
async fn test_steps_report_asynchronously() {
    let chain = Chain::seeded(21u32).chain(|value: u32, next: Next<u32>| {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            next.done(value * 2);
        });
    });

    assert_eq!(finish(chain).await, Ok(42));
}

/// Test that only one step is in flight at a time
#[tokio::test]
async fn test_one_step_in_flight() {
    let trace = Trace::new();
    let (slow, fast) = (trace.clone(), trace.clone());

    let chain = Chain::new()
        .chain(move |_: (), next: Next<()>| {
            tokio::spawn(async move {
                slow.push("slow started");
                tokio::time::sleep(Duration::from_millis(30)).await;
                slow.push("slow finished");
                next.done(());
            });
        })
        .chain(move |_: (), next: Next<()>| {
            fast.push("fast");
            next.done(())
        });

    finish(chain).await.unwrap();
    assert_eq!(trace.events(), vec!["slow started", "slow finished", "fast"]);
}

/// Test that an empty chain ends successfully with nothing forwarded
#[tokio::test]
async fn test_empty_chain_succeeds() {
    let chain = Chain::new();
    assert!(chain.is_empty());
    assert_eq!(finish(chain).await, Ok(()));
}

/// Test that zero-like values are ordinary results, not failures
#[tokio::test]
async fn test_falsy_values_are_results() {
    let chain = Chain::seeded(0i64)
        .chain(|value: i64, next: Next<(i64, String, bool)>| next.done((value, String::new(), false)));

    assert_eq!(finish(chain).await, Ok((0, String::new(), false)));
}

/// Test that a chain can be started without waiting for its outcome
#[tokio::test]
async fn test_launch_runs_steps() {
    let (tx, rx) = oneshot::channel();

    Chain::seeded("ping")
        .chain(move |value: &'static str, next: Next<()>| {
            let _ = tx.send(value);
            next.done(())
        })
        .launch();

    assert_eq!(rx.await.unwrap(), "ping");
}
