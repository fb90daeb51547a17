//! Test: Failure Handling - short-circuit and error propagation

use crate::helpers::*;
use chain_tiny::{task, Chain, ChainError, Next, Task};
use indexmap::IndexMap;
use std::time::Duration;

/// Test that a failing first step skips the rest and reaches the terminal
#[tokio::test]
async fn test_boom_skips_remaining_steps() {
    let trace = Trace::new();
    let second = trace.clone();

    let chain = Chain::new()
        .chain(|_: (), next: Next<u32>| next.fail("boom"))
        .chain(move |value: u32, next: Next<u32>| {
            second.push("second step ran");
            next.done(value)
        });

    assert_eq!(finish(chain).await, Err(ChainError::from("boom")));
    assert!(trace.events().is_empty());
}

/// Test that a failure in the middle keeps earlier work and skips later work
#[tokio::test]
async fn test_failure_mid_chain() {
    let trace = Trace::new();
    let (one, two, four) = (trace.clone(), trace.clone(), trace.clone());

    let chain = Chain::new()
        .chain(move |_: (), next: Next<u32>| {
            one.push("1");
            next.done(1)
        })
        .chain(move |value: u32, next: Next<u32>| {
            two.push("2");
            next.done(value + 1)
        })
        .chain(|value: u32, next: Next<u32>| next.fail(format!("step 3 saw {}", value)))
        .chain(move |value: u32, next: Next<u32>| {
            four.push("4");
            next.done(value)
        });

    assert_eq!(finish(chain).await, Err(ChainError::from("step 3 saw 2")));
    assert_eq!(trace.events(), vec!["1", "2"]);
}

/// Test that a step dropping its handle is reported instead of stalling
#[tokio::test]
async fn test_dropped_handle_reports_position() {
    let chain = Chain::seeded(1u8)
        .chain(|_: u8, next: Next<u8>| drop(next))
        .chain(|value: u8, next: Next<u8>| next.done(value));

    assert_eq!(
        finish(chain).await,
        Err(ChainError::StepAbandoned { position: 2 })
    );
}

/// Test that the first parallel failure is reported without waiting on siblings
#[tokio::test]
async fn test_parallel_failure_does_not_wait() {
    let tasks: Vec<Task<(), u32>> = vec![
        task(|_: (), next: Next<u32>| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                next.done(1);
            });
        }),
        task(|_: (), next: Next<u32>| next.fail("fast failure")),
    ];

    let (result, elapsed) = finish_timed(Chain::parallel_of::<_, u32>(tasks)).await;

    assert_eq!(result, Err(ChainError::from("fast failure")));
    assert!(elapsed < Duration::from_millis(300), "took {:?}", elapsed);
}

/// Test that a failing item stops sequential iteration
#[tokio::test]
async fn test_each_stops_at_failing_item() {
    let trace = Trace::new();
    let seen = trace.clone();

    let chain = Chain::seeded(vec!["a", "b", "c"]).each(move |index: usize, value: &'static str, next: Next<String>| {
        seen.push(value);
        if index == 1 {
            next.fail(format!("item {} rejected", value));
        } else {
            next.done(value.to_uppercase());
        }
    });

    assert_eq!(finish(chain).await, Err(ChainError::from("item b rejected")));
    assert_eq!(trace.events(), vec!["a", "b"]);
}

/// Test that a failing item ends parallel iteration without waiting on slow items
#[tokio::test]
async fn test_each_parallel_failure_ignores_late_items() {
    let mut items = IndexMap::new();
    items.insert("slow".to_string(), 200u64);
    items.insert("bad".to_string(), 1u64);

    let trace = Trace::new();
    let seen = trace.clone();
    let chain = Chain::each_parallel_of(items, move |key: String, millis: u64, next: Next<u64>| {
        let seen = seen.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            seen.push(key.clone());
            if key == "bad" {
                next.fail("bad item");
            } else {
                next.done(millis);
            }
        });
    });

    let (result, elapsed) = finish_timed(chain).await;

    assert_eq!(result, Err(ChainError::from("bad item")));
    assert!(elapsed < Duration::from_millis(150), "took {:?}", elapsed);

    // The slow item still reports after the failure was delivered
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(trace.events(), vec!["bad", "slow"]);
}

/// Test that a failure in one chain leaves a sibling chain untouched
#[tokio::test]
async fn test_sibling_chains_are_independent() {
    let failing = Chain::seeded(1u32).chain(|_: u32, next: Next<u32>| next.fail("left failed"));
    let healthy = Chain::seeded(1u32)
        .wait(Duration::from_millis(10))
        .chain(|value: u32, next: Next<u32>| next.done(value + 1));

    let (left, right) = tokio::join!(finish(failing), finish(healthy));

    assert_eq!(left, Err(ChainError::from("left failed")));
    assert_eq!(right, Ok(2));
}
