//! Test: Wait and Delay - latency without changing forwarded values

use crate::helpers::*;
use chain_tiny::{Chain, Next};
use std::time::Duration;

/// Test that wait forwards a tuple unchanged after at least the delay
#[tokio::test]
async fn test_wait_forwards_tuple() {
    let chain = Chain::start(|next: Next<(&'static str, &'static str)>| next.done(("foo", "bar")))
        .wait(Duration::from_millis(50))
        .chain(|(first, second): (&'static str, &'static str), next: Next<String>| {
            next.done(format!("{}{}", first, second))
        });

    let (result, elapsed) = finish_timed(chain).await;

    assert_eq!(result, Ok("foobar".to_string()));
    assert!(elapsed >= Duration::from_millis(50), "took {:?}", elapsed);
}

/// Test that a delay chain waits and forwards nothing
#[tokio::test]
async fn test_delay_entry_point() {
    let (result, elapsed) = finish_timed(Chain::delay(Duration::from_millis(30))).await;

    assert_eq!(result, Ok(()));
    assert!(elapsed >= Duration::from_millis(30), "took {:?}", elapsed);
}

/// Test that later steps wait for the delay to pass
#[tokio::test]
async fn test_wait_holds_back_later_steps() {
    let trace = Trace::new();
    let (before, after) = (trace.clone(), trace.clone());

    let chain = Chain::seeded(0u32)
        .chain(move |value: u32, next: Next<u32>| {
            before.push("before");
            next.done(value)
        })
        .wait(Duration::from_millis(20))
        .wait(Duration::from_millis(20))
        .chain(move |value: u32, next: Next<u32>| {
            after.push("after");
            next.done(value)
        });

    let (result, elapsed) = finish_timed(chain).await;

    assert_eq!(result, Ok(0));
    assert_eq!(trace.events(), vec!["before", "after"]);
    assert!(elapsed >= Duration::from_millis(40), "took {:?}", elapsed);
}
