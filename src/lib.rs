//! chain-tiny - callback-style async step chaining
//!
//! Compose steps into a [`Chain`], run them in order or concurrently, iterate
//! collections with either strategy, insert delays, and receive a single
//! terminal callback with the error or the final value.
//!
//! ```no_run
//! use chain_tiny::Chain;
//!
//! # #[tokio::main]
//! # async fn main() {
//! Chain::seeded(vec!["foo", "bar"])
//!     .for_each(|index, value, next| next.done(format!("{}:{}", index, value)))
//!     .end(|result| {
//!         assert_eq!(result.unwrap(), vec!["0:foo", "1:bar"]);
//!     });
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{task, Chain, ChainError, Collection, Next, Task};
pub use crate::core::config::PlanConfig;
