//! Chain error types

use thiserror::Error;

/// Error reported through a completion handle and delivered to the terminal
///
/// Errors travel outward unchanged: whatever a step reports is exactly what the
/// terminal callback receives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A step or task reported a failure
    #[error("{0}")]
    Step(String),

    /// A step dropped its completion handle without reporting
    #[error("step {position} dropped its completion handle without reporting")]
    StepAbandoned { position: usize },

    /// Parallel tasks dropped their completion handles without reporting
    #[error("{pending} parallel task(s) dropped their completion handle without reporting")]
    TaskAbandoned { pending: usize },

    /// A step received a value of a type it did not expect
    #[error("step received a value of an unexpected type (expected {expected})")]
    TypeMismatch { expected: &'static str },

    /// The chain was ended outside of a Tokio runtime
    #[error("no Tokio runtime available to drive the chain")]
    NoRuntime,
}

impl ChainError {
    /// Build a step failure from any message
    pub fn step(message: impl Into<String>) -> Self {
        ChainError::Step(message.into())
    }
}

impl From<&str> for ChainError {
    fn from(message: &str) -> Self {
        ChainError::Step(message.to_string())
    }
}

impl From<String> for ChainError {
    fn from(message: String) -> Self {
        ChainError::Step(message)
    }
}
