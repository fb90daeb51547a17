//! Core domain models for chains
//!
//! This module defines the chain itself, the step and completion handle types,
//! shape-preserving collections, errors and the YAML plan configuration.

pub mod collection;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod step;

pub use collection::*;
pub use error::*;
pub use pipeline::*;
pub use step::{task, Next, Task};
