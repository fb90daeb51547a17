//! Chain execution: the sequential runner, the parallel runner and the
//! scheduling primitives both rely on

pub mod engine;
pub mod iterate;
pub mod join;
pub mod scheduler;
