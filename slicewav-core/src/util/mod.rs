//! Concurrency helpers.
//!
//! Holds the bounded task pool that runs conversion and split jobs.

pub mod pool;

pub use pool::TaskPool;
