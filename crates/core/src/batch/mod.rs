//! Batch synchronization over all stored products.

pub mod runner;

pub use runner::{
    BatchError, BatchOptions, BatchRunner, BatchStats, DEFAULT_BATCH_SIZE, ProgressCallback,
};
