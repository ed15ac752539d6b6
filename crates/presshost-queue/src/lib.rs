//! Implementation of job queue using tokio channels
//! This crate implements the JobQueue trait from presshost-core using
//! tokio's mpsc channel.

pub mod queue;

pub use queue::*;

// Re-export core traits for convenience
pub use presshost_core::{JobQueue, JobReceiver, QueueError};
