//! Core utilities and types shared across all PressHost crates

pub mod error;
pub mod jobs;
pub mod problemdetails;
pub mod types;
pub mod utils;

pub use problemdetails::ProblemDetails;

// Re-export commonly used types
pub use error::*;
pub use jobs::*;
pub use utils::*;

// Re-export external dependencies
pub use anyhow;
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tokio;
pub use tracing;

// Re-export standard datetime type for use across all crates
pub use types::{DBDateTime, UtcDateTime};
