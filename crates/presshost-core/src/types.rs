//! Shared type aliases

use chrono::{DateTime, Utc};

/// Standard datetime type for API payloads and service layers
pub type UtcDateTime = DateTime<Utc>;

/// Datetime type stored in entity columns
pub type DBDateTime = DateTime<Utc>;
