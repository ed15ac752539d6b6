use serde::{Deserialize, Serialize};
use std::fmt;

/// Job for provisioning a freshly created site
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvisionSiteJob {
    pub site_id: i32,
}

/// Job for tearing down a site
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeleteSiteJob {
    pub site_id: i32,
}

/// Core job enum containing all possible job types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Job {
    ProvisionSite(ProvisionSiteJob),
    DeleteSite(DeleteSiteJob),
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::ProvisionSite(job) => write!(f, "ProvisionSite(site_id: {})", job.site_id),
            Job::DeleteSite(job) => write!(f, "DeleteSite(site_id: {})", job.site_id),
        }
    }
}

// Core queue abstraction - presshost-queue implements this
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Failed to send job: {0}")]
    SendError(String),
    #[error("Failed to receive job: {0}")]
    ReceiveError(String),
    #[error("Queue channel closed")]
    ChannelClosed,
    #[error("Invalid job data: {0}")]
    InvalidData(String),
}

/// Core trait for job queue operations
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Send a job to the queue
    async fn send(&self, job: Job) -> Result<(), QueueError>;
}

/// Core trait for receiving jobs
#[async_trait]
pub trait JobReceiver: Send {
    /// Receive the next job
    async fn recv(&mut self) -> Result<Job, QueueError>;
}
