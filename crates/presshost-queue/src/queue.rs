use presshost_core::async_trait::async_trait;
use presshost_core::{DeleteSiteJob, Job, JobQueue, JobReceiver, ProvisionSiteJob, QueueError};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum QueueServiceError {
    #[error("Failed to send job to queue: {details}")]
    QueueSendError { details: String, job_type: String },

    #[error("Queue channel closed")]
    QueueChannelClosed { job_type: String },

    #[error("Invalid job data: {details}")]
    InvalidJobData { details: String, job_type: String },
}

impl<T> From<mpsc::error::SendError<T>> for QueueServiceError {
    fn from(_err: mpsc::error::SendError<T>) -> Self {
        QueueServiceError::QueueChannelClosed {
            job_type: "unknown".to_string(),
        }
    }
}

/// Sender half of the job channel. Cloneable; every clone feeds the same
/// single consumer.
#[derive(Clone)]
pub struct QueueService {
    job_sender: mpsc::Sender<Job>,
}

/// Wrapper for mpsc::Receiver to implement the JobReceiver trait
pub struct MpscJobReceiver {
    receiver: mpsc::Receiver<Job>,
}

#[async_trait]
impl JobReceiver for MpscJobReceiver {
    async fn recv(&mut self) -> Result<Job, QueueError> {
        debug!("JobReceiver::recv - waiting for job...");

        match self.receiver.recv().await {
            Some(job) => {
                debug!("Received job: {}", job);
                Ok(job)
            }
            None => {
                error!("Job channel closed, no more jobs will be delivered");
                Err(QueueError::ChannelClosed)
            }
        }
    }
}

#[async_trait]
impl JobQueue for QueueService {
    async fn send(&self, job: Job) -> Result<(), QueueError> {
        debug!("JobQueue::send - queueing job: {}", job);
        self.job_sender.send(job).await.map_err(|e| {
            error!("Failed to queue job: {}", e);
            QueueError::SendError(e.to_string())
        })
    }
}

impl QueueService {
    pub fn new(job_sender: mpsc::Sender<Job>) -> Self {
        Self { job_sender }
    }

    /// Create the channel pair: the sender service and the worker's receiver.
    pub fn create_channel(buffer_size: usize) -> (QueueService, MpscJobReceiver) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (QueueService::new(sender), MpscJobReceiver { receiver })
    }

    pub async fn launch_site_provision(
        &self,
        data: ProvisionSiteJob,
    ) -> Result<(), QueueServiceError> {
        info!("Queueing provisioning job for site: {}", data.site_id);
        if data.site_id <= 0 {
            return Err(QueueServiceError::InvalidJobData {
                details: "Site id must be positive".to_string(),
                job_type: "provision_site".to_string(),
            });
        }
        self.job_sender
            .send(Job::ProvisionSite(data))
            .await
            .map_err(|e| {
                error!("Failed to queue site provisioning job: {}", e);
                QueueServiceError::QueueSendError {
                    details: e.to_string(),
                    job_type: "provision_site".to_string(),
                }
            })?;
        Ok(())
    }

    pub async fn launch_site_deletion(
        &self,
        data: DeleteSiteJob,
    ) -> Result<(), QueueServiceError> {
        info!("Queueing deletion job for site: {}", data.site_id);
        if data.site_id <= 0 {
            return Err(QueueServiceError::InvalidJobData {
                details: "Site id must be positive".to_string(),
                job_type: "delete_site".to_string(),
            });
        }
        self.job_sender
            .send(Job::DeleteSite(data))
            .await
            .map_err(|e| {
                error!("Failed to queue site deletion job: {}", e);
                QueueServiceError::QueueSendError {
                    details: e.to_string(),
                    job_type: "delete_site".to_string(),
                }
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_publish_subscribe_provision_job() {
        let (queue_service, mut receiver) = QueueService::create_channel(10);

        queue_service
            .launch_site_provision(ProvisionSiteJob { site_id: 42 })
            .await
            .unwrap();

        let received_job = timeout(Duration::from_secs(1), receiver.recv())
            .await
            .expect("Should receive job within timeout")
            .expect("Should receive a job");

        match received_job {
            Job::ProvisionSite(received_data) => {
                assert_eq!(received_data.site_id, 42);
            }
            _ => panic!("Expected ProvisionSite job"),
        }
    }

    #[tokio::test]
    async fn test_multiple_jobs_fifo_order() {
        let (queue_service, mut receiver) = QueueService::create_channel(10);

        queue_service
            .launch_site_provision(ProvisionSiteJob { site_id: 1 })
            .await
            .unwrap();
        queue_service
            .launch_site_deletion(DeleteSiteJob { site_id: 2 })
            .await
            .unwrap();
        queue_service
            .launch_site_provision(ProvisionSiteJob { site_id: 3 })
            .await
            .unwrap();

        let job1 = receiver.recv().await.expect("Should receive first job");
        let job2 = receiver.recv().await.expect("Should receive second job");
        let job3 = receiver.recv().await.expect("Should receive third job");

        match job1 {
            Job::ProvisionSite(data) => assert_eq!(data.site_id, 1),
            _ => panic!("Expected ProvisionSite job first"),
        }

        match job2 {
            Job::DeleteSite(data) => assert_eq!(data.site_id, 2),
            _ => panic!("Expected DeleteSite job second"),
        }

        match job3 {
            Job::ProvisionSite(data) => assert_eq!(data.site_id, 3),
            _ => panic!("Expected ProvisionSite job third"),
        }
    }

    #[tokio::test]
    async fn test_queue_service_clone() {
        let (queue_service, mut receiver) = QueueService::create_channel(10);

        let cloned_service = queue_service.clone();

        queue_service
            .launch_site_provision(ProvisionSiteJob { site_id: 10 })
            .await
            .unwrap();
        cloned_service
            .launch_site_provision(ProvisionSiteJob { site_id: 20 })
            .await
            .unwrap();

        let job1 = receiver.recv().await.expect("Should receive first job");
        let job2 = receiver.recv().await.expect("Should receive second job");

        let ids: Vec<i32> = vec![job1, job2]
            .into_iter()
            .map(|job| match job {
                Job::ProvisionSite(data) => data.site_id,
                _ => panic!("Expected ProvisionSite job"),
            })
            .collect();

        assert!(ids.contains(&10));
        assert!(ids.contains(&20));
    }

    #[tokio::test]
    async fn test_invalid_job_data_validation() {
        let (queue_service, _receiver) = QueueService::create_channel(10);

        let result = queue_service
            .launch_site_provision(ProvisionSiteJob { site_id: 0 })
            .await;
        assert!(result.is_err());

        match result.unwrap_err() {
            QueueServiceError::InvalidJobData { details, job_type } => {
                assert_eq!(details, "Site id must be positive");
                assert_eq!(job_type, "provision_site");
            }
            _ => panic!("Expected InvalidJobData error"),
        }
    }

    #[tokio::test]
    async fn test_closed_channel_reports_error() {
        let (queue_service, receiver) = QueueService::create_channel(1);
        drop(receiver);

        let result = queue_service
            .launch_site_provision(ProvisionSiteJob { site_id: 1 })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            QueueServiceError::QueueSendError { .. }
        ));
    }

    #[tokio::test]
    async fn test_job_display_formatting() {
        let provision_job = Job::ProvisionSite(ProvisionSiteJob { site_id: 7 });
        let delete_job = Job::DeleteSite(DeleteSiteJob { site_id: 9 });

        assert_eq!(format!("{}", provision_job), "ProvisionSite(site_id: 7)");
        assert_eq!(format!("{}", delete_job), "DeleteSite(site_id: 9)");
    }
}
