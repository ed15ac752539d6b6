use std::sync::Arc;

use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use presshost_core::{DeleteSiteJob, Job, JobReceiver, ProvisionSiteJob};
use presshost_database::DbConnection;
use presshost_entities::{sites, SiteStatus};

use crate::provisioner::SiteProvisioner;

#[derive(Error, Debug)]
pub enum JobProcessorError {
    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Background worker consuming the job channel. Jobs run one at a time;
/// a failed job is logged and the loop keeps serving.
pub struct JobProcessorService {
    db: Arc<DbConnection>,
    job_receiver: Box<dyn JobReceiver>,
    provisioner: Arc<SiteProvisioner>,
}

impl JobProcessorService {
    pub fn new(
        db: Arc<DbConnection>,
        job_receiver: Box<dyn JobReceiver>,
        provisioner: Arc<SiteProvisioner>,
    ) -> Self {
        Self {
            db,
            job_receiver,
            provisioner,
        }
    }

    pub async fn run(&mut self) -> Result<(), JobProcessorError> {
        debug!("Starting job processor service for site provisioning");

        loop {
            match self.job_receiver.recv().await {
                Ok(job) => {
                    info!("Processing job: {}", job);
                    match job {
                        Job::ProvisionSite(data) => {
                            process_provision_job(&self.provisioner, &self.db, data).await;
                        }
                        Job::DeleteSite(data) => {
                            if let Err(e) = process_delete_job(&self.db, data).await {
                                error!("Deletion job failed: {}", e);
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to receive job: {}", e);
                    return Err(JobProcessorError::Queue(e.to_string()));
                }
            }
        }
    }
}

/// Load the site fresh and hand it to the provisioner. A missing record is
/// logged and dropped; provisioning outcomes land in the record itself.
async fn process_provision_job(
    provisioner: &SiteProvisioner,
    db: &DbConnection,
    job: ProvisionSiteJob,
) {
    let site = match sites::Entity::find_by_id(job.site_id).one(db).await {
        Ok(Some(site)) => site,
        Ok(None) => {
            warn!("No site found for provisioning job, id {}", job.site_id);
            return;
        }
        Err(e) => {
            error!("Database error loading site {}: {}", job.site_id, e);
            return;
        }
    };

    let succeeded = provisioner.provision_site(site).await;
    debug!(
        "Provisioning run for site {} finished, success: {}",
        job.site_id, succeeded
    );
}

/// Apply the deletion transition. No compensating teardown of the backing
/// database, files, or web-server configuration happens here.
async fn process_delete_job(db: &DbConnection, job: DeleteSiteJob) -> Result<(), JobProcessorError> {
    let site = match sites::Entity::find_by_id(job.site_id).one(db).await? {
        Some(site) => site,
        None => {
            warn!("No site found for deletion job, id {}", job.site_id);
            return Ok(());
        }
    };

    let status = match site.status.transition_to(SiteStatus::Deleted) {
        Ok(status) => status,
        Err(e) => {
            warn!("Skipping deletion of site {}: {}", site.id, e);
            return Ok(());
        }
    };

    let domain = site.domain.clone();
    let mut active: sites::ActiveModel = site.into();
    active.status = Set(status);
    active.update(db).await?;

    info!("Marked site {} deleted", domain);
    Ok(())
}
